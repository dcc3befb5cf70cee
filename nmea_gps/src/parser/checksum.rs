use crate::{field::hex_digit, ParserError};

/// NMEA checksum calculator: the XOR of every byte between `$` and `*`
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct NmeaChecksumCalc {
    parity: u8,
}

impl NmeaChecksumCalc {
    pub(crate) const fn new() -> Self {
        Self { parity: 0 }
    }

    /// Update checksum with new bytes
    pub(crate) const fn update(&mut self, bytes: &[u8]) {
        let mut i = 0;
        while i < bytes.len() {
            self.update_byte(bytes[i]);
            i += 1;
        }
    }

    /// Update checksum with a single byte
    pub(crate) const fn update_byte(&mut self, byte: u8) {
        self.parity ^= byte;
    }

    /// Get the current checksum result
    pub(crate) const fn result(self) -> u8 {
        self.parity
    }

    /// Validate against the two hex digits that followed `*`
    pub(crate) fn validate_digits(self, digits: &[u8]) -> Result<(), ParserError> {
        let received = match digits {
            [hi, lo] => match (hex_digit(*hi), hex_digit(*lo)) {
                (Some(hi), Some(lo)) => (hi << 4) | lo,
                _ => return Err(ParserError::MalformedChecksum),
            },
            _ => return Err(ParserError::MalformedChecksum),
        };
        self.validate_result(received)
    }

    pub(crate) const fn validate_result(self, received: u8) -> Result<(), ParserError> {
        if self.parity == received {
            Ok(())
        } else {
            Err(ParserError::InvalidChecksum {
                expect: received,
                got: self.parity,
            })
        }
    }
}

/// Checksum of a complete `$...*hh` sentence body, i.e. the bytes between `$`
/// and `*` (or the end of `sentence` when there is no `*`).
pub fn sentence_checksum(sentence: &[u8]) -> u8 {
    let body = match sentence.first() {
        Some(&crate::constants::NMEA_SYNC_CHAR) => &sentence[1..],
        _ => sentence,
    };
    let end = body
        .iter()
        .position(|&c| c == crate::constants::NMEA_CHECKSUM_CHAR)
        .unwrap_or(body.len());
    let mut calc = NmeaChecksumCalc::new();
    calc.update(&body[..end]);
    calc.result()
}
