//! Decoders for the fixed-format ASCII fields of NMEA sentences.
//!
//! Every decoder works on a borrowed byte slice that ends either at the end of
//! the slice or at the first NUL byte, never allocates and never panics.

use chrono::{NaiveDate, NaiveTime};

use crate::error::DateTimeError;

/// Longest field the decoders accept, a 16th character turns the result into zero.
const MAX_FIELD_CHARS: usize = 15;

/// Trim `src` at its first NUL byte.
fn terminated(src: &[u8]) -> &[u8] {
    match src.iter().position(|&c| c == 0) {
        Some(end) => &src[..end],
        None => src,
    }
}

/// Convert a numeric field into a fixed-point integer keeping `frac_digits`
/// digits after the decimal point.
///
/// The decimal point is removed and fractional digits past `frac_digits` are
/// discarded. With `frac_digits == 0` scanning stops at the point. Characters
/// other than digits and the point are skipped. A field that would need more
/// than 15 characters to scan decodes as 0.
///
/// ```
/// use nmea_gps::field::decode_field;
///
/// assert_eq!(123456, decode_field(b"1234.56", 2));
/// assert_eq!(1234, decode_field(b"1234.56", 0));
/// assert_eq!(5454, decode_field(b"545.4", 1));
/// ```
pub fn decode_field(src: &[u8], frac_digits: u8) -> u32 {
    let src = terminated(src);
    let mut acc: u32 = 0;
    let mut end = src.len();
    let mut i = 0;
    while i < end {
        let c = src[i];
        if c == b'.' {
            if frac_digits == 0 {
                break;
            }
            end = end.min(i + 1 + usize::from(frac_digits));
        } else if c.is_ascii_digit() {
            acc = acc.wrapping_mul(10).wrapping_add(u32::from(c - b'0'));
        }
        if i >= MAX_FIELD_CHARS {
            return 0; // out of bounds
        }
        i += 1;
    }
    acc
}

/// Convert an NMEA `dddmm.mmmm` coordinate into 1e-7 degree units.
///
/// Up to four fractional-minute digits are used. Returns 0 for a malformed
/// field whose integer part is longer than 15 characters.
pub fn coord_to_degrees(src: &[u8]) -> i32 {
    let src = terminated(src);
    let int_len = src.iter().take_while(|c| c.is_ascii_digit()).count();
    if int_len > MAX_FIELD_CHARS {
        return 0;
    }
    let (int_part, rest) = src.split_at(int_len);
    let deg_len = int_len.saturating_sub(2);

    let digits = |s: &[u8]| -> u64 {
        s.iter().fold(0u64, |acc, &c| acc * 10 + u64::from(c - b'0'))
    };
    let degrees = digits(&int_part[..deg_len]);
    let minutes = digits(&int_part[deg_len..]);

    // ten-thousandths of a minute
    let mut frac_minutes: u64 = 0;
    if rest.first() == Some(&b'.') {
        let mut frac = rest[1..].iter().take_while(|c| c.is_ascii_digit());
        for _ in 0..4 {
            frac_minutes *= 10;
            if let Some(&c) = frac.next() {
                frac_minutes += u64::from(c - b'0');
            }
        }
    }

    degrees
        .checked_mul(10_000_000)
        .and_then(|deg| deg.checked_add((minutes * 1_000_000 + frac_minutes * 100) / 6))
        .and_then(|value| i32::try_from(value).ok())
        .unwrap_or(0)
}

/// Value of one uppercase hexadecimal checksum digit.
pub const fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn two_digits(src: &[u8]) -> Option<u32> {
    match src {
        [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => {
            Some(u32::from(a - b'0') * 10 + u32::from(b - b'0'))
        },
        _ => None,
    }
}

/// Decode a UTC time field, `hhmmss` optionally followed by fractional seconds.
pub fn decode_time(src: &[u8]) -> Result<NaiveTime, DateTimeError> {
    let src = terminated(src);
    if src.len() < 6 {
        return Err(DateTimeError::InvalidTime);
    }
    let hours = two_digits(&src[0..2]).ok_or(DateTimeError::InvalidTime)?;
    let minutes = two_digits(&src[2..4]).ok_or(DateTimeError::InvalidTime)?;
    let seconds = two_digits(&src[4..6]).ok_or(DateTimeError::InvalidTime)?;

    let millis = match &src[6..] {
        [] => 0,
        [b'.', frac @ ..] => {
            if !frac.iter().all(u8::is_ascii_digit) {
                return Err(DateTimeError::InvalidNanoseconds);
            }
            // keep three digits, pad the missing ones
            let mut millis = 0;
            for pos in 0..3 {
                millis = millis * 10 + frac.get(pos).map_or(0, |c| u32::from(c - b'0'));
            }
            millis
        },
        _ => return Err(DateTimeError::InvalidTime),
    };

    NaiveTime::from_hms_milli_opt(hours, minutes, seconds, millis).ok_or(DateTimeError::InvalidTime)
}

/// Decode a `ddmmyy` date field; years are taken to be in the 2000s.
pub fn decode_date(src: &[u8]) -> Result<NaiveDate, DateTimeError> {
    let src = terminated(src);
    if src.len() != 6 {
        return Err(DateTimeError::InvalidDate);
    }
    let day = two_digits(&src[0..2]).ok_or(DateTimeError::InvalidDate)?;
    let month = two_digits(&src[2..4]).ok_or(DateTimeError::InvalidDate)?;
    let year = two_digits(&src[4..6]).ok_or(DateTimeError::InvalidDate)?;

    // year is at most 99, the cast cannot truncate
    NaiveDate::from_ymd_opt(2000 + year as i32, month, day).ok_or(DateTimeError::InvalidDate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_field_keeps_requested_precision() {
        assert_eq!(123456, decode_field(b"1234.56", 2));
        assert_eq!(12345, decode_field(b"1234.56", 1));
        assert_eq!(1234, decode_field(b"1234.56", 0));
        assert_eq!(0, decode_field(b"00.0", 1));
        assert_eq!(9, decode_field(b"0.9", 1));
        assert_eq!(8, decode_field(b"08", 0));
    }

    #[test]
    fn decode_field_stops_at_nul() {
        assert_eq!(12, decode_field(b"12\0345", 0));
        assert_eq!(0, decode_field(b"", 1));
        assert_eq!(0, decode_field(b"\0", 1));
    }

    #[test]
    fn decode_field_skips_non_digits() {
        assert_eq!(545, decode_field(b"-545", 0));
        assert_eq!(12, decode_field(b"1a2", 0));
    }

    #[test]
    fn decode_field_rejects_overlong_input() {
        assert_eq!(0, decode_field(b"1234567890123456", 0));
        assert_eq!(0, decode_field(b"12345678901234567890", 3));
        // exactly 15 characters are still fine
        assert_eq!(
            123_456_789_012_345u64 as u32,
            decode_field(b"123456789012345", 0)
        );
    }

    #[test]
    fn decode_field_overlong_fraction_is_truncated_not_rejected() {
        // scanning stops after the requested fraction, long before the bound
        assert_eq!(12, decode_field(b"1.2345678901234567", 1));
    }

    #[test]
    fn coordinates() {
        assert_eq!(481_173_000, coord_to_degrees(b"4807.038"));
        assert_eq!(115_166_666, coord_to_degrees(b"01131.000"));
        assert_eq!(0, coord_to_degrees(b""));
        assert_eq!(0, coord_to_degrees(b"1234567890123456.0"));
        // five fractional digits, the last one is ignored
        assert_eq!(coord_to_degrees(b"4807.0380"), coord_to_degrees(b"4807.03809"));
    }

    #[test]
    fn coordinate_without_fraction() {
        assert_eq!(480_000_000 + 7_000_000 / 6, coord_to_degrees(b"4807"));
    }

    #[test]
    fn hex_digits() {
        assert_eq!(Some(4), hex_digit(b'4'));
        assert_eq!(Some(0xF), hex_digit(b'F'));
        assert_eq!(None, hex_digit(b'f'));
        assert_eq!(None, hex_digit(b'G'));
    }

    #[test]
    fn time_and_date() {
        assert_eq!(
            NaiveTime::from_hms_opt(12, 35, 19),
            decode_time(b"123519").ok()
        );
        assert_eq!(
            NaiveTime::from_hms_milli_opt(12, 35, 19, 500),
            decode_time(b"123519.5").ok()
        );
        assert_eq!(
            NaiveDate::from_ymd_opt(2094, 3, 23),
            decode_date(b"230394").ok()
        );
        assert_eq!(Err(DateTimeError::InvalidTime), decode_time(b""));
        assert_eq!(Err(DateTimeError::InvalidTime), decode_time(b"256000"));
        assert_eq!(Err(DateTimeError::InvalidNanoseconds), decode_time(b"123519.x"));
        assert_eq!(Err(DateTimeError::InvalidDate), decode_date(b"320194"));
        assert_eq!(Err(DateTimeError::InvalidDate), decode_date(b"0101"));
    }
}
