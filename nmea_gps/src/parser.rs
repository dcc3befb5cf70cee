use chrono::{NaiveDate, NaiveTime};

use crate::{
    constants::{
        KNOTS_TO_CMS_DEN, KNOTS_TO_CMS_NUM, NMEA_BUFFER_SIZE, NMEA_CHECKSUM_CHAR,
        NMEA_END_CHAR_1, NMEA_END_CHAR_2, NMEA_FIELD_SEPARATOR, NMEA_MAX_FIELD_LEN,
        NMEA_SYNC_CHAR,
    },
    error::ParserError,
    field::{coord_to_degrees, decode_date, decode_field, decode_time},
};

pub(crate) mod checksum;

pub use checksum::sentence_checksum;
use checksum::NmeaChecksumCalc;

/// Navigation data collected while a sentence streams in.
///
/// The parser owns one of these and resets it on every `$`. A copy leaves the
/// parser only inside a [`Sentence`] whose checksum has been verified.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PendingFix {
    /// Fix indicator was present and non-zero
    pub fix: bool,
    /// Latitude [1e-7 deg]
    pub latitude: i32,
    /// Longitude [1e-7 deg]
    pub longitude: i32,
    pub num_sat: u8,
    /// Altitude above mean sea level [cm]
    pub altitude: i32,
    /// Ground speed [cm/s]
    pub speed: u16,
    /// Course over ground [deg * 10]
    pub ground_course: u16,
    /// Horizontal dilution of precision, decoded with one decimal then scaled by 10
    pub hdop: u32,
    /// UTC time of the RMC report
    pub time: Option<NaiveTime>,
    /// UTC date of the RMC report
    pub date: Option<NaiveDate>,
}

/// A sentence that passed checksum validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentence {
    /// `GPGGA` / `GNGGA`
    FixData(PendingFix),
    /// `GPRMC` / `GNRMC`
    RecommendedMinimum(PendingFix),
    /// Any other identifier, nothing was decoded
    Unrecognized,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum SentenceTag {
    #[default]
    None,
    FixData,
    RecommendedMinimum,
}

impl SentenceTag {
    fn identify(id: &[u8]) -> Self {
        match id {
            b"GPGGA" | b"GNGGA" => SentenceTag::FixData,
            b"GPRMC" | b"GNRMC" => SentenceTag::RecommendedMinimum,
            _ => SentenceTag::None,
        }
    }
}

/// Streaming NMEA sentence parser.
///
/// Bytes are fed one at a time, the parser keeps only a single 16-byte field
/// buffer and never allocates. Garbage, truncated sentences and unknown
/// sentence types are skipped; the parser resynchronizes on the next `$`.
///
/// ```
/// use nmea_gps::{Parser, Sentence};
///
/// let mut parser = Parser::new();
/// let data = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";
/// let mut fixes = parser.consume(data).filter(|s| matches!(s, Ok(Sentence::FixData(_))));
/// assert!(fixes.next().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Parser {
    field_index: u8,
    offset: usize,
    field: [u8; NMEA_BUFFER_SIZE],
    checksum: NmeaChecksumCalc,
    capturing_checksum: bool,
    tag: SentenceTag,
    pending: PendingFix,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub const fn new() -> Self {
        Self {
            field_index: 0,
            offset: 0,
            field: [0; NMEA_BUFFER_SIZE],
            checksum: NmeaChecksumCalc::new(),
            capturing_checksum: false,
            tag: SentenceTag::None,
            pending: PendingFix {
                fix: false,
                latitude: 0,
                longitude: 0,
                num_sat: 0,
                altitude: 0,
                speed: 0,
                ground_course: 0,
                hdop: 0,
                time: None,
                date: None,
            },
        }
    }

    /// Feed one byte.
    ///
    /// Returns `Some` only on a line terminator that closes a sentence with a
    /// checksum field: `Ok` when the checksum matched, `Err` otherwise.
    pub fn consume_byte(&mut self, c: u8) -> Option<Result<Sentence, ParserError>> {
        match c {
            NMEA_SYNC_CHAR => {
                self.start_sentence();
                None
            },
            NMEA_FIELD_SEPARATOR | NMEA_CHECKSUM_CHAR => {
                self.end_field();
                if c == NMEA_CHECKSUM_CHAR {
                    self.capturing_checksum = true;
                } else if !self.capturing_checksum {
                    self.checksum.update_byte(c);
                }
                None
            },
            NMEA_END_CHAR_1 | NMEA_END_CHAR_2 => self.end_sentence(),
            _ => {
                // bytes past the field capacity are dropped and so fail the checksum
                if self.offset < NMEA_MAX_FIELD_LEN {
                    self.field[self.offset] = c;
                    self.offset += 1;
                    if !self.capturing_checksum {
                        self.checksum.update_byte(c);
                    }
                }
                None
            },
        }
    }

    /// Feed a chunk of bytes, the returned iterator yields every sentence
    /// event found in it.
    pub fn consume<'a>(&'a mut self, data: &'a [u8]) -> ParserIter<'a> {
        ParserIter {
            parser: self,
            data: data.iter(),
        }
    }

    fn start_sentence(&mut self) {
        self.field_index = 0;
        self.offset = 0;
        self.checksum = NmeaChecksumCalc::new();
        self.capturing_checksum = false;
        self.tag = SentenceTag::None;
        self.pending = PendingFix::default();
    }

    fn end_field(&mut self) {
        let field = &self.field[..self.offset];
        if self.field_index == 0 {
            self.tag = SentenceTag::identify(field);
        }
        match self.tag {
            SentenceTag::FixData => fix_data_field(&mut self.pending, self.field_index, field),
            SentenceTag::RecommendedMinimum => {
                recommended_minimum_field(&mut self.pending, self.field_index, field)
            },
            SentenceTag::None => {},
        }
        self.field_index = self.field_index.saturating_add(1);
        self.offset = 0;
    }

    fn end_sentence(&mut self) -> Option<Result<Sentence, ParserError>> {
        if !self.capturing_checksum {
            return None;
        }
        self.capturing_checksum = false;

        let result = self
            .checksum
            .validate_digits(&self.field[..self.offset])
            .map(|()| match self.tag {
                SentenceTag::FixData => Sentence::FixData(self.pending),
                SentenceTag::RecommendedMinimum => Sentence::RecommendedMinimum(self.pending),
                SentenceTag::None => Sentence::Unrecognized,
            });
        Some(result)
    }
}

fn fix_data_field(pending: &mut PendingFix, index: u8, field: &[u8]) {
    match index {
        2 => pending.latitude = coord_to_degrees(field),
        3 => {
            if field.first() == Some(&b'S') {
                pending.latitude = -pending.latitude;
            }
        },
        4 => pending.longitude = coord_to_degrees(field),
        5 => {
            if field.first() == Some(&b'W') {
                pending.longitude = -pending.longitude;
            }
        },
        6 => pending.fix = field.first().is_some_and(|&c| c > b'0'),
        7 => pending.num_sat = u8::try_from(decode_field(field, 0)).unwrap_or(u8::MAX),
        8 => pending.hdop = decode_field(field, 1).saturating_mul(10),
        9 => {
            pending.altitude =
                i32::try_from(decode_field(field, 1).saturating_mul(10)).unwrap_or(i32::MAX)
        },
        _ => {},
    }
}

fn recommended_minimum_field(pending: &mut PendingFix, index: u8, field: &[u8]) {
    match index {
        1 => pending.time = decode_time(field).ok(),
        7 => {
            let knots = u64::from(decode_field(field, 1));
            let cms = knots * u64::from(KNOTS_TO_CMS_NUM) / u64::from(KNOTS_TO_CMS_DEN);
            pending.speed = u16::try_from(cms).unwrap_or(u16::MAX);
        },
        8 => pending.ground_course = u16::try_from(decode_field(field, 1)).unwrap_or(u16::MAX),
        9 => pending.date = decode_date(field).ok(),
        _ => {},
    }
}

/// Iterator over the sentence events of one chunk passed to [`Parser::consume`]
pub struct ParserIter<'a> {
    parser: &'a mut Parser,
    data: core::slice::Iter<'a, u8>,
}

impl Iterator for ParserIter<'_> {
    type Item = Result<Sentence, ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        for &c in self.data.by_ref() {
            if let Some(event) = self.parser.consume_byte(c) {
                return Some(event);
            }
        }
        None
    }
}
