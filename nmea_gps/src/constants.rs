pub const NMEA_SYNC_CHAR: u8 = 0x24; // '$'
pub const NMEA_FIELD_SEPARATOR: u8 = 0x2c; // ','
pub const NMEA_CHECKSUM_CHAR: u8 = 0x2a; // '*'
pub const NMEA_END_CHAR_1: u8 = 0x0d; // '\r' (<CR>)
pub const NMEA_END_CHAR_2: u8 = 0x0a; // '\n' (<LF>)

/// Field buffer size, one byte is kept free so a field never exceeds 15 characters
pub(crate) const NMEA_BUFFER_SIZE: usize = 16;
pub(crate) const NMEA_MAX_FIELD_LEN: usize = NMEA_BUFFER_SIZE - 1;

pub(crate) const GPS_HDOP_TO_EPH_MULTIPLIER: u32 = 2;
pub(crate) const GPS_EPE_MAX: u32 = 9999;
pub(crate) const GPS_HDOP_MAX: u32 = 9999;

// knots -> cm/s, 1 knot = 51.44 cm/s
pub(crate) const KNOTS_TO_CMS_NUM: u32 = 5144;
pub(crate) const KNOTS_TO_CMS_DEN: u32 = 1000;

/// Dwell time between two auto-configuration steps
pub const GPS_NMEA_CONFIG_DELAY_MS: u32 = 300;
/// Dwell time between two auto-baud candidates
pub const GPS_BAUD_CHANGE_DELAY_MS: u32 = 200;
