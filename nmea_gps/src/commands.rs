//! Vendor configuration sentences sent to the receiver.
//!
//! Every command is stored once, checksum and CR/LF included, and is written
//! to the port verbatim.

use crate::config::{GpsBaudRate, GpsProvider};

/// MediaTek `PMTK` command set
pub mod mtk {
    /// `PMTK251`: set the serial baud rate, indexed like [`GpsBaudRate::ALL`](crate::GpsBaudRate::ALL)
    pub const SET_BAUD: [&[u8]; 6] = [
        b"$PMTK251,115200*1F\r\n",
        b"$PMTK251,57600*2C\r\n",
        b"$PMTK251,38400*27\r\n",
        b"$PMTK251,19200*22\r\n",
        b"$PMTK251,9600*17\r\n",
        b"$PMTK251,4800*14\r\n",
    ];
    /// `PMTK220`: report position every 200 ms
    pub const REPORT_RATE_5HZ: &[u8] = b"$PMTK220,200*2C\r\n";
    /// `PMTK300`: fix every 200 ms
    pub const UPDATE_RATE_5HZ: &[u8] = b"$PMTK300,200,0,0,0,0*2F\r\n";
}

/// SiRF `PSRF` command set
pub mod sirf {
    /// `PSRF100`: switch to NMEA at the given baud, 8N1
    pub const SET_BAUD: [&[u8]; 6] = [
        b"$PSRF100,1,115200,8,1,0*05\r\n",
        b"$PSRF100,1,57600,8,1,0*36\r\n",
        b"$PSRF100,1,38400,8,1,0*3D\r\n",
        b"$PSRF100,1,19200,8,1,0*38\r\n",
        b"$PSRF100,1,9600,8,1,0*0D\r\n",
        b"$PSRF100,1,4800,8,1,0*0E\r\n",
    ];
    /// `PSRF103`: GGA query/rate control
    pub const UPDATE_RATE_5HZ: &[u8] = b"$PSRF103,00,6,00,0*23\r\n";
}

/// "Switch to `rate`" command for the given receiver family
pub fn set_baud_command(provider: GpsProvider, rate: GpsBaudRate) -> &'static [u8] {
    match provider {
        GpsProvider::Nmea => mtk::SET_BAUD[rate.index()],
        GpsProvider::NmeaSirf => sirf::SET_BAUD[rate.index()],
    }
}
