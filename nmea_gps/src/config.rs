#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Receiver family, selects the vendor command set
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpsProvider {
    /// Generic NMEA receiver configured with MediaTek `PMTK` commands
    #[default]
    Nmea,
    /// SiRF receiver configured with `PSRF` commands
    NmeaSirf,
}

/// Serial baud rates a receiver can be negotiated to
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpsBaudRate {
    #[default]
    Baud115200,
    Baud57600,
    Baud38400,
    Baud19200,
    Baud9600,
    Baud4800,
}

impl GpsBaudRate {
    /// Auto-baud candidates, in probing order
    pub const ALL: [GpsBaudRate; 6] = [
        GpsBaudRate::Baud115200,
        GpsBaudRate::Baud57600,
        GpsBaudRate::Baud38400,
        GpsBaudRate::Baud19200,
        GpsBaudRate::Baud9600,
        GpsBaudRate::Baud4800,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub const fn bits_per_second(self) -> u32 {
        match self {
            GpsBaudRate::Baud115200 => 115_200,
            GpsBaudRate::Baud57600 => 57_600,
            GpsBaudRate::Baud38400 => 38_400,
            GpsBaudRate::Baud19200 => 19_200,
            GpsBaudRate::Baud9600 => 9_600,
            GpsBaudRate::Baud4800 => 4_800,
        }
    }

    /// Position in [`GpsBaudRate::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_bits_per_second(bps: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.bits_per_second() == bps)
    }
}

/// Receiver configuration, loaded by the caller from its settings store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GpsConfig {
    pub provider: GpsProvider,
    /// Baud rate the receiver is asked to switch to, and the port ends up at
    pub baud_rate: GpsBaudRate,
    /// Probe every candidate baud rate with a "switch baud" command
    pub auto_baud: bool,
    /// Send the report-rate and update-rate commands after the baud is set
    pub auto_config: bool,
}

impl Default for GpsConfig {
    fn default() -> Self {
        Self {
            provider: GpsProvider::default(),
            baud_rate: GpsBaudRate::default(),
            auto_baud: true,
            auto_config: true,
        }
    }
}
