//! # nmea_gps
//!
//! Driver for satellite-positioning receivers speaking NMEA 0183 over a serial
//! link. It negotiates the link baud rate, pushes the vendor configuration
//! sentences for MediaTek and SiRF receivers, then decodes `GGA` and `RMC`
//! sentences into a [`NavigationSolution`].
//!
//! The library never allocates and never blocks, so it runs on a
//! microcontroller as well as on a host (see the `nmea_gps_cli` crate).
//!
//! Parsing Sentences
//! =================
//!
//! The [`Parser`] can be used on its own. It is fed byte by byte (or chunk by
//! chunk through [`Parser::consume`]) and yields an event each time a sentence
//! with a checksum field ends:
//! ```
//! use nmea_gps::{NavigationSolution, Parser, Statistics};
//!
//! let mut parser = Parser::new();
//! let mut solution = NavigationSolution::default();
//! let mut stats = Statistics::default();
//!
//! let raw = b"garbage$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";
//! for event in parser.consume(raw) {
//!     stats.record(&event);
//!     if let Ok(sentence) = event {
//!         solution.apply(&sentence);
//!     }
//! }
//! assert_eq!(481_173_000, solution.llh.lat);
//! assert_eq!(1, stats.packet_count);
//! ```
//!
//! Driving a Receiver
//! ==================
//!
//! [`GpsDriver`] owns a [`SerialTransport`] and a [`Clock`] and is ticked by
//! the caller through [`GpsDriver::handle`]. It walks through
//! [`GpsState::Initializing`], [`GpsState::ChangeBaud`],
//! [`GpsState::Configure`] and finally stays in [`GpsState::ReceivingData`].
//! In-memory implementations of both traits live in [`mock`] (feature `std`).

#![cfg_attr(not(any(feature = "std", test)), no_std)]

extern crate core;
#[cfg(feature = "serde")]
extern crate serde;

pub use crate::{
    config::{GpsBaudRate, GpsConfig, GpsProvider},
    constants::{GPS_BAUD_CHANGE_DELAY_MS, GPS_NMEA_CONFIG_DELAY_MS},
    driver::{GpsDriver, GpsState},
    error::{DateTimeError, ParserError},
    parser::{sentence_checksum, Parser, ParserIter, PendingFix, Sentence},
    solution::{
        constrain_epe, constrain_hdop, GpsFixType, Llh, NavigationSolution, SolutionFlags,
        Statistics,
    },
    transport::{Clock, SerialTransport},
};

pub mod commands;
mod config;
mod constants;
mod driver;
mod error;
pub mod field;
#[cfg(any(feature = "std", test))]
pub mod mock;
mod parser;
mod solution;
mod transport;
