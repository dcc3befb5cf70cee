//! Navigation solution and receiver statistics shared with the rest of the autopilot.

use bitflags::bitflags;
use chrono::NaiveDateTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{GPS_EPE_MAX, GPS_HDOP_MAX, GPS_HDOP_TO_EPH_MULTIPLIER},
    error::ParserError,
    parser::{PendingFix, Sentence},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpsFixType {
    #[default]
    NoFix,
    /// NMEA does not report the fix dimension, any fix is taken as 3D
    Fix3D,
}

bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct SolutionFlags: u8 {
        /// Toggled every time a fix data sentence is committed
        const GPS_HEARTBEAT = 1;
        const VALID_VEL_NE = 2;
        const VALID_VEL_D = 4;
        const VALID_EPE = 8;
    }
}

/// Latitude, longitude, altitude
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Llh {
    /// [1e-7 deg]
    pub lat: i32,
    /// [1e-7 deg]
    pub lon: i32,
    /// [cm]
    pub alt: i32,
}

/// Latest navigation solution reported by the receiver
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavigationSolution {
    pub fix_type: GpsFixType,
    pub num_sat: u8,
    pub llh: Llh,
    pub hdop: u16,
    /// Horizontal position error estimate [cm]
    pub eph: u16,
    /// Vertical position error estimate [cm]
    pub epv: u16,
    /// [cm/s]
    pub ground_speed: u16,
    /// [deg * 10]
    pub ground_course: u16,
    /// UTC date and time of the last RMC report carrying both
    pub time: Option<NaiveDateTime>,
    pub flags: SolutionFlags,
}

pub fn constrain_hdop(hdop: u32) -> u16 {
    // clamped to 9999, always fits
    hdop.min(GPS_HDOP_MAX) as u16
}

pub fn constrain_epe(epe: u32) -> u16 {
    // clamped to 9999, always fits
    epe.min(GPS_EPE_MAX) as u16
}

impl NavigationSolution {
    /// Commit a validated sentence.
    ///
    /// Returns `true` when a new frame is ready, which only fix data sentences
    /// produce. Speed and course from RMC are folded in silently.
    pub fn apply(&mut self, sentence: &Sentence) -> bool {
        match sentence {
            Sentence::FixData(fix) => {
                self.commit_fix_data(fix);
                true
            },
            Sentence::RecommendedMinimum(fix) => {
                self.commit_recommended_minimum(fix);
                false
            },
            Sentence::Unrecognized => false,
        }
    }

    fn commit_fix_data(&mut self, fix: &PendingFix) {
        self.num_sat = fix.num_sat;
        if fix.fix {
            self.fix_type = GpsFixType::Fix3D;
            self.llh = Llh {
                lat: fix.latitude,
                lon: fix.longitude,
                alt: fix.altitude,
            };

            // EPH/EPV are unreliable for NMEA as they are not real accuracy
            let epe = fix.hdop.saturating_mul(GPS_HDOP_TO_EPH_MULTIPLIER);
            self.hdop = constrain_hdop(fix.hdop);
            self.eph = constrain_epe(epe);
            self.epv = constrain_epe(epe);
            self.flags.remove(SolutionFlags::VALID_EPE);
        } else {
            self.fix_type = GpsFixType::NoFix;
        }

        // NMEA does not report VELNED
        self.clear_velocity_flags();
    }

    fn commit_recommended_minimum(&mut self, fix: &PendingFix) {
        self.ground_speed = fix.speed;
        self.ground_course = fix.ground_course;
        self.time = match (fix.date, fix.time) {
            (Some(date), Some(time)) => Some(date.and_time(time)),
            _ => None,
        };
    }

    pub(crate) fn clear_velocity_flags(&mut self) {
        self.flags
            .remove(SolutionFlags::VALID_VEL_NE | SolutionFlags::VALID_VEL_D);
    }

    pub(crate) fn toggle_heartbeat(&mut self) {
        self.flags.toggle(SolutionFlags::GPS_HEARTBEAT);
    }

    pub fn has_fix(&self) -> bool {
        self.fix_type != GpsFixType::NoFix
    }

    /// Latitude in degrees
    pub fn latitude_deg(&self) -> f64 {
        f64::from(self.llh.lat) / 1e7
    }

    /// Longitude in degrees
    pub fn longitude_deg(&self) -> f64 {
        f64::from(self.llh.lon) / 1e7
    }
}

/// Receiver link statistics, counters only ever grow
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Statistics {
    /// Sentences with a valid checksum, recognized or not
    pub packet_count: u32,
    /// Sentences whose checksum did not validate
    pub errors: u32,
}

impl Statistics {
    pub fn record(&mut self, result: &Result<Sentence, ParserError>) {
        match result {
            Ok(_) => self.packet_count = self.packet_count.wrapping_add(1),
            Err(_) => self.errors = self.errors.wrapping_add(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn gga_fix() -> PendingFix {
        PendingFix {
            fix: true,
            latitude: 481_173_000,
            longitude: 115_166_666,
            num_sat: 8,
            altitude: 54540,
            hdop: 90,
            ..Default::default()
        }
    }

    #[test]
    fn fix_data_commit() {
        let mut sol = NavigationSolution {
            flags: SolutionFlags::VALID_VEL_NE | SolutionFlags::VALID_VEL_D | SolutionFlags::VALID_EPE,
            ..Default::default()
        };
        assert!(sol.apply(&Sentence::FixData(gga_fix())));
        assert_eq!(GpsFixType::Fix3D, sol.fix_type);
        assert_eq!(8, sol.num_sat);
        assert_eq!(
            Llh {
                lat: 481_173_000,
                lon: 115_166_666,
                alt: 54540
            },
            sol.llh
        );
        assert_eq!(90, sol.hdop);
        assert_eq!(180, sol.eph);
        assert_eq!(180, sol.epv);
        assert!(sol.flags.is_empty());
        assert!((sol.latitude_deg() - 48.1173).abs() < 1e-6);
    }

    #[test]
    fn no_fix_keeps_last_position() {
        let mut sol = NavigationSolution::default();
        sol.apply(&Sentence::FixData(gga_fix()));
        let lost = PendingFix {
            num_sat: 3,
            ..Default::default()
        };
        assert!(sol.apply(&Sentence::FixData(lost)));
        assert_eq!(GpsFixType::NoFix, sol.fix_type);
        assert_eq!(3, sol.num_sat);
        assert_eq!(481_173_000, sol.llh.lat);
    }

    #[test]
    fn error_estimates_are_clamped() {
        let mut sol = NavigationSolution::default();
        let fix = PendingFix {
            hdop: 9000,
            ..gga_fix()
        };
        sol.apply(&Sentence::FixData(fix));
        assert_eq!(9000, sol.hdop);
        assert_eq!(9999, sol.eph);
        assert_eq!(9999, sol.epv);
    }

    #[test]
    fn recommended_minimum_commit() {
        let mut sol = NavigationSolution::default();
        sol.apply(&Sentence::FixData(gga_fix()));
        let before = sol;
        let rmc = PendingFix {
            speed: 1152,
            ground_course: 844,
            time: NaiveTime::from_hms_opt(12, 35, 19),
            date: NaiveDate::from_ymd_opt(2094, 3, 23),
            ..Default::default()
        };
        assert!(!sol.apply(&Sentence::RecommendedMinimum(rmc)));
        assert_eq!(1152, sol.ground_speed);
        assert_eq!(844, sol.ground_course);
        assert_eq!(
            NaiveDate::from_ymd_opt(2094, 3, 23)
                .and_then(|d| d.and_hms_opt(12, 35, 19)),
            sol.time
        );
        assert_eq!(before.llh, sol.llh);
        assert_eq!(before.fix_type, sol.fix_type);
        assert_eq!(before.num_sat, sol.num_sat);
    }

    #[test]
    fn recommended_minimum_without_date_clears_time() {
        let mut sol = NavigationSolution {
            time: NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 1)),
            ..Default::default()
        };
        let rmc = PendingFix {
            time: NaiveTime::from_hms_opt(12, 35, 19),
            ..Default::default()
        };
        sol.apply(&Sentence::RecommendedMinimum(rmc));
        assert_eq!(None, sol.time);
    }

    #[test]
    fn unrecognized_changes_nothing() {
        let mut sol = NavigationSolution::default();
        assert!(!sol.apply(&Sentence::Unrecognized));
        assert_eq!(NavigationSolution::default(), sol);
    }

    #[test]
    fn statistics_count_both_outcomes() {
        let mut stats = Statistics::default();
        stats.record(&Ok(Sentence::Unrecognized));
        stats.record(&Err(ParserError::MalformedChecksum));
        stats.record(&Ok(Sentence::FixData(gga_fix())));
        assert_eq!(
            Statistics {
                packet_count: 2,
                errors: 1
            },
            stats
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn solution_serializes() {
        let mut sol = NavigationSolution::default();
        sol.apply(&Sentence::FixData(gga_fix()));
        let json = serde_json::to_value(sol).unwrap();
        assert_eq!(8, json["num_sat"]);
        assert_eq!("Fix3D", json["fix_type"]);
    }
}
