//! A proptest generator for NMEA GGA sentences.
//!
//! The strategy builds structurally valid `$GPGGA`/`$GNGGA` frames from
//! randomized field values, with a correct checksum, and keeps the expected
//! fixed-point values next to them.

use nmea_gps::{sentence_checksum, NavigationSolution, Parser, Sentence, Statistics};
use proptest::prelude::*;

#[derive(Debug, Clone)]
pub struct GgaFields {
    pub talker: &'static str,
    pub lat_deg: u32,        // 0..=89
    pub lat_min: u32,        // 0..=59
    pub lat_frac: u32,       // ten-thousandths of a minute
    pub south: bool,
    pub lon_deg: u32,        // 0..=179
    pub lon_min: u32,
    pub lon_frac: u32,
    pub west: bool,
    pub fix: u8,             // fix indicator digit
    pub num_sat: u8,
    pub hdop_tenths: u32,    // hdop * 10
    pub alt_tenths: u32,     // altitude [dm]
}

impl GgaFields {
    pub fn to_sentence(&self) -> Vec<u8> {
        let body = format!(
            "{}GGA,123519,{:02}{:02}.{:04},{},{:03}{:02}.{:04},{},{},{:02},{}.{},{}.{},M,46.9,M,,",
            self.talker,
            self.lat_deg,
            self.lat_min,
            self.lat_frac,
            if self.south { 'S' } else { 'N' },
            self.lon_deg,
            self.lon_min,
            self.lon_frac,
            if self.west { 'W' } else { 'E' },
            self.fix,
            self.num_sat,
            self.hdop_tenths / 10,
            self.hdop_tenths % 10,
            self.alt_tenths / 10,
            self.alt_tenths % 10,
        );
        let checksum = sentence_checksum(body.as_bytes());
        format!("${}*{:02X}\r\n", body, checksum).into_bytes()
    }

    fn degrees_e7(deg: u32, min: u32, frac: u32, negative: bool) -> i32 {
        let value = (deg * 10_000_000 + (min * 1_000_000 + frac * 100) / 6) as i32;
        if negative {
            -value
        } else {
            value
        }
    }

    pub fn expected_lat(&self) -> i32 {
        Self::degrees_e7(self.lat_deg, self.lat_min, self.lat_frac, self.south)
    }

    pub fn expected_lon(&self) -> i32 {
        Self::degrees_e7(self.lon_deg, self.lon_min, self.lon_frac, self.west)
    }
}

fn gga_fields_strategy() -> impl Strategy<Value = GgaFields> {
    (
        prop_oneof![Just("GP"), Just("GN")],
        (0u32..90, 0u32..60, 0u32..10_000, any::<bool>()),
        (0u32..180, 0u32..60, 0u32..10_000, any::<bool>()),
        0u8..=8,
        0u8..=40,
        0u32..1000,
        0u32..100_000,
    )
        .prop_map(
            |(talker, lat, lon, fix, num_sat, hdop_tenths, alt_tenths)| GgaFields {
                talker,
                lat_deg: lat.0,
                lat_min: lat.1,
                lat_frac: lat.2,
                south: lat.3,
                lon_deg: lon.0,
                lon_min: lon.1,
                lon_frac: lon.2,
                west: lon.3,
                fix,
                num_sat,
                hdop_tenths,
                alt_tenths,
            },
        )
}

/// Frames generated by [`gga_fields_strategy`], plus the bytes
pub fn gga_frame_strategy() -> impl Strategy<Value = (GgaFields, Vec<u8>)> {
    gga_fields_strategy().prop_map(|fields| {
        let frame = fields.to_sentence();
        (fields, frame)
    })
}

/// Line noise without `$`, so it cannot open a sentence of its own
fn garbage_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>().prop_filter("no sync char", |b| *b != b'$'), 0..64)
}

proptest! {
    #[test]
    fn test_parser_with_generated_gga_frames((fields, frame) in gga_frame_strategy()) {
        let mut parser = Parser::default();
        let events: Vec<_> = parser.consume(&frame).collect();
        prop_assert_eq!(events.len(), 1);

        let fix = match events[0] {
            Ok(Sentence::FixData(fix)) => fix,
            ref other => panic!("expected fix data, got {:?}", other),
        };
        prop_assert_eq!(fix.latitude, fields.expected_lat());
        prop_assert_eq!(fix.longitude, fields.expected_lon());
        prop_assert_eq!(fix.fix, fields.fix > 0);
        prop_assert_eq!(fix.num_sat, fields.num_sat);
        prop_assert_eq!(fix.hdop, fields.hdop_tenths * 10);
        prop_assert_eq!(fix.altitude, (fields.alt_tenths * 10) as i32);
    }

    #[test]
    fn test_parser_resyncs_after_garbage(
        garbage in garbage_strategy(),
        (fields, frame) in gga_frame_strategy(),
    ) {
        let mut data = garbage;
        // a fresh `$` always restarts the sentence, whatever came before
        data.extend_from_slice(&frame);

        let mut parser = Parser::default();
        let mut solution = NavigationSolution::default();
        let mut stats = Statistics::default();
        let mut frames = 0;
        for event in parser.consume(&data) {
            stats.record(&event);
            if let Ok(sentence) = event {
                if solution.apply(&sentence) {
                    frames += 1;
                }
            }
        }
        prop_assert_eq!(frames, 1);
        prop_assert_eq!(solution.num_sat, fields.num_sat);
        if fields.fix > 0 {
            prop_assert_eq!(solution.llh.lat, fields.expected_lat());
            prop_assert_eq!(solution.llh.lon, fields.expected_lon());
        }
    }

    #[test]
    fn test_parser_never_panics(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let mut parser = Parser::default();
        let mut stats = Statistics::default();
        for event in parser.consume(&data) {
            stats.record(&event);
        }
        prop_assert!(stats.packet_count as usize + stats.errors as usize <= data.len());
    }
}
