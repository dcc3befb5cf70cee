#[macro_use]
extern crate afl;
extern crate nmea_gps;

use nmea_gps::{NavigationSolution, Parser, Sentence, Statistics};

const GGA: &[u8] = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

fn parse(chunksize: usize, data: &[u8]) {
    let mut parser = Parser::new();
    let mut solution = NavigationSolution::default();
    let mut stats = Statistics::default();
    for chunk in data.chunks(chunksize) {
        for event in parser.consume(chunk) {
            stats.record(&event);
            if let Ok(sentence) = event {
                solution.apply(&sentence);
            }
        }
    }

    // `$` restarts the parser, so whatever came before a complete sentence
    // must not affect it
    for _ in 0..2 {
        let mut it = parser.consume(GGA);
        match it.next() {
            Some(Ok(Sentence::FixData(fix))) => {
                assert_eq!(481_173_000, fix.latitude);
                assert_eq!(8, fix.num_sat);
            },
            other => panic!("expected a fix, got {:?}", other),
        }
        assert!(it.next().is_none());
    }
    assert!(stats.packet_count as usize + stats.errors as usize <= data.len());
}

fn main() {
    fuzz!(|data: &[u8]| {
        if data.len() > 1 {
            let chunksize = data[0] as usize;
            if chunksize != 0 {
                parse(chunksize, &data[1..]);
            }
        }
    });
}
