use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{value_parser, Arg, ArgAction, ArgMatches};
use log::{debug, info, warn};
use nmea_gps::*;
use serialport::{FlowControl as SerialFlowControl, SerialPort};
use std::{
    collections::VecDeque,
    io::{self, Read, Write},
    path::PathBuf,
    time::{Duration, Instant},
};

/// Software transmit queue size, what the driver sees as the TX buffer
const TX_QUEUE_CAPACITY: usize = 256;
const TICK: Duration = Duration::from_millis(10);

/// Non-blocking view of an OS serial port.
///
/// The driver only touches the in-memory queues; [`SerialPortTransport::pump`]
/// moves bytes between them and the device once per tick.
struct SerialPortTransport {
    port: Box<dyn SerialPort>,
    rx: VecDeque<u8>,
    tx: VecDeque<u8>,
}

impl SerialPortTransport {
    fn new(port: Box<dyn SerialPort>) -> Self {
        Self {
            port,
            rx: VecDeque::new(),
            tx: VecDeque::with_capacity(TX_QUEUE_CAPACITY),
        }
    }

    fn pump(&mut self) -> Result<()> {
        let waiting = self.port.bytes_to_read()? as usize;
        if waiting > 0 {
            let mut buf = vec![0; waiting];
            match self.port.read(&mut buf) {
                Ok(n) => self.rx.extend(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {},
                Err(e) => return Err(e).context("Failed to read from port"),
            }
        }

        if !self.tx.is_empty() {
            let (front, _) = self.tx.as_slices();
            match self.port.write(front) {
                Ok(n) => {
                    self.tx.drain(..n);
                },
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {},
                Err(e) => return Err(e).context("Failed to write to port"),
            }
        }
        Ok(())
    }
}

impl SerialTransport for SerialPortTransport {
    fn rx_bytes_waiting(&self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn tx_bytes_free(&self) -> usize {
        TX_QUEUE_CAPACITY.saturating_sub(self.tx.len())
    }

    fn write_byte(&mut self, byte: u8) {
        self.tx.push_back(byte);
    }

    fn is_tx_empty(&self) -> bool {
        self.tx.is_empty()
    }

    fn set_baud_rate(&mut self, baud: u32) {
        // queued bytes belong to the old rate
        if let Err(e) = self.port.flush() {
            warn!("Failed to flush port before baud change: {e}");
        }
        if let Err(e) = self.port.set_baud_rate(baud) {
            warn!("Failed to set port baud rate to {baud}: {e}");
        }
    }
}

/// Milliseconds since program start, wrapping like a hardware tick counter
struct SystemClock {
    start: Instant,
}

impl Clock for SystemClock {
    fn millis(&self) -> u32 {
        // truncation is the wrap
        self.start.elapsed().as_millis() as u32
    }
}

fn cli() -> clap::Command {
    clap::Command::new("NMEA GPS CLI")
        .version(clap::crate_version!())
        .about("Drives an NMEA receiver and prints each navigation solution as JSON")
        .arg(
            Arg::new("port")
                .value_name("port")
                .short('p')
                .long("port")
                .required(false)
                .help("Serial port of the receiver. Without it a capture is replayed from stdin"),
        )
        .arg(
            Arg::new("baud")
                .value_name("baud")
                .short('s')
                .long("baud")
                .value_parser(value_parser!(u32))
                .help("Baud rate the receiver is switched to [115200, 57600, 38400, 19200, 9600, 4800]"),
        )
        .arg(
            Arg::new("provider")
                .long("provider")
                .value_parser(["mtk", "sirf"])
                .help("Receiver family, selects the configuration commands"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("file")
                .value_parser(value_parser!(PathBuf))
                .help("JSON receiver configuration, command line flags take precedence"),
        )
        .arg(
            Arg::new("no-auto-baud")
                .long("no-auto-baud")
                .action(ArgAction::SetTrue)
                .help("Do not probe the candidate baud rates"),
        )
        .arg(
            Arg::new("no-auto-config")
                .long("no-auto-config")
                .action(ArgAction::SetTrue)
                .help("Do not send the report/update rate commands"),
        )
}

fn gps_config(matches: &ArgMatches) -> Result<GpsConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Invalid configuration in {}", path.display()))?
        },
        None => GpsConfig::default(),
    };

    if let Some(&baud) = matches.get_one::<u32>("baud") {
        config.baud_rate = match GpsBaudRate::from_bits_per_second(baud) {
            Some(rate) => rate,
            None => bail!("Unsupported baud rate {baud}"),
        };
    }
    match matches.get_one::<String>("provider").map(|s| s.as_str()) {
        Some("mtk") => config.provider = GpsProvider::Nmea,
        Some("sirf") => config.provider = GpsProvider::NmeaSirf,
        _ => {},
    }
    if matches.get_flag("no-auto-baud") {
        config.auto_baud = false;
    }
    if matches.get_flag("no-auto-config") {
        config.auto_config = false;
    }
    Ok(config)
}

fn print_solution(solution: &NavigationSolution) {
    let line = serde_json::json!({
        "received": Utc::now().to_rfc3339(),
        "solution": solution,
    });
    println!("{line}");
}

fn run_port(port_name: &str, config: GpsConfig) -> Result<()> {
    let port = serialport::new(port_name, config.baud_rate.bits_per_second())
        .timeout(Duration::from_millis(1))
        .flow_control(SerialFlowControl::None)
        .open()
        .with_context(|| format!("Failed to open port: {port_name}"))?;

    let clock = SystemClock {
        start: Instant::now(),
    };
    let mut gps = GpsDriver::with_port(config, SerialPortTransport::new(port), clock);
    let mut state = gps.state();
    info!("Driving receiver on {port_name} with {config:?}");

    loop {
        if let Some(port) = gps.port_mut() {
            port.pump()?;
        }
        if gps.handle() {
            print_solution(gps.solution());
        }
        if gps.state() != state {
            state = gps.state();
            info!("Receiver state: {state:?}");
        }
        std::thread::sleep(TICK);
    }
}

fn replay(reader: impl Read) -> Result<()> {
    let mut parser = Parser::default();
    let mut solution = NavigationSolution::default();
    let mut stats = Statistics::default();

    let data: Vec<u8> = reader
        .bytes()
        .collect::<io::Result<_>>()
        .context("Failed to read capture")?;
    for event in parser.consume(&data) {
        stats.record(&event);
        match event {
            Ok(sentence) => {
                if solution.apply(&sentence) {
                    print_solution(&solution);
                }
            },
            Err(e) => debug!("Dropped sentence: {e}"),
        }
    }
    io::stdout().flush()?;
    info!(
        "{} sentences, {} checksum errors",
        stats.packet_count, stats.errors
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .format_timestamp(None)
        .format_target(false)
        .filter_level(log::LevelFilter::Info)
        .parse_env("LOG_LEVEL")
        .init();

    let matches = cli().get_matches();
    let config = gps_config(&matches)?;

    match matches.get_one::<String>("port") {
        Some(port) => run_port(port, config),
        None => replay(io::stdin().lock()),
    }
}
