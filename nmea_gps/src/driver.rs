//! Receiver driver: baud negotiation, vendor configuration and the
//! steady-state receive loop, advanced one step per [`GpsDriver::handle`] call.

use log::{debug, info, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    config::GpsConfig,
    parser::Parser,
    solution::{NavigationSolution, Statistics},
    transport::{Clock, SerialTransport},
};

mod baud;
mod configure;
mod sender;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpsState {
    /// No transport attached
    #[default]
    Unknown,
    Initializing,
    ChangeBaud,
    CheckVersion,
    Configure,
    ReceivingData,
}

/// NMEA receiver driver.
///
/// Owns the transport, the parser and the navigation solution. The caller
/// invokes [`handle`](Self::handle) once per scheduling tick; no call ever
/// blocks and the work done per call is bounded by the bytes already received.
///
/// ```
/// use nmea_gps::mock::{MockClock, MockTransport};
/// use nmea_gps::{GpsConfig, GpsDriver, GpsState};
///
/// let config = GpsConfig {
///     auto_baud: false,
///     auto_config: false,
///     ..Default::default()
/// };
/// let mut gps = GpsDriver::with_port(config, MockTransport::new(), MockClock::new());
/// while gps.state() != GpsState::ReceivingData {
///     gps.handle();
/// }
///
/// if let Some(port) = gps.port_mut() {
///     port.inject_rx_data(b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n");
/// }
/// assert!(gps.handle());
/// assert_eq!(8, gps.solution().num_sat);
/// ```
#[derive(Debug)]
pub struct GpsDriver<T, C> {
    config: GpsConfig,
    clock: C,
    port: Option<T>,
    state: GpsState,
    last_state_switch_ms: u32,
    auto_config_step: usize,
    auto_config_position: usize,
    auto_baudrate_index: usize,
    parser: Parser,
    solution: NavigationSolution,
    statistics: Statistics,
}

impl<T: SerialTransport, C: Clock> GpsDriver<T, C> {
    /// Driver without a transport, idle until [`attach_port`](Self::attach_port)
    pub fn new(config: GpsConfig, clock: C) -> Self {
        let now = clock.millis();
        Self {
            config,
            clock,
            port: None,
            state: GpsState::Unknown,
            last_state_switch_ms: now,
            auto_config_step: 0,
            auto_config_position: 0,
            auto_baudrate_index: 0,
            parser: Parser::new(),
            solution: NavigationSolution::default(),
            statistics: Statistics::default(),
        }
    }

    pub fn with_port(config: GpsConfig, port: T, clock: C) -> Self {
        let mut driver = Self::new(config, clock);
        driver.attach_port(port);
        driver
    }

    /// Replace the transport and restart the whole sequence from
    /// [`GpsState::Initializing`]. Returns the previous transport.
    pub fn attach_port(&mut self, port: T) -> Option<T> {
        let previous = self.port.replace(port);
        self.parser = Parser::new();
        self.restart(GpsState::Initializing);
        previous
    }

    pub fn detach_port(&mut self) -> Option<T> {
        let previous = self.port.take();
        self.restart(GpsState::Unknown);
        previous
    }

    /// Run one tick. Returns `true` when a fix data sentence was committed
    /// during this tick and the driver is in [`GpsState::ReceivingData`].
    pub fn handle(&mut self) -> bool {
        let has_new_data = self.receive_data();

        match self.state {
            GpsState::Unknown => false,
            GpsState::Initializing => {
                self.set_state(GpsState::ChangeBaud);
                false
            },
            GpsState::ChangeBaud => self.change_baud(),
            GpsState::CheckVersion | GpsState::Configure => {
                if self.config.auto_config {
                    self.configure()
                } else {
                    self.set_state(GpsState::ReceivingData);
                    info!("GPS auto-configuration disabled, receiving data");
                    false
                }
            },
            GpsState::ReceivingData => has_new_data,
        }
    }

    pub fn state(&self) -> GpsState {
        self.state
    }

    pub fn solution(&self) -> &NavigationSolution {
        &self.solution
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn config(&self) -> &GpsConfig {
        &self.config
    }

    pub fn port(&self) -> Option<&T> {
        self.port.as_ref()
    }

    pub fn port_mut(&mut self) -> Option<&mut T> {
        self.port.as_mut()
    }

    /// Drain every waiting byte through the parser and commit the validated
    /// sentences. Returns `true` if a frame was completed.
    fn receive_data(&mut self) -> bool {
        let Some(port) = self.port.as_mut() else {
            return false;
        };

        let mut has_new_data = false;
        while port.rx_bytes_waiting() > 0 {
            let Some(c) = port.read_byte() else {
                break;
            };
            let Some(result) = self.parser.consume_byte(c) else {
                continue;
            };
            self.statistics.record(&result);
            match result {
                Ok(sentence) => {
                    trace!("{sentence:?}");
                    if self.solution.apply(&sentence) {
                        self.solution.toggle_heartbeat();
                        self.solution.clear_velocity_flags();
                        has_new_data = true;
                    }
                },
                Err(err) => debug!("GPS sentence dropped: {err}"),
            }
        }
        has_new_data
    }

    /// Switching to another state zeroes the step cursors, re-entering the
    /// current one only restarts the dwell timer.
    fn set_state(&mut self, state: GpsState) {
        if state != self.state {
            debug!("GPS state {:?} -> {:?}", self.state, state);
            self.state = state;
            self.reset_cursors();
        }
        self.last_state_switch_ms = self.clock.millis();
    }

    fn restart(&mut self, state: GpsState) {
        self.set_state(state);
        self.reset_cursors();
    }

    fn reset_cursors(&mut self) {
        self.auto_config_step = 0;
        self.auto_config_position = 0;
        self.auto_baudrate_index = 0;
    }

    fn dwell_elapsed(&self, delay_ms: u32) -> bool {
        self.clock.elapsed_since(self.last_state_switch_ms) >= delay_ms
    }

    fn tx_empty(&self) -> bool {
        self.port.as_ref().is_some_and(|port| port.is_tx_empty())
    }
}
