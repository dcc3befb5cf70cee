use log::{debug, trace};

use crate::{
    commands::set_baud_command,
    config::GpsBaudRate,
    constants::GPS_BAUD_CHANGE_DELAY_MS,
    transport::{Clock, SerialTransport},
};

use super::{GpsDriver, GpsState};

impl<T: SerialTransport, C: Clock> GpsDriver<T, C> {
    /// Probe every candidate baud rate with the "switch to the configured baud"
    /// command, then settle the port on the configured rate.
    ///
    /// No acknowledgement is expected from the receiver. Always returns `false`.
    pub fn change_baud(&mut self) -> bool {
        if !self.config.auto_baud {
            self.finalize_baud();
            return false;
        }

        match GpsBaudRate::ALL.get(self.auto_baudrate_index) {
            Some(&candidate) => {
                if self.dwell_elapsed(GPS_BAUD_CHANGE_DELAY_MS) && self.tx_empty() {
                    let cmd = set_baud_command(self.config.provider, self.config.baud_rate);
                    if let Some(port) = self.port.as_mut() {
                        trace!("GPS probing at {} baud", candidate.bits_per_second());
                        port.set_baud_rate(candidate.bits_per_second());
                        port.print(cmd);
                    }
                    let next = self.auto_baudrate_index + 1;
                    self.set_state(GpsState::ChangeBaud);
                    self.auto_baudrate_index = next;
                }
            },
            None => {
                if self.tx_empty() {
                    self.finalize_baud();
                }
            },
        }
        false
    }

    fn finalize_baud(&mut self) {
        let bps = self.config.baud_rate.bits_per_second();
        if let Some(port) = self.port.as_mut() {
            port.set_baud_rate(bps);
        }
        debug!("GPS port set to {bps} baud");
        self.set_state(GpsState::CheckVersion);
    }
}
