use crate::transport::{Clock, SerialTransport};

use super::GpsDriver;

impl<T: SerialTransport, C: Clock> GpsDriver<T, C> {
    /// Stream `cmd` into the transmit buffer as space allows, resuming where the
    /// previous call stopped.
    ///
    /// Returns `true` once every byte is written and the transmit buffer has
    /// drained; the position cursor is then reset for the next command.
    pub fn transmit_auto_config_command(&mut self, cmd: &[u8]) -> bool {
        let Some(port) = self.port.as_mut() else {
            return false;
        };

        while port.tx_bytes_free() > 0 {
            match cmd.get(self.auto_config_position) {
                Some(&byte) => {
                    port.write_byte(byte);
                    self.auto_config_position += 1;
                },
                None if port.is_tx_empty() => {
                    self.auto_config_position = 0;
                    return true;
                },
                None => return false,
            }
        }
        false
    }
}
