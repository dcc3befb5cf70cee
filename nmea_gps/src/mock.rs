//! In-memory transport and clock for host testing
//!
//! ```
//! use nmea_gps::mock::{MockClock, MockTransport};
//! use nmea_gps::{Clock, SerialTransport};
//!
//! let mut port = MockTransport::new();
//! port.inject_rx_data(b"$");
//! assert_eq!(Some(b'$'), port.read_byte());
//!
//! port.print(b"$PMTK220,200*2C\r\n");
//! assert_eq!(b"$PMTK220,200*2C\r\n".as_slice(), port.tx_buffer());
//!
//! let clock = MockClock::new();
//! let handle = clock.clone();
//! handle.advance(250);
//! assert_eq!(250, clock.millis());
//! ```

use std::{cell::Cell, collections::VecDeque, rc::Rc, vec::Vec};

use crate::transport::{Clock, SerialTransport};

/// Mock serial port
///
/// Everything written lands in a transmit log. A transmit queue of limited
/// capacity can be enabled to exercise back-pressure; it only drains when the
/// test calls [`MockTransport::drain_tx`].
#[derive(Debug, Default)]
pub struct MockTransport {
    rx: VecDeque<u8>,
    tx_log: Vec<u8>,
    tx_pending: usize,
    tx_capacity: Option<usize>,
    baud_rate: Option<u32>,
    baud_history: Vec<u32>,
}

impl MockTransport {
    /// Port with an unbounded transmit buffer that is always empty
    pub fn new() -> Self {
        Self::default()
    }

    /// Port whose transmit buffer holds at most `capacity` unsent bytes
    pub fn with_tx_capacity(capacity: usize) -> Self {
        Self {
            tx_capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Inject receive data (for test setup)
    pub fn inject_rx_data(&mut self, data: &[u8]) {
        self.rx.extend(data);
    }

    /// Everything written so far
    pub fn tx_buffer(&self) -> &[u8] {
        &self.tx_log
    }

    pub fn clear_tx_buffer(&mut self) {
        self.tx_log.clear();
    }

    /// Pretend `n` queued bytes went out on the wire
    pub fn drain_tx(&mut self, n: usize) {
        self.tx_pending = self.tx_pending.saturating_sub(n);
    }

    pub fn drain_all_tx(&mut self) {
        self.tx_pending = 0;
    }

    /// Current baud rate, `None` until the driver set one
    pub fn baud_rate(&self) -> Option<u32> {
        self.baud_rate
    }

    /// Every baud rate set, in order
    pub fn baud_history(&self) -> &[u32] {
        &self.baud_history
    }
}

impl SerialTransport for MockTransport {
    fn rx_bytes_waiting(&self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn tx_bytes_free(&self) -> usize {
        match self.tx_capacity {
            Some(cap) => cap.saturating_sub(self.tx_pending),
            None => usize::MAX,
        }
    }

    fn write_byte(&mut self, byte: u8) {
        self.tx_log.push(byte);
        if self.tx_capacity.is_some() {
            self.tx_pending += 1;
        }
    }

    fn is_tx_empty(&self) -> bool {
        self.tx_pending == 0
    }

    fn set_baud_rate(&mut self, baud: u32) {
        self.baud_rate = Some(baud);
        self.baud_history.push(baud);
    }
}

/// Mock clock, clones share the same counter so a test can keep a handle
/// while the driver owns the other.
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    now_ms: Rc<Cell<u32>>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(ms: u32) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(ms)),
        }
    }

    pub fn advance(&self, ms: u32) {
        self.now_ms.set(self.now_ms.get().wrapping_add(ms));
    }

    pub fn set(&self, ms: u32) {
        self.now_ms.set(ms);
    }
}

impl Clock for MockClock {
    fn millis(&self) -> u32 {
        self.now_ms.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_tx_reports_back_pressure() {
        let mut port = MockTransport::with_tx_capacity(4);
        assert_eq!(4, port.tx_bytes_free());
        port.print(b"abc");
        assert_eq!(1, port.tx_bytes_free());
        assert!(!port.is_tx_empty());
        port.drain_tx(2);
        assert_eq!(3, port.tx_bytes_free());
        port.drain_all_tx();
        assert!(port.is_tx_empty());
        assert_eq!(b"abc", port.tx_buffer());
    }

    #[test]
    fn rx_is_fifo() {
        let mut port = MockTransport::new();
        port.inject_rx_data(b"ab");
        port.inject_rx_data(b"c");
        assert_eq!(3, port.rx_bytes_waiting());
        assert_eq!(Some(b'a'), port.read_byte());
        assert_eq!(Some(b'b'), port.read_byte());
        assert_eq!(Some(b'c'), port.read_byte());
        assert_eq!(None, port.read_byte());
    }

    #[test]
    fn clock_wraps() {
        let clock = MockClock::starting_at(u32::MAX);
        clock.advance(2);
        assert_eq!(1, clock.millis());
    }
}
