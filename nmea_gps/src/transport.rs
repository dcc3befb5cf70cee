//! Interfaces the driver consumes: a non-blocking serial port and a
//! millisecond clock.

/// Byte-oriented, non-blocking serial port.
///
/// None of the methods may block. Reads only return what is already buffered
/// and writes must only be issued while [`tx_bytes_free`](Self::tx_bytes_free)
/// reports space.
pub trait SerialTransport {
    /// Number of received bytes ready to be read
    fn rx_bytes_waiting(&self) -> usize;

    fn read_byte(&mut self) -> Option<u8>;

    /// Free space in the transmit buffer
    fn tx_bytes_free(&self) -> usize;

    fn write_byte(&mut self, byte: u8);

    /// Every queued byte has left the wire
    fn is_tx_empty(&self) -> bool;

    fn set_baud_rate(&mut self, baud: u32);

    /// Queue a whole buffer, bytes that do not fit are the transport's concern
    fn print(&mut self, data: &[u8]) {
        for &b in data {
            self.write_byte(b);
        }
    }
}

impl<T: SerialTransport + ?Sized> SerialTransport for &mut T {
    fn rx_bytes_waiting(&self) -> usize {
        (**self).rx_bytes_waiting()
    }

    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }

    fn tx_bytes_free(&self) -> usize {
        (**self).tx_bytes_free()
    }

    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte)
    }

    fn is_tx_empty(&self) -> bool {
        (**self).is_tx_empty()
    }

    fn set_baud_rate(&mut self, baud: u32) {
        (**self).set_baud_rate(baud)
    }

    fn print(&mut self, data: &[u8]) {
        (**self).print(data)
    }
}

/// Monotonic millisecond counter, allowed to wrap
pub trait Clock {
    fn millis(&self) -> u32;

    /// Milliseconds since `since`, correct across a counter wrap
    fn elapsed_since(&self, since: u32) -> u32 {
        self.millis().wrapping_sub(since)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn millis(&self) -> u32 {
        (**self).millis()
    }
}
