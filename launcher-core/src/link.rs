//! Serial link timing.
//!
//! The transport turns "no byte for a while" into [`RxEvent::Idle`]. How long
//! "a while" is follows from the baud rate.
//!
//! [`RxEvent::Idle`]: crate::RxEvent::Idle

/// Serial link settings (the Bluetooth module runs 8N1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    pub baudrate: u32,
    /// Quiet characters after which a partial frame is discarded.
    pub idle_chars: u32,
}

impl LinkConfig {
    pub const DEFAULT: Self = Self {
        baudrate: 38_400,
        idle_chars: 1,
    };

    /// Start, eight data and one stop bit.
    const BITS_PER_CHAR: u64 = 10;

    /// Time for one character on the wire, rounded up to whole microseconds.
    #[must_use]
    pub const fn char_time_micros(&self) -> u64 {
        (Self::BITS_PER_CHAR * 1_000_000).div_ceil(self.baudrate as u64)
    }

    /// How long the line must stay quiet after the last byte of a partial
    /// frame before it is treated as idle, in microseconds.
    ///
    /// The wait starts once a byte has been read, so the next byte may still
    /// be one character time away. That character is added on top of
    /// `idle_chars`.
    #[must_use]
    pub const fn idle_window_micros(&self) -> u64 {
        self.char_time_micros() * (self.idle_chars as u64 + 1)
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
