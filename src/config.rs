//! Compile-time configuration.
//!
//! Pin assignment lives in `bin/main.rs`; everything that is a number lives
//! here.

use embassy_time::Duration;
use fixed::types::U12F4;

pub use launcher_core::LinkConfig;

/// Queued commands between the link task and the control loop.
pub const QUEUE_CAPACITY: usize = launcher_core::DEFAULT_CAPACITY;

/// RP2040 system clock with the default clock configuration.
pub const SYS_CLOCK_HZ: u32 = 125_000_000;

/// Main loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlConfig {
    /// Delay between loop iterations.
    pub heartbeat: Duration,
    /// Loop iterations per status LED toggle.
    pub blink_every: u32,
}

impl ControlConfig {
    /// 1 ms loop, LED blinking at roughly 2 Hz.
    pub const DEFAULT: Self = Self {
        heartbeat: Duration::from_millis(1),
        blink_every: 250,
    };
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// PWM slice timing: `f = SYS_CLOCK_HZ / (divider * (top + 1))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmTiming {
    pub divider: U12F4,
    pub top: u16,
}

impl PwmTiming {
    /// 20 kHz for the flywheel ESCs.
    pub const MOTOR: Self = Self {
        divider: U12F4::from_bits(1 << 4),
        top: 6_249,
    };

    /// 50 Hz for the hobby servos, one count per microsecond.
    pub const SERVO: Self = Self {
        divider: U12F4::from_bits(125 << 4),
        top: 19_999,
    };

    /// Output frequency in Hz (integer dividers only).
    pub const fn frequency(&self) -> u32 {
        let divider = (self.divider.to_bits() >> 4) as u32;
        SYS_CLOCK_HZ / (divider * (self.top as u32 + 1))
    }
}
