//! Flywheel, servo and fire-sequence actuators for the Sir Wheelium III
//! launcher.
//!
//! Everything here is generic over `embedded-hal` 1.0 PWM channels
//! ([`SetDutyCycle`](embedded_hal::pwm::SetDutyCycle)) and the async
//! [`DelayNs`](embedded_hal_async::delay::DelayNs), so it runs on any chip
//! and on host with mock channels.
//!
//! # Hardware model
//!
//! | Selector | Motor | | Selector | Servo | Travel |
//! |---|---|---|---|---|---|
//! | 0 | top flywheel | | 0 | loading | half-turn |
//! | 1 | bottom flywheel | | 1 | firing | full-turn |
//! | | | | 2 | horizontal aim | full-turn |
//! | | | | 3 | vertical aim | half-turn |
//!
//! [`Launcher`] bundles a [`MotorPair`], a [`ServoBank`] and a delay source
//! and implements the `launcher-core` actuator traits, ready to hand to a
//! [`Dispatcher`](launcher_core::Dispatcher).
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and fire-sequence logging

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod fire;
pub mod launcher;
pub mod motor;
pub mod servo;

#[cfg(test)]
mod mock;

pub use fire::{fire, FireTiming, Stroke};
pub use launcher::{DriveConfig, Launcher};
pub use motor::{MotorId, MotorPair, Spin, SpinMode, DEFAULT_SPIN_OFFSET, MOTOR_COUNT};
pub use servo::{ServoBank, ServoId, ServoKind, ServoTiming, HALF_TURN_MAX, SERVO_COUNT};
