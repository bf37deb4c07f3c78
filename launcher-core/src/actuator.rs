//! Actuator traits and error types.
//!
//! The dispatcher only depends on these call contracts. PWM, timers and pin
//! assignment live behind them.

use core::future::Future;

/// Error type for actuator operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// Motor selector does not name a motor.
    UnknownMotor(u8),
    /// Servo selector does not name a servo.
    UnknownServo(u8),
    /// Value outside what the actuator accepts.
    OutOfRange,
    /// Operation not implemented by this actuator.
    Unsupported,
    /// Underlying PWM/timer reported a failure.
    Hardware,
}

/// Flywheel motor control.
pub trait MotorDriver {
    /// Set `motor` to `speed` (fraction of full scale, `0..=0xFFFF`).
    fn set_motor_speed(&mut self, motor: u8, speed: u16) -> Result<(), ActuatorError>;

    /// Select spin mode and differential offset between the motors.
    fn set_spin(&mut self, _mode: u8, _offset: u16) -> Result<(), ActuatorError> {
        Err(ActuatorError::Unsupported)
    }

    /// Number of motors addressed by selectors `0..motor_count()`.
    fn motor_count(&self) -> u8 {
        2
    }
}

/// Servo positioning.
pub trait ServoDriver {
    /// Move `servo` to `angle` (`0..=0xFFFF` maps onto the servo's travel).
    fn set_servo_angle(&mut self, servo: u8, angle: u16) -> Result<(), ActuatorError>;
}

/// Multi-step timed firing.
///
/// # `no_std` Compatibility
///
/// Implementations must not allocate. The future may take as long as the
/// sequence needs; the caller waits for it to finish.
pub trait FireControl {
    /// Run the fire sequence `count` times.
    fn run_fire_sequence(&mut self, count: u8) -> impl Future<Output = ()>;
}
