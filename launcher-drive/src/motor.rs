//! Twin flywheel motors with spin differential.
//!
//! Each flywheel gets its own commanded speed. A spin mode then shaves the
//! spin offset off one of the two wheels so the projectile leaves with back-
//! or topspin:
//!
//! | Mode | Top output | Bottom output |
//! |------|------------|---------------|
//! | Backspin | `top - offset` | `bottom` |
//! | Topspin | `top` | `bottom - offset` |
//! | Neutral | `top` | `bottom` |
//!
//! Subtraction saturates at zero. Speeds are fractions of full scale
//! (`0..=0xFFFF`) and map linearly onto the channel's duty range.

use embedded_hal::pwm::SetDutyCycle;
use launcher_core::{ActuatorError, MotorDriver};

/// Number of flywheel motors.
pub const MOTOR_COUNT: u8 = 2;

/// Default spin differential, roughly 10% of full scale.
pub const DEFAULT_SPIN_OFFSET: u16 = 6550;

/// Motor selector as carried in the command payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MotorId {
    Top = 0,
    Bottom = 1,
}

impl MotorId {
    pub const ALL: [MotorId; MOTOR_COUNT as usize] = [MotorId::Top, MotorId::Bottom];

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for MotorId {
    type Error = ActuatorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MotorId::Top),
            1 => Ok(MotorId::Bottom),
            other => Err(ActuatorError::UnknownMotor(other)),
        }
    }
}

/// Which wheel the spin offset is taken from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SpinMode {
    #[default]
    Backspin = 0,
    Topspin = 1,
    Neutral = 2,
}

impl TryFrom<u8> for SpinMode {
    type Error = ActuatorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SpinMode::Backspin),
            1 => Ok(SpinMode::Topspin),
            2 => Ok(SpinMode::Neutral),
            _ => Err(ActuatorError::OutOfRange),
        }
    }
}

/// Spin settings applied on top of the commanded speeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Spin {
    pub mode: SpinMode,
    pub offset: u16,
}

impl Spin {
    pub const NONE: Self = Self {
        mode: SpinMode::Neutral,
        offset: 0,
    };

    /// Output speeds `[top, bottom]` for the given commanded speeds.
    #[must_use]
    pub const fn apply(self, speeds: [u16; 2]) -> [u16; 2] {
        let [top, bottom] = speeds;
        match self.mode {
            SpinMode::Backspin => [top.saturating_sub(self.offset), bottom],
            SpinMode::Topspin => [top, bottom.saturating_sub(self.offset)],
            SpinMode::Neutral => [top, bottom],
        }
    }
}

impl Default for Spin {
    fn default() -> Self {
        Self {
            mode: SpinMode::Backspin,
            offset: DEFAULT_SPIN_OFFSET,
        }
    }
}

/// Two flywheel motors driven by PWM channels.
pub struct MotorPair<P> {
    channels: [P; 2],
    speeds: [u16; 2],
    spin: Spin,
}

impl<P: SetDutyCycle> MotorPair<P> {
    /// Create a stopped motor pair with the default spin.
    ///
    /// Call [`MotorPair::init`] to drive the outputs to zero.
    pub fn new(top: P, bottom: P) -> Self {
        Self::with_spin(top, bottom, Spin::default())
    }

    pub fn with_spin(top: P, bottom: P, spin: Spin) -> Self {
        Self {
            channels: [top, bottom],
            speeds: [0; 2],
            spin,
        }
    }

    /// Write the current (stopped) state to the hardware.
    pub fn init(&mut self) -> Result<(), ActuatorError> {
        self.apply()
    }

    /// Set one motor's commanded speed.
    pub fn set_speed(&mut self, motor: MotorId, speed: u16) -> Result<(), ActuatorError> {
        self.speeds[motor.index()] = speed;
        self.apply()
    }

    /// Replace the spin settings and re-apply the outputs.
    pub fn set_spin(&mut self, spin: Spin) -> Result<(), ActuatorError> {
        self.spin = spin;
        self.apply()
    }

    /// Commanded speed, before spin.
    #[must_use]
    pub fn speed(&self, motor: MotorId) -> u16 {
        self.speeds[motor.index()]
    }

    /// Speed actually applied to the motor, after spin.
    #[must_use]
    pub fn output(&self, motor: MotorId) -> u16 {
        self.spin.apply(self.speeds)[motor.index()]
    }

    #[must_use]
    pub fn spin(&self) -> Spin {
        self.spin
    }

    pub fn channel(&self, motor: MotorId) -> &P {
        &self.channels[motor.index()]
    }

    /// Give the PWM channels back as `(top, bottom)`.
    pub fn release(self) -> (P, P) {
        let [top, bottom] = self.channels;
        (top, bottom)
    }

    fn apply(&mut self) -> Result<(), ActuatorError> {
        let outputs = self.spin.apply(self.speeds);
        for (channel, output) in self.channels.iter_mut().zip(outputs) {
            channel
                .set_duty_cycle_fraction(output, u16::MAX)
                .map_err(|_| ActuatorError::Hardware)?;
        }
        Ok(())
    }
}

impl<P: SetDutyCycle> MotorDriver for MotorPair<P> {
    fn set_motor_speed(&mut self, motor: u8, speed: u16) -> Result<(), ActuatorError> {
        self.set_speed(MotorId::try_from(motor)?, speed)
    }

    fn set_spin(&mut self, mode: u8, offset: u16) -> Result<(), ActuatorError> {
        let mode = SpinMode::try_from(mode)?;
        MotorPair::set_spin(self, Spin { mode, offset })
    }

    fn motor_count(&self) -> u8 {
        MOTOR_COUNT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPwm;

    fn pair(spin: Spin) -> MotorPair<MockPwm> {
        MotorPair::with_spin(MockPwm::new(0, 1000), MockPwm::new(1, 1000), spin)
    }

    #[test]
    fn test_init_drives_outputs_to_zero() {
        let mut motors = pair(Spin::default());
        motors.init().unwrap();
        assert_eq!(motors.channel(MotorId::Top).duty, 0);
        assert_eq!(motors.channel(MotorId::Bottom).duty, 0);
    }

    #[test]
    fn test_full_speed_maps_to_max_duty() {
        let mut motors = pair(Spin::NONE);
        motors.set_speed(MotorId::Top, u16::MAX).unwrap();
        motors.set_speed(MotorId::Bottom, u16::MAX / 2).unwrap();
        assert_eq!(motors.channel(MotorId::Top).duty, 1000);
        assert_eq!(motors.channel(MotorId::Bottom).duty, 499);
    }

    #[test]
    fn test_backspin_slows_top_motor() {
        let mut motors = pair(Spin {
            mode: SpinMode::Backspin,
            offset: 0x1000,
        });
        motors.set_speed(MotorId::Top, 0x3000).unwrap();
        motors.set_speed(MotorId::Bottom, 0x3000).unwrap();
        assert_eq!(motors.speed(MotorId::Top), 0x3000);
        assert_eq!(motors.output(MotorId::Top), 0x2000);
        assert_eq!(motors.output(MotorId::Bottom), 0x3000);
    }

    #[test]
    fn test_topspin_slows_bottom_motor() {
        let mut motors = pair(Spin::NONE);
        motors.set_speed(MotorId::Top, 0x3000).unwrap();
        motors.set_speed(MotorId::Bottom, 0x3000).unwrap();
        motors
            .set_spin(Spin {
                mode: SpinMode::Topspin,
                offset: 0x0800,
            })
            .unwrap();
        assert_eq!(motors.output(MotorId::Top), 0x3000);
        assert_eq!(motors.output(MotorId::Bottom), 0x2800);
    }

    #[test]
    fn test_spin_offset_saturates_at_zero() {
        let mut motors = pair(Spin::default());
        motors.set_speed(MotorId::Top, 100).unwrap();
        assert_eq!(motors.output(MotorId::Top), 0);
        assert_eq!(motors.channel(MotorId::Top).duty, 0);
    }

    #[test]
    fn test_driver_rejects_bad_selectors() {
        let mut motors = pair(Spin::default());
        assert_eq!(
            motors.set_motor_speed(2, 0x1000),
            Err(ActuatorError::UnknownMotor(2))
        );
        assert_eq!(
            MotorDriver::set_spin(&mut motors, 3, 0),
            Err(ActuatorError::OutOfRange)
        );
        // Rejected calls leave the state alone.
        assert_eq!(motors.spin(), Spin::default());
        assert_eq!(motors.motor_count(), 2);
    }

    #[test]
    fn test_driver_set_spin_by_code() {
        let mut motors = pair(Spin::default());
        MotorDriver::set_spin(&mut motors, 2, 0x1234).unwrap();
        assert_eq!(
            motors.spin(),
            Spin {
                mode: SpinMode::Neutral,
                offset: 0x1234
            }
        );
    }

    #[test]
    fn test_hardware_failure_is_reported() {
        let mut motors = pair(Spin::NONE);
        let (top, mut bottom) = motors.release();
        bottom.fail = true;
        motors = MotorPair::with_spin(top, bottom, Spin::NONE);
        assert_eq!(
            motors.set_motor_speed(0, 0x1000),
            Err(ActuatorError::Hardware)
        );
    }
}
