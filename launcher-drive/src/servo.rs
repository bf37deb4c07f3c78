//! Hobby servo bank: loader, striker and the two aiming axes.
//!
//! Angles are `u16` fractions of a servo's travel. Half-turn servos only
//! accept `0..=0x7FFF`; full-turn servos use the whole range. The angle maps
//! linearly onto a pulse between `min_pulse` and `max_pulse` inside a
//! `period` frame (1.0 ms to 2.0 ms in 20 ms by default).

use embedded_hal::pwm::SetDutyCycle;
use fixed::types::U32F32;
use fixed_macro::fixed;
use launcher_core::{ActuatorError, ServoDriver};

/// Number of servos in the bank.
pub const SERVO_COUNT: usize = 4;

/// Largest angle a half-turn servo accepts.
pub const HALF_TURN_MAX: u16 = 0x7FFF;

/// Servo selector as carried in the command payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ServoId {
    /// Gate that drops one ball into the firing chamber.
    Loading = 0,
    /// Striker that pushes the ball into the flywheels.
    Firing = 1,
    HorizontalAim = 2,
    VerticalAim = 3,
}

impl ServoId {
    pub const ALL: [ServoId; SERVO_COUNT] = [
        ServoId::Loading,
        ServoId::Firing,
        ServoId::HorizontalAim,
        ServoId::VerticalAim,
    ];

    /// Mechanical travel of this position.
    #[must_use]
    pub const fn kind(self) -> ServoKind {
        match self {
            ServoId::Loading | ServoId::VerticalAim => ServoKind::HalfTurn,
            ServoId::Firing | ServoId::HorizontalAim => ServoKind::FullTurn,
        }
    }

    /// Angle the servo is sent to at start-up.
    #[must_use]
    pub const fn home(self) -> u16 {
        match self {
            ServoId::Loading | ServoId::Firing => 0x0000,
            ServoId::HorizontalAim => 0x7FFF,
            ServoId::VerticalAim => 0x3FFF,
        }
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for ServoId {
    type Error = ActuatorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ServoId::Loading),
            1 => Ok(ServoId::Firing),
            2 => Ok(ServoId::HorizontalAim),
            3 => Ok(ServoId::VerticalAim),
            other => Err(ActuatorError::UnknownServo(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServoKind {
    /// 180 degree servo, angle `0..=0x7FFF`.
    HalfTurn,
    /// 360 degree servo, angle `0..=0xFFFF`.
    FullTurn,
}

impl ServoKind {
    #[must_use]
    pub const fn max_angle(self) -> u16 {
        match self {
            ServoKind::HalfTurn => HALF_TURN_MAX,
            ServoKind::FullTurn => u16::MAX,
        }
    }

    #[must_use]
    pub const fn accepts(self, angle: u16) -> bool {
        angle <= self.max_angle()
    }
}

/// Servo pulse timing, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoTiming {
    pub period: U32F32,
    pub min_pulse: U32F32,
    pub max_pulse: U32F32,
}

impl ServoTiming {
    /// 50 Hz frame, 1.0 ms to 2.0 ms pulse.
    pub const STANDARD: Self = Self {
        period: fixed!(20.0: U32F32),
        min_pulse: fixed!(1.0: U32F32),
        max_pulse: fixed!(2.0: U32F32),
    };

    /// Pulse width for `angle` on a servo of the given kind.
    ///
    /// Angles above the kind's maximum are clamped.
    #[must_use]
    pub fn pulse(&self, kind: ServoKind, angle: u16) -> U32F32 {
        let max = kind.max_angle();
        let position = U32F32::from_num(angle.min(max)) / U32F32::from_num(max);
        self.min_pulse + (self.max_pulse - self.min_pulse) * position
    }

    /// Duty count for `angle` on a channel whose full period is `max_duty`.
    #[must_use]
    pub fn duty(&self, kind: ServoKind, angle: u16, max_duty: u16) -> u16 {
        let counts = self.pulse(kind, angle) * U32F32::from_num(max_duty) / self.period;
        counts.to_num::<u32>().min(u32::from(max_duty)) as u16
    }
}

impl Default for ServoTiming {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Four servos on PWM channels, indexed by [`ServoId`].
pub struct ServoBank<P> {
    channels: [P; SERVO_COUNT],
    angles: [u16; SERVO_COUNT],
    timing: ServoTiming,
}

impl<P: SetDutyCycle> ServoBank<P> {
    /// Create a bank with standard timing. Channels are in [`ServoId`] order.
    ///
    /// Call [`ServoBank::init`] to move every servo to its home angle.
    pub fn new(channels: [P; SERVO_COUNT]) -> Self {
        Self::with_timing(channels, ServoTiming::STANDARD)
    }

    pub fn with_timing(channels: [P; SERVO_COUNT], timing: ServoTiming) -> Self {
        Self {
            channels,
            angles: ServoId::ALL.map(ServoId::home),
            timing,
        }
    }

    /// Send every servo to its home angle.
    pub fn init(&mut self) -> Result<(), ActuatorError> {
        for servo in ServoId::ALL {
            self.set_angle(servo, servo.home())?;
        }
        Ok(())
    }

    /// Move one servo. Out-of-range angles are rejected and the servo keeps
    /// its previous position.
    pub fn set_angle(&mut self, servo: ServoId, angle: u16) -> Result<(), ActuatorError> {
        let kind = servo.kind();
        if !kind.accepts(angle) {
            return Err(ActuatorError::OutOfRange);
        }

        let channel = &mut self.channels[servo.index()];
        let duty = self.timing.duty(kind, angle, channel.max_duty_cycle());
        channel
            .set_duty_cycle(duty)
            .map_err(|_| ActuatorError::Hardware)?;
        self.angles[servo.index()] = angle;
        Ok(())
    }

    /// Last angle successfully commanded.
    #[must_use]
    pub fn angle(&self, servo: ServoId) -> u16 {
        self.angles[servo.index()]
    }

    #[must_use]
    pub fn timing(&self) -> &ServoTiming {
        &self.timing
    }

    pub fn channel(&self, servo: ServoId) -> &P {
        &self.channels[servo.index()]
    }

    /// Give the PWM channels back in [`ServoId`] order.
    pub fn release(self) -> [P; SERVO_COUNT] {
        self.channels
    }
}

impl<P: SetDutyCycle> ServoDriver for ServoBank<P> {
    fn set_servo_angle(&mut self, servo: u8, angle: u16) -> Result<(), ActuatorError> {
        self.set_angle(ServoId::try_from(servo)?, angle)
    }
}
