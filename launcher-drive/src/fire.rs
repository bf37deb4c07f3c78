//! Timed fire sequence.
//!
//! One shot:
//!
//! 1. loading servo to `feed`, wait `feed_ms` (a ball drops into the chamber)
//! 2. loading servo back to `rest`, wait `settle_ms`
//! 3. firing servo to `strike`, wait `strike_ms` (the ball meets the flywheels)
//! 4. firing servo back to `rest`
//!
//! Consecutive shots are separated by `between_shots_ms`.

use embedded_hal::pwm::SetDutyCycle;
use embedded_hal_async::delay::DelayNs;
use launcher_core::ActuatorError;

use crate::servo::{ServoBank, ServoId, HALF_TURN_MAX};

/// Rest and active angle of one servo in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stroke {
    pub rest: u16,
    pub active: u16,
}

/// Positions and timing of the fire sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FireTiming {
    /// Loading servo: closed / open.
    pub loader: Stroke,
    /// Firing servo: retracted / extended.
    pub striker: Stroke,
    pub feed_ms: u32,
    pub settle_ms: u32,
    pub strike_ms: u32,
    pub between_shots_ms: u32,
}

impl FireTiming {
    pub const DEFAULT: Self = Self {
        loader: Stroke {
            rest: 0x0000,
            active: HALF_TURN_MAX / 2,
        },
        striker: Stroke {
            rest: 0x0000,
            active: 0x4000,
        },
        feed_ms: 300,
        settle_ms: 200,
        strike_ms: 250,
        between_shots_ms: 500,
    };
}

impl Default for FireTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Run `count` shots. A servo failure aborts the remaining shots.
pub async fn fire<P, D>(
    servos: &mut ServoBank<P>,
    delay: &mut D,
    timing: &FireTiming,
    count: u8,
) -> Result<(), ActuatorError>
where
    P: SetDutyCycle,
    D: DelayNs,
{
    for shot in 0..count {
        if shot > 0 {
            delay.delay_ms(timing.between_shots_ms).await;
        }

        servos.set_angle(ServoId::Loading, timing.loader.active)?;
        delay.delay_ms(timing.feed_ms).await;
        servos.set_angle(ServoId::Loading, timing.loader.rest)?;
        delay.delay_ms(timing.settle_ms).await;

        servos.set_angle(ServoId::Firing, timing.striker.active)?;
        delay.delay_ms(timing.strike_ms).await;
        servos.set_angle(ServoId::Firing, timing.striker.rest)?;
    }
    Ok(())
}
