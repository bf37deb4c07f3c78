//! The complete launcher: flywheels, servos and fire sequence behind the
//! actuator traits the dispatcher drives.

use embedded_hal::pwm::SetDutyCycle;
use embedded_hal_async::delay::DelayNs;
use launcher_core::{ActuatorError, FireControl, MotorDriver, ServoDriver};

use crate::fire::{fire, FireTiming};
use crate::motor::{MotorPair, Spin};
use crate::servo::{ServoBank, ServoTiming};

/// Tunables for [`Launcher`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveConfig {
    /// Spin applied until the first spin command arrives.
    pub spin: Spin,
    pub servo_timing: ServoTiming,
    pub fire: FireTiming,
}

/// Motor pair, servo bank and a delay source for timed sequences.
///
/// `M` and `S` are the PWM channel types of the motors and servos, which may
/// differ (the flywheel ESCs and hobby servos usually run at different PWM
/// frequencies). `D` only has to live as long as the launcher.
pub struct Launcher<M, S, D> {
    motors: MotorPair<M>,
    servos: ServoBank<S>,
    delay: D,
    fire: FireTiming,
}

impl<M, S, D> Launcher<M, S, D>
where
    M: SetDutyCycle,
    S: SetDutyCycle,
    D: DelayNs,
{
    fn with_fire_timing(
        motors: MotorPair<M>,
        servos: ServoBank<S>,
        delay: D,
        fire: FireTiming,
    ) -> Self {
        Self {
            motors,
            servos,
            delay,
            fire,
        }
    }

    /// Build from raw channels: `motors` as `[top, bottom]`, `servos` in
    /// [`ServoId`](crate::ServoId) order.
    pub fn from_channels(motors: [M; 2], servos: [S; 4], delay: D, config: &DriveConfig) -> Self {
        let [top, bottom] = motors;
        Self::with_fire_timing(
            MotorPair::with_spin(top, bottom, config.spin),
            ServoBank::with_timing(servos, config.servo_timing),
            delay,
            config.fire,
        )
    }

    /// Stop both motors and send every servo home.
    pub fn init(&mut self) -> Result<(), ActuatorError> {
        self.motors.init()?;
        self.servos.init()
    }

    pub fn motors(&self) -> &MotorPair<M> {
        &self.motors
    }

    pub fn servos(&self) -> &ServoBank<S> {
        &self.servos
    }
}

impl<M, S, D> MotorDriver for Launcher<M, S, D>
where
    M: SetDutyCycle,
    S: SetDutyCycle,
    D: DelayNs,
{
    fn set_motor_speed(&mut self, motor: u8, speed: u16) -> Result<(), ActuatorError> {
        self.motors.set_motor_speed(motor, speed)
    }

    fn set_spin(&mut self, mode: u8, offset: u16) -> Result<(), ActuatorError> {
        MotorDriver::set_spin(&mut self.motors, mode, offset)
    }

    fn motor_count(&self) -> u8 {
        self.motors.motor_count()
    }
}

impl<M, S, D> ServoDriver for Launcher<M, S, D>
where
    M: SetDutyCycle,
    S: SetDutyCycle,
    D: DelayNs,
{
    fn set_servo_angle(&mut self, servo: u8, angle: u16) -> Result<(), ActuatorError> {
        self.servos.set_servo_angle(servo, angle)
    }
}

impl<M, S, D> FireControl for Launcher<M, S, D>
where
    M: SetDutyCycle,
    S: SetDutyCycle,
    D: DelayNs,
{
    async fn run_fire_sequence(&mut self, count: u8) {
        #[cfg(feature = "defmt")]
        defmt::info!("Firing {=u8} shot(s)", count);

        if let Err(_e) = fire(&mut self.servos, &mut self.delay, &self.fire, count).await {
            #[cfg(feature = "defmt")]
            defmt::error!("Fire sequence aborted: {:?}", _e);
        }
    }
}
