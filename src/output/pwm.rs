use crate::config::PwmTiming;
use embassy_rp::pwm::{Config as PwmConfig, Pwm, PwmOutput};
use embassy_time::Delay;
use launcher_core::ActuatorError;
use launcher_drive::{DriveConfig, Launcher};

/// The launcher as wired on the board: every actuator is a PWM channel and
/// timed sequences use the embassy timer.
pub type WheeliumLauncher<'d> = Launcher<PwmOutput<'d>, PwmOutput<'d>, Delay>;

/// Errors while bringing up the actuators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum OutputError {
    /// A PWM slice was created without one of its output pins.
    MissingChannel,
    /// Driving the actuators to their start position failed.
    Actuator(ActuatorError),
}

impl From<ActuatorError> for OutputError {
    fn from(e: ActuatorError) -> Self {
        OutputError::Actuator(e)
    }
}

/// Slice configuration for the given timing, both outputs low.
#[must_use]
pub fn slice_config(timing: &PwmTiming) -> PwmConfig {
    let mut config = PwmConfig::default();
    config.divider = timing.divider;
    config.top = timing.top;
    config.compare_a = 0;
    config.compare_b = 0;
    config
}

/// Split a slice created with both A and B outputs into `[a, b]`.
pub fn split_slice(pwm: Pwm<'_>) -> Result<[PwmOutput<'_>; 2], OutputError> {
    match pwm.split() {
        (Some(a), Some(b)) => Ok([a, b]),
        _ => Err(OutputError::MissingChannel),
    }
}

/// Assemble the launcher from its three PWM slices and move everything to
/// the start position: motors stopped, servos home.
///
/// | Slice | A | B |
/// |-------|---|---|
/// | `motors` | top flywheel | bottom flywheel |
/// | `loader` | loading servo | firing servo |
/// | `aim` | horizontal aim | vertical aim |
pub fn build_launcher<'d>(
    motors: Pwm<'d>,
    loader: Pwm<'d>,
    aim: Pwm<'d>,
    config: &DriveConfig,
) -> Result<WheeliumLauncher<'d>, OutputError> {
    let motors = split_slice(motors)?;
    let [loading, firing] = split_slice(loader)?;
    let [horizontal, vertical] = split_slice(aim)?;

    let mut launcher = Launcher::from_channels(
        motors,
        [loading, firing, horizontal, vertical],
        Delay,
        config,
    );
    launcher.init()?;
    Ok(launcher)
}
