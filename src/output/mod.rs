//! Actuator side: PWM slices wired into the launcher drivers.

mod pwm;

pub use pwm::{build_launcher, slice_config, split_slice, OutputError, WheeliumLauncher};
