//! Sir Wheelium III launcher control firmware for RP2040.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Receives six-byte command frames over UART from the Bluetooth module
//!    (38400 baud, 8N1)
//! 2. Queues completed frames in a lock-free single-producer single-consumer
//!    queue
//! 3. Dispatches one command per main-loop iteration to the flywheel motors,
//!    servos and fire sequence
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | UART1 TX | 8    | Serial transmit (unused) |
//! | UART1 RX | 9    | Serial receive (command frames) |
//! | PWM1 A/B | 2, 3 | Loading servo, firing servo (50 Hz) |
//! | PWM2 A/B | 4, 5 | Horizontal aim, vertical aim servo (50 Hz) |
//! | PWM3 A/B | 6, 7 | Top flywheel, bottom flywheel ESC (20 kHz) |
//! | LED      | 25   | On-board LED (heartbeat) |
//!
//! # Architecture
//!
//! Two execution contexts share nothing but the command queue:
//!
//! - **Link task** on a high-priority interrupt executor: reads UART bytes,
//!   detects idle line, assembles frames and enqueues them ([`SerialLink`])
//! - **Control loop** on the thread executor: dequeues, dispatches and
//!   blinks the heartbeat LED ([`ControlLoop`])
//!
//! The link task only ever advances the write cursor and the control loop
//! only the read cursor, so the queue needs no lock.
//!
//! # Modules
//!
//! - [`config`]: link, loop and PWM timing constants
//! - [`input`]: UART receive side ([`SerialLink`], [`LinkError`])
//! - [`output`]: PWM wiring of the launcher ([`build_launcher`])
//! - [`control`]: main loop ([`ControlLoop`])
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)

#![no_std]

#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features - they install conflicting panic handlers");

// Re-export core types for convenience
pub use launcher_core::{Command, CommandQueue, CommandRecord, Dispatcher};
pub use launcher_drive::{DriveConfig, FireTiming, Launcher};

pub mod config;
pub mod control;
pub mod input;
pub mod output;

pub use config::{ControlConfig, LinkConfig, PwmTiming, QUEUE_CAPACITY};
pub use control::ControlLoop;
pub use input::{LinkError, SerialLink};
pub use output::{build_launcher, slice_config, OutputError, WheeliumLauncher};
