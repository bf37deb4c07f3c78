//! Platform-agnostic command pipeline for the Sir Wheelium III launcher.
//!
//! This crate provides the link-to-actuator path without any
//! platform-specific dependencies. It runs both in embedded `no_std`
//! environments and on host for testing.
//!
//! # Overview
//!
//! Data flows through four pieces, leaves first:
//!
//! - [`record`]: the fixed six-byte [`CommandRecord`]
//! - [`assembler`]: [`FrameAssembler`] turns [`RxEvent`]s into records
//! - [`queue`]: lock-free SPSC [`CommandQueue`] between receive context and main loop
//! - [`dispatcher`]: [`Dispatcher`] decodes a [`Command`] and calls the actuators
//!
//! The actuator contracts ([`MotorDriver`], [`ServoDriver`], [`FireControl`])
//! are defined in [`actuator`]; [`LinkConfig`] turns the baud rate into the
//! idle-line window.
//!
//! # Protocol
//!
//! ```text
//! [opcode:1][payload:5]
//! ```
//!
//! No checksum, no length prefix, no acknowledgement. Frames are separated
//! only by counting bytes; an idle-line gap resynchronizes the stream.
//!
//! | Opcode | Command | Payload |
//! |--------|---------|---------|
//! | `0x00` | Halt | - |
//! | `0x01` | AdjustSpin | mode, offset (BE u16) |
//! | `0x02` | AdjustSpeed | motor, speed (BE u16) |
//! | `0x03` | AdjustAngle | servo, angle (BE u16) |
//! | `0x04` | Launch | count |
//!
//! # Example
//!
//! ```rust
//! use launcher_core::{Command, CommandQueue, FrameAssembler, RxEvent};
//!
//! let mut queue: CommandQueue<32> = CommandQueue::new();
//! let (mut producer, mut consumer) = queue.split();
//! let mut assembler = FrameAssembler::new();
//!
//! for byte in [0x02, 0x01, 0x30, 0x00, 0x00, 0x00] {
//!     assembler.ingest(RxEvent::Byte(byte), &mut producer);
//! }
//!
//! let record = consumer.try_dequeue().unwrap();
//! assert_eq!(
//!     Command::decode(&record),
//!     Command::AdjustSpeed { motor: 1, speed: 0x3000 }
//! );
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and dispatcher logging
//! - **`critical-section`**: Atomic counters through `critical-section`, for
//!   targets without atomic read-modify-write (thumbv6m)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod actuator;
pub mod assembler;
pub mod command;
pub mod dispatcher;
pub mod link;
pub mod queue;
pub mod record;

// Re-export main types at crate root
pub use actuator::{ActuatorError, FireControl, MotorDriver, ServoDriver};
pub use assembler::{FrameAssembler, Ingest, RxEvent};
pub use command::{opcode, Command};
pub use dispatcher::Dispatcher;
pub use link::LinkConfig;
pub use queue::{CommandQueue, Consumer, Producer, DEFAULT_CAPACITY};
pub use record::{CommandRecord, FRAME_LEN, PAYLOAD_LEN};
