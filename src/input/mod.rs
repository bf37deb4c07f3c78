//! Receive side: UART bytes in, command records into the queue.

mod uart;

pub use uart::{LinkError, SerialLink};
