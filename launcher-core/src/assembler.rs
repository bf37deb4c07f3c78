//! Byte-at-a-time frame assembly with idle-line resynchronization.
//!
//! The serial link carries bare six-byte frames with no start marker and no
//! checksum, so the only way to recover from a partial frame (connection set
//! up mid-command, a lost byte) is the idle-line gap the transport reports
//! between bursts. Any idle event throws the partial frame away.

use crate::queue::Producer;
use crate::record::{CommandRecord, FRAME_LEN};

/// Event delivered by the serial transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxEvent {
    /// One received byte.
    Byte(u8),
    /// No byte for at least one character time.
    Idle,
}

/// Outcome of feeding one event into [`FrameAssembler::ingest`].
///
/// Informational only; the link never reports framing problems upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ingest {
    /// Byte stored, frame not complete yet (or idle with nothing pending).
    Partial,
    /// Frame completed and queued.
    Queued(CommandRecord),
    /// Frame completed but the queue was full, so it was dropped.
    Overflow(CommandRecord),
    /// Idle line discarded a partial frame of this many bytes.
    Resync { discarded: usize },
}

/// Accumulates raw bytes into [`CommandRecord`]s.
///
/// Runs in the receive context: no blocking, no allocation, constant time
/// per byte.
#[derive(Debug)]
pub struct FrameAssembler {
    index: usize,
    pending: [u8; FRAME_LEN],
}

impl FrameAssembler {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            index: 0,
            pending: [0; FRAME_LEN],
        }
    }

    /// Bytes captured for the frame in progress.
    #[inline]
    #[must_use]
    pub const fn pending_len(&self) -> usize {
        self.index
    }

    /// Store one byte. Returns the record when it completes a frame.
    pub fn push_byte(&mut self, byte: u8) -> Option<CommandRecord> {
        if self.index >= FRAME_LEN {
            // Unreachable while the index is only advanced below.
            self.index = 0;
        }

        self.pending[self.index] = byte;
        self.index += 1;

        if self.index == FRAME_LEN {
            self.index = 0;
            Some(CommandRecord::from_bytes(self.pending))
        } else {
            None
        }
    }

    /// Drop any partial frame. Returns how many bytes were discarded.
    pub fn idle(&mut self) -> usize {
        core::mem::replace(&mut self.index, 0)
    }

    /// Handle one transport event without touching a queue.
    pub fn handle(&mut self, event: RxEvent) -> Option<CommandRecord> {
        match event {
            RxEvent::Byte(byte) => self.push_byte(byte),
            RxEvent::Idle => {
                self.idle();
                None
            }
        }
    }

    /// Handle one transport event and enqueue a completed frame.
    ///
    /// At most one record is enqueued per call.
    pub fn ingest<const C: usize>(
        &mut self,
        event: RxEvent,
        queue: &mut Producer<'_, C>,
    ) -> Ingest {
        match event {
            RxEvent::Byte(byte) => match self.push_byte(byte) {
                Some(record) => match queue.enqueue(record) {
                    Ok(()) => Ingest::Queued(record),
                    Err(record) => Ingest::Overflow(record),
                },
                None => Ingest::Partial,
            },
            RxEvent::Idle => match self.idle() {
                0 => Ingest::Partial,
                discarded => Ingest::Resync { discarded },
            },
        }
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}
