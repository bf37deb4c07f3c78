//! Bounded single-producer/single-consumer command queue.
//!
//! Decouples the receive context (producer) from the main loop (consumer)
//! without locks. Each cursor has exactly one writer: [`Producer`] owns the
//! write cursor, [`Consumer`] owns the read cursor, and
//! [`CommandQueue::split`] hands out exactly one of each.
//!
//! # Overflow policy
//!
//! Cursors are free-running counters; the slot index is `cursor & (C - 1)`
//! and the fill level is `write - read`. When the queue is full the newest
//! record is rejected, the write cursor stays put and the overflow counter is
//! bumped. Unread records are never overwritten.

use core::cell::UnsafeCell;
use core::marker::PhantomData;
use core::sync::atomic::{AtomicUsize, Ordering};
use portable_atomic::AtomicU32;

use crate::record::CommandRecord;

/// Default queue depth.
pub const DEFAULT_CAPACITY: usize = 32;

#[allow(clippy::declare_interior_mutable_const)]
const EMPTY_SLOT: UnsafeCell<CommandRecord> = UnsafeCell::new(CommandRecord::EMPTY);

/// Fixed-capacity ring of [`CommandRecord`]s.
///
/// `C` must be a non-zero power of two; this is checked at compile time.
///
/// # Example
///
/// ```
/// use launcher_core::{CommandQueue, CommandRecord};
///
/// let mut queue: CommandQueue<4> = CommandQueue::new();
/// let (mut producer, mut consumer) = queue.split();
///
/// producer.enqueue(CommandRecord::new(0x04, [1, 0, 0, 0, 0])).unwrap();
/// assert_eq!(consumer.try_dequeue().map(|r| r.opcode), Some(0x04));
/// assert_eq!(consumer.try_dequeue(), None);
/// ```
pub struct CommandQueue<const C: usize = DEFAULT_CAPACITY> {
    slots: [UnsafeCell<CommandRecord>; C],
    write: AtomicUsize,
    read: AtomicUsize,
    dropped: AtomicU32,
}

// SAFETY: slots are only touched through the unique Producer/Consumer pair.
// The producer writes a slot only while it is outside the unread window and
// publishes it with a Release store of `write`; the consumer reads a slot only
// after an Acquire load of `write` and releases it with a Release store of
// `read`.
unsafe impl<const C: usize> Sync for CommandQueue<C> {}

impl<const C: usize> CommandQueue<C> {
    const MASK: usize = {
        assert!(C.is_power_of_two(), "queue capacity must be a power of two");
        C - 1
    };

    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        // Force the capacity check for every instantiated `C`.
        let _ = Self::MASK;
        Self {
            slots: [EMPTY_SLOT; C],
            write: AtomicUsize::new(0),
            read: AtomicUsize::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        C
    }

    /// Number of unread records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        let read = self.read.load(Ordering::Acquire);
        let write = self.write.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() >= C
    }

    /// Total records rejected because the queue was full.
    #[inline]
    #[must_use]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Split into the producer and consumer halves.
    ///
    /// Borrowing `self` mutably guarantees only one pair exists at a time.
    pub fn split(&mut self) -> (Producer<'_, C>, Consumer<'_, C>) {
        let queue: &Self = self;
        (
            Producer {
                queue,
                _not_clone: PhantomData,
            },
            Consumer {
                queue,
                _not_clone: PhantomData,
            },
        )
    }
}

impl<const C: usize> Default for CommandQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Write half of a [`CommandQueue`], owned by the receive context.
pub struct Producer<'a, const C: usize> {
    queue: &'a CommandQueue<C>,
    _not_clone: PhantomData<*const ()>,
}

// SAFETY: the producer is the sole writer of `write`; moving it to the
// receive context keeps that invariant.
unsafe impl<const C: usize> Send for Producer<'_, C> {}

impl<const C: usize> Producer<'_, C> {
    /// Append a record at the write cursor.
    ///
    /// Returns the record back in `Err` when the queue is full. The unread
    /// records are left untouched and the overflow counter is incremented.
    pub fn enqueue(&mut self, record: CommandRecord) -> Result<(), CommandRecord> {
        let write = self.queue.write.load(Ordering::Relaxed);
        let read = self.queue.read.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= C {
            self.queue.dropped.fetch_add(1, Ordering::Relaxed);
            return Err(record);
        }

        let slot = &self.queue.slots[write & CommandQueue::<C>::MASK];
        // SAFETY: the slot is outside [read, write) so the consumer is not
        // reading it, and only this producer writes slots.
        unsafe { slot.get().write(record) };
        self.queue.write.store(write.wrapping_add(1), Ordering::Release);
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.queue.is_full()
    }

    #[inline]
    #[must_use]
    pub fn dropped(&self) -> u32 {
        self.queue.dropped()
    }
}

/// Read half of a [`CommandQueue`], owned by the main loop.
pub struct Consumer<'a, const C: usize> {
    queue: &'a CommandQueue<C>,
    _not_clone: PhantomData<*const ()>,
}

// SAFETY: the consumer is the sole writer of `read`.
unsafe impl<const C: usize> Send for Consumer<'_, C> {}

impl<const C: usize> Consumer<'_, C> {
    /// Take the oldest unread record, or `None` when the queue is empty.
    ///
    /// Never blocks. On empty the read cursor is left unchanged.
    pub fn try_dequeue(&mut self) -> Option<CommandRecord> {
        let read = self.queue.read.load(Ordering::Relaxed);
        let write = self.queue.write.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let slot = &self.queue.slots[read & CommandQueue::<C>::MASK];
        // SAFETY: the slot is inside [read, write), fully written and
        // published by the producer's Release store.
        let record = unsafe { slot.get().read() };
        self.queue.read.store(read.wrapping_add(1), Ordering::Release);
        Some(record)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    fn numbered(n: u8) -> CommandRecord {
        CommandRecord::new(0x02, [n, 0, n, 0, 0])
    }

    #[test]
    fn test_fifo_order() {
        let mut queue: CommandQueue<8> = CommandQueue::new();
        let (mut producer, mut consumer) = queue.split();

        for n in 0..8 {
            assert!(producer.enqueue(numbered(n)).is_ok());
        }
        let out: Vec<_> = core::iter::from_fn(|| consumer.try_dequeue()).collect();
        let expected: Vec<_> = (0..8).map(numbered).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_empty_dequeue_is_idempotent() {
        let mut queue: CommandQueue<4> = CommandQueue::new();
        let (mut producer, mut consumer) = queue.split();

        for _ in 0..10 {
            assert_eq!(consumer.try_dequeue(), None);
        }
        assert_eq!(consumer.len(), 0);

        // The cursor did not move, so the first enqueue is the first dequeue.
        producer.enqueue(numbered(7)).unwrap();
        assert_eq!(consumer.try_dequeue(), Some(numbered(7)));
        assert_eq!(consumer.try_dequeue(), None);
    }

    #[test]
    fn test_overflow_drops_newest() {
        // 33 frames into a 32-deep queue: 32 survive in order, the 33rd is lost.
        let mut queue: CommandQueue<32> = CommandQueue::new();
        let (mut producer, mut consumer) = queue.split();

        for n in 0..32 {
            assert!(producer.enqueue(numbered(n)).is_ok());
        }
        assert!(producer.is_full());
        assert_eq!(producer.enqueue(numbered(32)), Err(numbered(32)));
        assert_eq!(producer.dropped(), 1);

        let out: Vec<_> = core::iter::from_fn(|| consumer.try_dequeue()).collect();
        assert_eq!(out.len(), 32);
        assert_eq!(out[0], numbered(0));
        assert_eq!(out[31], numbered(31));
        assert!(out.iter().all(|r| *r != numbered(32)));
    }

    #[test]
    fn test_every_slot_holds_a_record() {
        // A power-of-two queue stores exactly `C` records, also after wrapping.
        let mut queue: CommandQueue<4> = CommandQueue::new();
        let (mut producer, mut consumer) = queue.split();

        for n in 0..4 {
            producer.enqueue(numbered(n)).unwrap();
        }
        assert_eq!(producer.len(), 4);
        assert!(producer.is_full());

        for round in 4..20u8 {
            assert!(consumer.try_dequeue().is_some());
            producer.enqueue(numbered(round)).unwrap();
            assert_eq!(consumer.len(), 4);
            assert!(producer.enqueue(numbered(0xFF)).is_err());
        }

        let tail: Vec<_> = core::iter::from_fn(|| consumer.try_dequeue()).collect();
        let expected: Vec<_> = (16..20).map(numbered).collect();
        assert_eq!(tail, expected);
    }

    #[test]
    fn test_full_queue_keeps_oldest_intact() {
        let mut queue: CommandQueue<2> = CommandQueue::new();
        let (mut producer, mut consumer) = queue.split();

        producer.enqueue(numbered(1)).unwrap();
        producer.enqueue(numbered(2)).unwrap();
        for n in 3..10 {
            assert!(producer.enqueue(numbered(n)).is_err());
        }
        assert_eq!(producer.dropped(), 7);
        assert_eq!(consumer.try_dequeue(), Some(numbered(1)));

        // One slot freed: the next write lands behind record 2.
        producer.enqueue(numbered(42)).unwrap();
        assert_eq!(consumer.try_dequeue(), Some(numbered(2)));
        assert_eq!(consumer.try_dequeue(), Some(numbered(42)));
        assert_eq!(consumer.try_dequeue(), None);
    }

    #[test]
    fn test_wraparound_over_many_cycles() {
        let mut queue: CommandQueue<4> = CommandQueue::new();
        let (mut producer, mut consumer) = queue.split();

        for round in 0..100u8 {
            producer.enqueue(numbered(round)).unwrap();
            producer.enqueue(numbered(round.wrapping_add(100))).unwrap();
            producer.enqueue(numbered(round.wrapping_add(200))).unwrap();
            assert_eq!(consumer.len(), 3);
            assert_eq!(consumer.try_dequeue(), Some(numbered(round)));
            assert_eq!(consumer.try_dequeue(), Some(numbered(round.wrapping_add(100))));
            assert_eq!(consumer.try_dequeue(), Some(numbered(round.wrapping_add(200))));
            assert!(consumer.is_empty());
        }
        assert_eq!(producer.dropped(), 0);
    }

    #[test]
    fn test_len_tracks_fill_level() {
        let mut queue: CommandQueue<4> = CommandQueue::new();
        assert_eq!(queue.capacity(), 4);
        {
            let (mut producer, mut consumer) = queue.split();
            producer.enqueue(numbered(1)).unwrap();
            producer.enqueue(numbered(2)).unwrap();
            assert_eq!(producer.len(), 2);
            consumer.try_dequeue();
            assert_eq!(consumer.len(), 1);
        }
        assert_eq!(queue.len(), 1);
        assert!(!queue.is_empty());
        assert!(!queue.is_full());
    }

    #[test]
    fn test_producer_and_consumer_on_separate_threads() {
        use std::thread;

        static mut QUEUE: CommandQueue<8> = CommandQueue::new();
        // SAFETY: the only reference to QUEUE taken in this process.
        let queue: &'static mut CommandQueue<8> = unsafe { &mut *core::ptr::addr_of_mut!(QUEUE) };
        let (mut producer, mut consumer) = queue.split();

        let writer = thread::spawn(move || {
            for n in 0..200u8 {
                while producer.enqueue(numbered(n)).is_err() {
                    thread::yield_now();
                }
            }
        });

        let mut received = Vec::new();
        while received.len() < 200 {
            match consumer.try_dequeue() {
                Some(record) => received.push(record),
                None => thread::yield_now(),
            }
        }
        writer.join().unwrap();

        let expected: Vec<_> = (0..200).map(numbered).collect();
        assert_eq!(received, expected);
    }
}
