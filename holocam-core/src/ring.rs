//! Fixed-capacity ring buffer
//!
//! A power-of-two sized FIFO with one slot sacrificed so that
//! `head == tail` always means empty and `head + 1 == tail` always means
//! full. `head` is the next slot to write, `tail` the next slot to read.
//!
//! The buffer can be used two ways:
//!
//! - Owned by a single context through `&mut self` ([`RingBuffer::push`],
//!   [`RingBuffer::pop`], ...).
//! - Split into a [`Producer`] and a [`Consumer`] that may live in
//!   different execution contexts (an interrupt handler and the main loop).
//!   Only the producer ever stores `head`, only the consumer ever stores
//!   `tail`; each side merely loads the other's index. No lock is taken.

#![allow(unsafe_code)]

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Errors reported by ring operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RingError {
    /// No free slot; the item was not stored
    Full,
    /// Nothing to read
    Empty,
}

/// Fixed-capacity FIFO holding at most `N - 1` items
///
/// `N` must be a power of two and at least 2; this is checked at compile
/// time when the buffer is constructed.
pub struct RingBuffer<T, const N: usize> {
    head: AtomicUsize,
    tail: AtomicUsize,
    slots: [UnsafeCell<MaybeUninit<T>>; N],
}

// SAFETY: slots are only reached through `enqueue` (producer side) and
// `dequeue`/`peek_*` (consumer side). A slot is written only while it lies
// outside `tail..head`, and read only while inside it; the Release/Acquire
// pairs on `head` and `tail` order the slot access with the index publish.
unsafe impl<T: Send, const N: usize> Sync for RingBuffer<T, N> {}

impl<T: Copy, const N: usize> RingBuffer<T, N> {
    const SIZE_OK: () = assert!(
        N >= 2 && N.is_power_of_two(),
        "ring size must be a power of two"
    );

    const MASK: usize = N - 1;

    /// Number of items the buffer can hold
    pub const CAPACITY: usize = N - 1;

    /// Create an empty buffer (`head = tail = 0`)
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::SIZE_OK;
        Self {
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            slots: [const { UnsafeCell::new(MaybeUninit::uninit()) }; N],
        }
    }

    /// Number of items the buffer can hold
    pub const fn capacity(&self) -> usize {
        Self::CAPACITY
    }

    /// Check if there is nothing to read
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// Check if a push would fail
    pub fn is_full(&self) -> bool {
        let head = self.head.load(Ordering::Acquire);
        ((head + 1) & Self::MASK) == self.tail.load(Ordering::Acquire)
    }

    /// Number of items currently stored
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        head.wrapping_sub(tail) & Self::MASK
    }

    /// Append an item; fails without overwriting when full
    pub fn push(&mut self, item: T) -> Result<(), RingError> {
        self.enqueue(item)
    }

    /// Remove the oldest item
    pub fn pop(&mut self) -> Result<T, RingError> {
        self.dequeue()
    }

    /// Oldest item, left in place
    pub fn front(&self) -> Option<T> {
        self.peek_front()
    }

    /// Most recently pushed item, left in place
    pub fn back(&self) -> Option<T> {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        if head == tail {
            return None;
        }
        let newest = head.wrapping_add(N - 1) & Self::MASK;
        // SAFETY: `newest` lies in `tail..head`; with `&self` and no split
        // handles alive nobody can write it.
        Some(unsafe { (*self.slots[newest].get()).assume_init() })
    }

    /// Discard everything stored (`tail = head`)
    pub fn clear(&mut self) {
        let head = *self.head.get_mut();
        *self.tail.get_mut() = head;
    }

    /// Split into producer and consumer halves
    ///
    /// Each half may be moved into a different execution context. The
    /// borrow keeps any third party from touching the buffer meanwhile.
    pub fn split(&mut self) -> (Producer<'_, T, N>, Consumer<'_, T, N>) {
        let ring: &Self = self;
        (Producer { ring }, Consumer { ring })
    }

    fn enqueue(&self, item: T) -> Result<(), RingError> {
        let head = self.head.load(Ordering::Relaxed);
        let next = (head + 1) & Self::MASK;
        if next == self.tail.load(Ordering::Acquire) {
            return Err(RingError::Full);
        }
        // SAFETY: `head` is outside `tail..head`, so the consumer does not
        // read it, and only the single producer writes slots.
        unsafe { (*self.slots[head].get()).write(item) };
        self.head.store(next, Ordering::Release);
        Ok(())
    }

    fn dequeue(&self) -> Result<T, RingError> {
        let item = self.peek_front().ok_or(RingError::Empty)?;
        let tail = self.tail.load(Ordering::Relaxed);
        self.tail.store((tail + 1) & Self::MASK, Ordering::Release);
        Ok(item)
    }

    fn peek_front(&self) -> Option<T> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }
        // SAFETY: `tail` lies in `tail..head` and was published by the
        // producer's Release store of `head`; it is not rewritten until the
        // consumer advances past it.
        Some(unsafe { (*self.slots[tail].get()).assume_init() })
    }

    fn discard_all(&self) {
        let head = self.head.load(Ordering::Acquire);
        self.tail.store(head, Ordering::Release);
    }
}

impl<T: Copy, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Write half of a split [`RingBuffer`]; the only writer of `head`
pub struct Producer<'a, T, const N: usize> {
    ring: &'a RingBuffer<T, N>,
}

impl<T: Copy, const N: usize> Producer<'_, T, N> {
    /// Append an item; fails without overwriting when full
    pub fn push(&mut self, item: T) -> Result<(), RingError> {
        self.ring.enqueue(item)
    }

    /// Check if a push would fail
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// Check if the consumer has drained everything
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}

/// Read half of a split [`RingBuffer`]; the only writer of `tail`
pub struct Consumer<'a, T, const N: usize> {
    ring: &'a RingBuffer<T, N>,
}

impl<T: Copy, const N: usize> Consumer<'_, T, N> {
    /// Remove the oldest item
    pub fn pop(&mut self) -> Result<T, RingError> {
        self.ring.dequeue()
    }

    /// Oldest item, left in place
    pub fn peek(&self) -> Option<T> {
        self.ring.peek_front()
    }

    /// Check if there is nothing to read
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Number of items waiting
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Drop everything currently waiting
    pub fn clear(&mut self) {
        self.ring.discard_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;
    use std::vec::Vec;

    #[test]
    fn test_new_is_empty() {
        let ring: RingBuffer<u8, 8> = RingBuffer::new();
        assert!(ring.is_empty());
        assert!(!ring.is_full());
        assert_eq!(ring.len(), 0);
        assert_eq!(ring.capacity(), 7);
    }

    #[test]
    fn test_holds_n_minus_one() {
        let mut ring: RingBuffer<u8, 4> = RingBuffer::new();
        assert_eq!(ring.push(1), Ok(()));
        assert_eq!(ring.push(2), Ok(()));
        assert_eq!(ring.push(3), Ok(()));
        assert!(ring.is_full());
        assert_eq!(ring.push(4), Err(RingError::Full));

        // Rejected push left contents alone
        assert_eq!(ring.pop(), Ok(1));
        assert_eq!(ring.pop(), Ok(2));
        assert_eq!(ring.pop(), Ok(3));
        assert_eq!(ring.pop(), Err(RingError::Empty));
    }

    #[test]
    fn test_wraparound() {
        let mut ring: RingBuffer<u16, 4> = RingBuffer::new();
        for round in 0..10u16 {
            ring.push(round).unwrap();
            ring.push(round + 100).unwrap();
            assert_eq!(ring.pop(), Ok(round));
            assert_eq!(ring.pop(), Ok(round + 100));
        }
        assert!(ring.is_empty());
    }

    #[test]
    fn test_front_and_back() {
        let mut ring: RingBuffer<u8, 8> = RingBuffer::new();
        assert_eq!(ring.front(), None);
        assert_eq!(ring.back(), None);

        ring.push(10).unwrap();
        ring.push(20).unwrap();
        ring.push(30).unwrap();
        assert_eq!(ring.front(), Some(10));
        assert_eq!(ring.back(), Some(30));

        // back() across the wrap point (head == 0)
        let mut small: RingBuffer<u8, 4> = RingBuffer::new();
        small.push(1).unwrap();
        small.push(2).unwrap();
        small.push(3).unwrap();
        small.pop().unwrap();
        small.push(4).unwrap();
        assert_eq!(small.back(), Some(4));
    }

    #[test]
    fn test_clear() {
        let mut ring: RingBuffer<u8, 8> = RingBuffer::new();
        ring.push(1).unwrap();
        ring.push(2).unwrap();
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.pop(), Err(RingError::Empty));

        // Usable afterwards
        ring.push(3).unwrap();
        assert_eq!(ring.pop(), Ok(3));
    }

    #[test]
    fn test_split_halves() {
        let mut ring: RingBuffer<u8, 4> = RingBuffer::new();
        let (mut producer, mut consumer) = ring.split();

        assert!(consumer.is_empty());
        producer.push(7).unwrap();
        producer.push(8).unwrap();
        producer.push(9).unwrap();
        assert!(producer.is_full());
        assert_eq!(producer.push(10), Err(RingError::Full));

        assert_eq!(consumer.len(), 3);
        assert_eq!(consumer.peek(), Some(7));
        assert_eq!(consumer.pop(), Ok(7));
        consumer.clear();
        assert!(consumer.is_empty());
        assert!(producer.is_empty());
    }

    #[test]
    fn test_split_across_threads() {
        let mut ring: RingBuffer<u32, 16> = RingBuffer::new();
        let (mut producer, mut consumer) = ring.split();
        let count = 10_000u32;

        std::thread::scope(|s| {
            s.spawn(move || {
                let mut next = 0;
                while next < count {
                    if producer.push(next).is_ok() {
                        next += 1;
                    }
                }
            });

            let mut expected = 0;
            while expected < count {
                if let Ok(value) = consumer.pop() {
                    assert_eq!(value, expected);
                    expected += 1;
                }
            }
        });
    }

    proptest! {
        /// Model check against VecDeque: `true` pushes, `false` pops
        #[test]
        fn prop_matches_fifo_model(ops in proptest::collection::vec(any::<(bool, u8)>(), 0..200)) {
            let mut ring: RingBuffer<u8, 8> = RingBuffer::new();
            let mut model: VecDeque<u8> = VecDeque::new();

            for (is_push, value) in ops {
                if is_push {
                    let result = ring.push(value);
                    if model.len() < 7 {
                        prop_assert_eq!(result, Ok(()));
                        model.push_back(value);
                    } else {
                        prop_assert_eq!(result, Err(RingError::Full));
                    }
                } else {
                    prop_assert_eq!(ring.pop().ok(), model.pop_front());
                }
                prop_assert_eq!(ring.len(), model.len());
                prop_assert_eq!(ring.is_empty(), model.is_empty());
                prop_assert_eq!(ring.is_full(), model.len() == 7);
                prop_assert_eq!(ring.back(), model.back().copied());
            }
        }

        #[test]
        fn prop_accepts_exactly_n_minus_one(values in proptest::collection::vec(any::<u8>(), 20)) {
            let mut ring: RingBuffer<u8, 16> = RingBuffer::new();
            let accepted: Vec<u8> = values
                .iter()
                .copied()
                .take_while(|&v| ring.push(v).is_ok())
                .collect();
            prop_assert_eq!(accepted.len(), 15);
            prop_assert!(ring.is_full());
        }
    }
}
