//! Blocking Concurrent Ring Buffer
//!
//! A Mutex-guarded ring with two condition variables: writers park on
//! `not_full`, readers park on `not_empty`. All cursor mutations happen
//! under the one lock, so the occupancy count is never observed
//! mid-update. Supports every overflow policy plus timeouts and
//! `close()` cancellation; no busy-spinning.

use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::error::RingError;
use super::ring_buffer::OverflowPolicy;

// A poisoned lock means a panic happened mid-mutation; the cursor state
// can no longer be trusted, which is fatal rather than recoverable.
const POISONED: &str = "ring state poisoned";

struct State<T> {
    storage: Box<[Option<T>]>,
    read_index: usize,
    write_index: usize,
    len: usize,
    closed: bool,
}

impl<T> State<T> {
    fn insert(&mut self, value: T) {
        let capacity = self.storage.len();
        self.storage[self.write_index] = Some(value);
        self.write_index = (self.write_index + 1) % capacity;
        self.len += 1;
    }

    fn remove(&mut self) -> T {
        let capacity = self.storage.len();
        match self.storage[self.read_index].take() {
            Some(value) => {
                self.read_index = (self.read_index + 1) % capacity;
                self.len -= 1;
                value
            }
            None => unreachable!("occupied slot holds no value"),
        }
    }

    fn evict_oldest(&mut self) {
        let capacity = self.storage.len();
        self.storage[self.read_index] = None;
        self.read_index = (self.read_index + 1) % capacity;
        self.len -= 1;
    }
}

/// Fixed-capacity FIFO ring shared between one producer and any number
/// of consumers.
///
/// Readers park while the ring is empty and writers park while it is
/// full (under [`OverflowPolicy::Block`]); each successful operation
/// wakes the opposite side. `close()` releases every parked caller with
/// [`RingError::Cancelled`].
pub struct BlockingRing<T> {
    state: Mutex<State<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
    policy: OverflowPolicy,
}

impl<T> BlockingRing<T> {
    /// Creates a ring with the [`OverflowPolicy::Block`] default.
    ///
    /// Fails with [`RingError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        Self::with_policy(capacity, OverflowPolicy::Block)
    }

    /// Creates a ring with an explicit overflow policy.
    pub fn with_policy(capacity: usize, policy: OverflowPolicy) -> Result<Self, RingError> {
        if capacity == 0 {
            return Err(RingError::InvalidCapacity);
        }

        let mut storage = Vec::with_capacity(capacity);
        storage.resize_with(capacity, || None);

        Ok(Self {
            state: Mutex::new(State {
                storage: storage.into_boxed_slice(),
                read_index: 0,
                write_index: 0,
                len: 0,
                closed: false,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
            policy,
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().expect(POISONED)
    }

    /// Inserts `value`, applying the configured overflow policy.
    ///
    /// On a full ring: `Reject` fails with [`RingError::Full`], `Block`
    /// parks until a reader frees a slot, `Overwrite` evicts the oldest
    /// element. Fails with [`RingError::Cancelled`] once the ring is
    /// closed; the ring is left untouched on every error path.
    pub fn push(&self, value: T) -> Result<(), RingError> {
        let mut state = self.lock_state();

        while state.len == self.capacity {
            if state.closed {
                return Err(RingError::Cancelled);
            }
            match self.policy {
                OverflowPolicy::Reject => return Err(RingError::Full),
                OverflowPolicy::Overwrite => state.evict_oldest(),
                OverflowPolicy::Block => {
                    state = self.not_full.wait(state).expect(POISONED);
                }
            }
        }

        if state.closed {
            return Err(RingError::Cancelled);
        }

        state.insert(value);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Removes and returns the oldest element, parking while the ring
    /// is empty.
    ///
    /// A closed ring still drains: remaining elements are returned in
    /// order, and only an empty closed ring fails with
    /// [`RingError::Cancelled`].
    pub fn pop(&self) -> Result<T, RingError> {
        let mut state = self.lock_state();

        while state.len == 0 {
            if state.closed {
                return Err(RingError::Cancelled);
            }
            state = self.not_empty.wait(state).expect(POISONED);
        }

        let value = state.remove();
        self.not_full.notify_one();
        Ok(value)
    }

    /// Non-parking insert: a full ring fails immediately.
    ///
    /// Under `Overwrite` the oldest element is still evicted, so this
    /// only fails on a closed ring.
    pub fn try_push(&self, value: T) -> Result<(), RingError> {
        let mut state = self.lock_state();

        if state.closed {
            return Err(RingError::Cancelled);
        }

        if state.len == self.capacity {
            match self.policy {
                OverflowPolicy::Overwrite => state.evict_oldest(),
                OverflowPolicy::Reject | OverflowPolicy::Block => return Err(RingError::Full),
            }
        }

        state.insert(value);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Non-parking read: an empty ring fails immediately.
    ///
    /// [`RingError::Empty`] means "nothing yet"; [`RingError::Cancelled`]
    /// means the ring is closed and fully drained.
    pub fn try_pop(&self) -> Result<T, RingError> {
        let mut state = self.lock_state();

        if state.len == 0 {
            if state.closed {
                return Err(RingError::Cancelled);
            }
            return Err(RingError::Empty);
        }

        let value = state.remove();
        self.not_full.notify_one();
        Ok(value)
    }

    /// [`Self::push`] with a deadline; parked writes that outlive
    /// `timeout` fail with [`RingError::Cancelled`], state untouched.
    pub fn push_timeout(&self, value: T, timeout: Duration) -> Result<(), RingError> {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock_state();

        while state.len == self.capacity {
            if state.closed {
                return Err(RingError::Cancelled);
            }
            match self.policy {
                OverflowPolicy::Reject => return Err(RingError::Full),
                OverflowPolicy::Overwrite => state.evict_oldest(),
                OverflowPolicy::Block => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Err(RingError::Cancelled);
                    }
                    let (guard, _) = self
                        .not_full
                        .wait_timeout(state, remaining)
                        .expect(POISONED);
                    state = guard;
                }
            }
        }

        if state.closed {
            return Err(RingError::Cancelled);
        }

        state.insert(value);
        self.not_empty.notify_one();
        Ok(())
    }

    /// [`Self::pop`] with a deadline; parked reads that outlive
    /// `timeout` fail with [`RingError::Cancelled`], state untouched.
    pub fn pop_timeout(&self, timeout: Duration) -> Result<T, RingError> {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock_state();

        while state.len == 0 {
            if state.closed {
                return Err(RingError::Cancelled);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(RingError::Cancelled);
            }
            let (guard, _) = self
                .not_empty
                .wait_timeout(state, remaining)
                .expect(POISONED);
            state = guard;
        }

        let value = state.remove();
        self.not_full.notify_one();
        Ok(value)
    }

    /// Reads the oldest element in place without consuming it.
    ///
    /// The element stays under the lock, so access goes through a
    /// closure instead of a returned reference.
    pub fn peek_with<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, RingError> {
        let state = self.lock_state();

        if state.len == 0 {
            return Err(RingError::Empty);
        }

        match state.storage[state.read_index].as_ref() {
            Some(value) => Ok(f(value)),
            None => unreachable!("occupied slot holds no value"),
        }
    }

    /// Shuts the ring down: every parked call wakes and fails with
    /// [`RingError::Cancelled`]; readers may still drain what is left.
    pub fn close(&self) {
        let mut state = self.lock_state();
        state.closed = true;
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    /// True once `close()` has been called
    pub fn is_closed(&self) -> bool {
        self.lock_state().closed
    }

    /// Occupancy snapshot; may be stale by the time it returns
    pub fn len(&self) -> usize {
        self.lock_state().len
    }

    /// True when the snapshot occupancy is zero
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the snapshot occupancy equals the capacity
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    /// Slot capacity fixed at construction
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The overflow policy chosen at construction
    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            BlockingRing::<u64>::new(0).err(),
            Some(RingError::InvalidCapacity)
        );
    }

    #[test]
    fn test_fifo_within_capacity() {
        let rb = BlockingRing::new(4).unwrap();

        for i in 1..=4u64 {
            rb.push(i).unwrap();
        }
        for i in 1..=4u64 {
            assert_eq!(rb.pop(), Ok(i));
        }
        assert!(rb.is_empty());
    }

    #[test]
    fn test_reject_policy() {
        let rb = BlockingRing::with_policy(2, OverflowPolicy::Reject).unwrap();

        rb.push(1u64).unwrap();
        rb.push(2).unwrap();
        assert_eq!(rb.push(3), Err(RingError::Full));
        assert_eq!(rb.try_push(3), Err(RingError::Full));

        assert_eq!(rb.pop(), Ok(1));
        assert_eq!(rb.pop(), Ok(2));
    }

    #[test]
    fn test_overwrite_policy() {
        let rb = BlockingRing::with_policy(4, OverflowPolicy::Overwrite).unwrap();

        for i in 1..=5u64 {
            rb.push(i).unwrap();
        }

        for i in 2..=5u64 {
            assert_eq!(rb.pop(), Ok(i));
        }
        assert!(rb.is_empty());
    }

    #[test]
    fn test_try_pop_empty() {
        let rb = BlockingRing::<u64>::new(2).unwrap();
        assert_eq!(rb.try_pop(), Err(RingError::Empty));
        assert_eq!(rb.len(), 0);
    }

    #[test]
    fn test_blocked_writer_wakes_on_pop() {
        let rb = Arc::new(BlockingRing::new(1).unwrap());
        rb.push(1u64).unwrap();

        let writer_rb = Arc::clone(&rb);
        let writer = thread::spawn(move || writer_rb.push(2));

        // Give the writer time to park on not_full.
        thread::sleep(Duration::from_millis(50));
        assert_eq!(rb.pop(), Ok(1));

        writer.join().expect("writer thread panicked").unwrap();
        assert_eq!(rb.pop(), Ok(2));
    }

    #[test]
    fn test_blocked_reader_wakes_on_push() {
        let rb = Arc::new(BlockingRing::<u64>::new(4).unwrap());

        let reader_rb = Arc::clone(&rb);
        let reader = thread::spawn(move || reader_rb.pop());

        thread::sleep(Duration::from_millis(50));
        rb.push(99).unwrap();

        assert_eq!(reader.join().expect("reader thread panicked"), Ok(99));
    }

    #[test]
    fn test_pop_timeout_cancels() {
        let rb = BlockingRing::<u64>::new(2).unwrap();

        let start = Instant::now();
        assert_eq!(
            rb.pop_timeout(Duration::from_millis(20)),
            Err(RingError::Cancelled)
        );
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert_eq!(rb.len(), 0);
    }

    #[test]
    fn test_push_timeout_cancels_when_full() {
        let rb = BlockingRing::new(1).unwrap();
        rb.push(1u64).unwrap();

        assert_eq!(
            rb.push_timeout(2, Duration::from_millis(20)),
            Err(RingError::Cancelled)
        );

        // The parked write must not have landed.
        assert_eq!(rb.len(), 1);
        assert_eq!(rb.pop(), Ok(1));
    }

    #[test]
    fn test_close_releases_blocked_reader() {
        let rb = Arc::new(BlockingRing::<u64>::new(2).unwrap());

        let reader_rb = Arc::clone(&rb);
        let reader = thread::spawn(move || reader_rb.pop());

        thread::sleep(Duration::from_millis(50));
        rb.close();

        assert_eq!(
            reader.join().expect("reader thread panicked"),
            Err(RingError::Cancelled)
        );
    }

    #[test]
    fn test_closed_ring_drains_then_cancels() {
        let rb = BlockingRing::new(4).unwrap();
        rb.push(1u64).unwrap();
        rb.push(2).unwrap();
        rb.close();

        assert_eq!(rb.push(3), Err(RingError::Cancelled));
        assert_eq!(rb.pop(), Ok(1));
        assert_eq!(rb.pop(), Ok(2));
        assert_eq!(rb.pop(), Err(RingError::Cancelled));
        assert_eq!(rb.try_pop(), Err(RingError::Cancelled));
    }

    #[test]
    fn test_peek_with() {
        let rb = BlockingRing::new(2).unwrap();

        assert_eq!(
            rb.peek_with(|v: &u64| *v).err(),
            Some(RingError::Empty)
        );

        rb.push(7u64).unwrap();
        assert_eq!(rb.peek_with(|v| *v), Ok(7));
        assert_eq!(rb.len(), 1);
        assert_eq!(rb.pop(), Ok(7));
    }
}
