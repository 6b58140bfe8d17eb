//! Single-Threaded Fixed-Capacity Ring Buffer
//!
//! The baseline variant: no internal synchronization, the caller
//! guarantees exclusive access. Storage is allocated once at construction
//! and reused forever; both cursors advance modulo the capacity.

use super::error::RingError;

/// What a write does when the buffer is already full.
///
/// Chosen once at construction and fixed for the buffer's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Fail the write with [`RingError::Full`], buffer untouched
    #[default]
    Reject,
    /// Park the writer until a reader frees a slot (concurrent rings only)
    Block,
    /// Evict the oldest element so the newest write always lands
    Overwrite,
}

/// Fixed-capacity FIFO ring for exclusive (single-context) access.
///
/// Occupancy is tracked explicitly in `len`, so `read_index == write_index`
/// is never ambiguous between full and empty.
pub struct RingBuffer<T> {
    storage: Box<[Option<T>]>,
    capacity: usize,
    read_index: usize,
    write_index: usize,
    len: usize,
    policy: OverflowPolicy,
}

impl<T> RingBuffer<T> {
    /// Creates a ring with the [`OverflowPolicy::Reject`] default.
    ///
    /// Fails with [`RingError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        Self::with_policy(capacity, OverflowPolicy::Reject)
    }

    /// Creates a ring with an explicit overflow policy.
    ///
    /// `Block` cannot park without a concurrent reader to wake it, so this
    /// variant treats it as `Reject`; the blocking ring honors it fully.
    pub fn with_policy(capacity: usize, policy: OverflowPolicy) -> Result<Self, RingError> {
        if capacity == 0 {
            return Err(RingError::InvalidCapacity);
        }

        let mut storage = Vec::with_capacity(capacity);
        storage.resize_with(capacity, || None);

        Ok(Self {
            storage: storage.into_boxed_slice(),
            capacity,
            read_index: 0,
            write_index: 0,
            len: 0,
            policy,
        })
    }

    /// Inserts `value` at the write cursor.
    ///
    /// On a full buffer the configured policy decides: `Reject` (and
    /// `Block`, see [`Self::with_policy`]) fail with [`RingError::Full`]
    /// without touching the buffer; `Overwrite` evicts the oldest element
    /// first, so the newest write always succeeds.
    pub fn push(&mut self, value: T) -> Result<(), RingError> {
        if self.len == self.capacity {
            match self.policy {
                OverflowPolicy::Reject | OverflowPolicy::Block => return Err(RingError::Full),
                OverflowPolicy::Overwrite => {
                    // Free the oldest slot, then fall through to the insert.
                    self.storage[self.read_index] = None;
                    self.read_index = (self.read_index + 1) % self.capacity;
                    self.len -= 1;
                }
            }
        }

        self.storage[self.write_index] = Some(value);
        self.write_index = (self.write_index + 1) % self.capacity;
        self.len += 1;

        Ok(())
    }

    /// Removes and returns the oldest element (FIFO).
    ///
    /// Fails with [`RingError::Empty`] on an empty buffer, leaving the
    /// cursors untouched.
    pub fn pop(&mut self) -> Result<T, RingError> {
        if self.len == 0 {
            return Err(RingError::Empty);
        }

        match self.storage[self.read_index].take() {
            Some(value) => {
                self.read_index = (self.read_index + 1) % self.capacity;
                self.len -= 1;
                Ok(value)
            }
            // Occupied range [read_index, read_index + len) always holds
            // Some; a None here means the cursor bookkeeping broke.
            None => unreachable!("occupied slot holds no value"),
        }
    }

    /// Returns the oldest element without consuming it.
    pub fn peek(&self) -> Result<&T, RingError> {
        if self.len == 0 {
            return Err(RingError::Empty);
        }

        match self.storage[self.read_index].as_ref() {
            Some(value) => Ok(value),
            None => unreachable!("occupied slot holds no value"),
        }
    }

    /// Number of occupied slots
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no slot is occupied
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when every slot is occupied
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Slot capacity fixed at construction
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The overflow policy chosen at construction
    #[inline(always)]
    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }
}
