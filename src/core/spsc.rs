//! Lock-Free Single-Producer Single-Consumer (SPSC) Ring
//!
//! A Lamport queue with acquire/release memory ordering. No Mutex, no
//! allocation after construction. The overflow behavior is always
//! reject: a lock-free slot cannot evict safely, so the blocking and
//! overwrite policies live in the blocking ring instead.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::RingError;

/// Slot in the ring - fixed-size storage for one element
#[repr(C, align(64))] // Cache line alignment to avoid false sharing
struct Slot<T> {
    data: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Slot<T> {
    const fn new() -> Self {
        Self {
            data: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }
}

/// Padding for cache line isolation (64 bytes on x86-64)
#[repr(C, align(64))]
struct CacheLinePadded<T> {
    value: T,
}

impl<T> CacheLinePadded<T> {
    const fn new(value: T) -> Self {
        Self { value }
    }
}

/// Lock-Free SPSC Ring
///
/// Head and tail are free-running counters on separate cache lines, so
/// the producer and consumer never contend on the same line. The slot
/// index is the counter masked by `capacity - 1`.
#[repr(C)]
pub struct SpscRing<T> {
    // Producer side - cache line aligned
    head: CacheLinePadded<AtomicUsize>,
    // Consumer side - cache line aligned
    tail: CacheLinePadded<AtomicUsize>,
    // Pre-allocated slots on the heap - no allocation after init
    buffer: Box<[Slot<T>]>,
    capacity: usize,
    // Mask for fast modulo (capacity is a power of 2)
    mask: usize,
}

// SAFETY: SpscRing is Send/Sync because:
// - Only the one producer writes head
// - Only the one consumer writes tail
// - Atomic ordering guarantees slot visibility across the two
unsafe impl<T: Send> Send for SpscRing<T> {}
unsafe impl<T: Send> Sync for SpscRing<T> {}

impl<T: Copy> SpscRing<T> {
    /// Creates a ring able to hold at least `capacity` elements.
    ///
    /// The capacity is rounded up to the next power of two so the modulo
    /// on the hot path is a single mask; [`Self::capacity`] reports the
    /// rounded value. Allocation happens exactly once, here.
    ///
    /// Fails with [`RingError::InvalidCapacity`] if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, RingError> {
        if capacity == 0 {
            return Err(RingError::InvalidCapacity);
        }

        let capacity = capacity.next_power_of_two();
        let mut buffer = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            buffer.push(Slot::new());
        }

        Ok(Self {
            head: CacheLinePadded::new(AtomicUsize::new(0)),
            tail: CacheLinePadded::new(AtomicUsize::new(0)),
            buffer: buffer.into_boxed_slice(),
            capacity,
            mask: capacity - 1,
        })
    }

    /// Push a value into the ring (producer side).
    ///
    /// Fails with [`RingError::Full`] when every slot is occupied.
    /// Zero-allocation, lock-free.
    #[inline(always)]
    pub fn try_push(&self, value: T) -> Result<(), RingError> {
        let head = self.head.value.load(Ordering::Relaxed);
        let tail = self.tail.value.load(Ordering::Acquire);

        if head.wrapping_sub(tail) >= self.capacity {
            return Err(RingError::Full);
        }

        let slot = &self.buffer[head & self.mask];

        // SAFETY: the occupancy check proves the consumer is done with
        // this slot, and only this producer writes it.
        unsafe {
            (*slot.data.get()).write(value);
        }

        // Release: the slot write must be visible before the new head.
        self.head
            .value
            .store(head.wrapping_add(1), Ordering::Release);

        Ok(())
    }

    /// Pop the oldest value from the ring (consumer side).
    ///
    /// Fails with [`RingError::Empty`] when no slot is occupied.
    /// Zero-allocation, lock-free.
    #[inline(always)]
    pub fn try_pop(&self) -> Result<T, RingError> {
        let tail = self.tail.value.load(Ordering::Relaxed);
        let head = self.head.value.load(Ordering::Acquire);

        if tail == head {
            return Err(RingError::Empty);
        }

        let slot = &self.buffer[tail & self.mask];

        // SAFETY: head has passed this slot, so the value is fully
        // written and the producer will not touch it again until tail
        // moves past it.
        let value = unsafe { (*slot.data.get()).assume_init_read() };

        // Release: the slot read must complete before the new tail.
        self.tail
            .value
            .store(tail.wrapping_add(1), Ordering::Release);

        Ok(value)
    }

    /// True when no slot is occupied
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        let tail = self.tail.value.load(Ordering::Acquire);
        let head = self.head.value.load(Ordering::Acquire);
        tail == head
    }

    /// True when every slot is occupied
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        let head = self.head.value.load(Ordering::Acquire);
        let tail = self.tail.value.load(Ordering::Acquire);
        head.wrapping_sub(tail) >= self.capacity
    }

    /// Number of occupied slots; advisory under concurrent access
    #[inline(always)]
    pub fn len(&self) -> usize {
        let head = self.head.value.load(Ordering::Acquire);
        let tail = self.tail.value.load(Ordering::Acquire);
        head.wrapping_sub(tail)
    }

    /// Slot capacity after power-of-two rounding
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
