//! Micro-Benchmark Harness
//!
//! A thin driver over the ring buffer contract: build one buffer of the
//! requested size, run the requested number of write/read iterations,
//! time the whole run. Full and empty signals are ordinary results and
//! are counted in [`Metrics`], never treated as failures.
//!
//! Three scenarios, one per ring variant:
//! - [`run_test`]: sequential write/read cycles on the unsynchronized
//!   ring (reject + non-blocking, the default configuration)
//! - [`run_spsc_test`]: producer and consumer threads spinning on the
//!   lock-free ring
//! - [`run_blocking_test`]: producer and consumer threads parking on the
//!   Mutex/Condvar ring

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::core::{BlockingRing, OverflowPolicy, RingBuffer, RingError, SpscRing};

/// Timing and signal counts from one harness run
#[derive(Debug, Clone, Copy)]
pub struct Metrics {
    /// Number of write/read cycles performed
    pub iterations: usize,
    /// Wall-clock time for the whole run
    pub elapsed: Duration,
    /// Writes that found the buffer full
    pub full_rejections: u64,
    /// Reads that found the buffer empty
    pub empty_misses: u64,
}

impl Metrics {
    /// Completed iterations per second
    pub fn ops_per_sec(&self) -> f64 {
        self.iterations as f64 / self.elapsed.as_secs_f64()
    }

    /// Mean wall-clock cost of one iteration
    pub fn ns_per_op(&self) -> f64 {
        self.elapsed.as_nanos() as f64 / self.iterations as f64
    }
}

/// Runs the default scenario: one unsynchronized ring, `num_iterations`
/// write/read cycles, reject policy, non-blocking reads.
///
/// Each cycle writes one element and immediately reads it back, so the
/// occupancy never exceeds one and a correct ring records zero full
/// rejections and zero empty misses.
pub fn run_test(buffer_size: usize, num_iterations: usize) -> Result<Metrics, RingError> {
    let mut ring: RingBuffer<u64> = RingBuffer::new(buffer_size)?;
    let mut full_rejections = 0u64;
    let mut empty_misses = 0u64;

    let start = Instant::now();
    for i in 0..num_iterations {
        match ring.push(i as u64) {
            Ok(()) => {}
            Err(RingError::Full) => full_rejections += 1,
            Err(e) => return Err(e),
        }
        match ring.pop() {
            Ok(_) => {}
            Err(RingError::Empty) => empty_misses += 1,
            Err(e) => return Err(e),
        }
    }
    let elapsed = start.elapsed();

    Ok(Metrics {
        iterations: num_iterations,
        elapsed,
        full_rejections,
        empty_misses,
    })
}

/// Runs the lock-free scenario: a producer thread writes
/// `0..num_iterations` into an [`SpscRing`] while a consumer thread
/// drains it, both spinning on full/empty signals.
///
/// The consumer checks that every value arrives exactly once in
/// increasing order; a gap means the ring reordered or dropped a write,
/// which is a broken invariant and aborts the run.
pub fn run_spsc_test(buffer_size: usize, num_iterations: usize) -> Result<Metrics, RingError> {
    let ring = Arc::new(SpscRing::<u64>::with_capacity(buffer_size)?);
    let producer_ring = Arc::clone(&ring);
    let consumer_ring = Arc::clone(&ring);

    let start = Instant::now();

    let producer = thread::spawn(move || {
        let mut rejections = 0u64;
        for i in 0..num_iterations as u64 {
            loop {
                match producer_ring.try_push(i) {
                    Ok(()) => break,
                    Err(_) => {
                        rejections += 1;
                        std::hint::spin_loop();
                    }
                }
            }
        }
        rejections
    });

    let consumer = thread::spawn(move || {
        let mut misses = 0u64;
        for expected in 0..num_iterations as u64 {
            loop {
                match consumer_ring.try_pop() {
                    Ok(value) => {
                        assert_eq!(value, expected, "ring broke FIFO ordering");
                        break;
                    }
                    Err(_) => {
                        misses += 1;
                        std::hint::spin_loop();
                    }
                }
            }
        }
        misses
    });

    let full_rejections = producer.join().expect("producer thread panicked");
    let empty_misses = consumer.join().expect("consumer thread panicked");
    let elapsed = start.elapsed();

    Ok(Metrics {
        iterations: num_iterations,
        elapsed,
        full_rejections,
        empty_misses,
    })
}

/// Runs the blocking scenario: the same producer/consumer pair over a
/// [`BlockingRing`] with the block-on-full policy, parking instead of
/// spinning.
///
/// Blocking calls surface no full/empty signals, so those counters are
/// zero in the returned metrics.
pub fn run_blocking_test(buffer_size: usize, num_iterations: usize) -> Result<Metrics, RingError> {
    let ring = Arc::new(BlockingRing::<u64>::with_policy(
        buffer_size,
        OverflowPolicy::Block,
    )?);
    let producer_ring = Arc::clone(&ring);
    let consumer_ring = Arc::clone(&ring);

    let start = Instant::now();

    let producer = thread::spawn(move || -> Result<(), RingError> {
        for i in 0..num_iterations as u64 {
            producer_ring.push(i)?;
        }
        Ok(())
    });

    let consumer = thread::spawn(move || -> Result<(), RingError> {
        for expected in 0..num_iterations as u64 {
            let value = consumer_ring.pop()?;
            assert_eq!(value, expected, "ring broke FIFO ordering");
        }
        Ok(())
    });

    producer.join().expect("producer thread panicked")?;
    consumer.join().expect("consumer thread panicked")?;
    let elapsed = start.elapsed();

    Ok(Metrics {
        iterations: num_iterations,
        elapsed,
        full_rejections: 0,
        empty_misses: 0,
    })
}
