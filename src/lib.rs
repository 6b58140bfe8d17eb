//! Ixion - Fixed-Capacity Ring Buffers with a Micro-Benchmark Harness
//!
//! Architecture:
//! - Bounded: capacity fixed at construction, one allocation, no resize
//! - FIFO: elements leave in exactly the order they entered
//! - Policy-driven: full-buffer behavior chosen at construction
//!   (reject / block / overwrite-oldest)
//! - Three variants: an unsynchronized ring for exclusive access, a
//!   lock-free SPSC ring for the concurrent hot path, and a
//!   Mutex/Condvar ring for blocking producers and consumers

pub mod core;
pub mod harness;

pub use crate::core::{BlockingRing, OverflowPolicy, RingBuffer, RingError, SpscRing};
pub use crate::harness::{run_blocking_test, run_spsc_test, run_test, Metrics};
