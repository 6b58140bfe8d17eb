//! Core module: fixed-capacity ring buffer variants
//!
//! Design principles:
//! - One allocation: storage sized at construction, reused for the lifetime
//! - Explicit occupancy: count kept alongside the cursors, so full vs
//!   empty is never ambiguous
//! - Policy at construction: full-buffer behavior picked once, never per call

mod blocking;
mod error;
mod ring_buffer;
mod spsc;

pub use blocking::BlockingRing;
pub use error::RingError;
pub use ring_buffer::{OverflowPolicy, RingBuffer};
pub use spsc::SpscRing;
