//! Producer/Consumer Stress Tests
//!
//! Drives the concurrent ring variants far past their capacity so the
//! cursors wrap thousands of times, and checks the FIFO contract held
//! the whole way through.
//!
//! Usage:
//!   cargo test --release --test stress_test -- --nocapture

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use ixion::core::{BlockingRing, RingError, SpscRing};
use ixion::harness::run_test;

const CAPACITY: usize = 8;
const N: u64 = 100_000;

#[test]
fn test_spsc_stress_exactly_once_in_order() {
    let ring = Arc::new(SpscRing::<u64>::with_capacity(CAPACITY).unwrap());
    let producer_ring = Arc::clone(&ring);

    let start = Instant::now();

    let producer = thread::spawn(move || {
        for i in 0..N {
            while producer_ring.try_push(i).is_err() {
                std::hint::spin_loop();
            }
        }
    });

    for expected in 0..N {
        let value = loop {
            match ring.try_pop() {
                Ok(v) => break v,
                Err(_) => std::hint::spin_loop(),
            }
        };
        assert_eq!(value, expected, "value out of order at position {}", expected);
    }

    producer.join().expect("producer thread panicked");
    let duration = start.elapsed();

    assert!(ring.is_empty());
    println!(
        "SPSC stress: {} values through {} slots in {:.2}ms ({:.2} M ops/sec)",
        N,
        CAPACITY,
        duration.as_secs_f64() * 1000.0,
        N as f64 / duration.as_secs_f64() / 1_000_000.0
    );
}

#[test]
fn test_blocking_stress_exactly_once_in_order() {
    let ring = Arc::new(BlockingRing::<u64>::new(CAPACITY).unwrap());
    let producer_ring = Arc::clone(&ring);
    let consumer_ring = Arc::clone(&ring);

    let start = Instant::now();

    let producer = thread::spawn(move || {
        for i in 0..N {
            producer_ring.push(i).expect("push failed mid-run");
        }
    });

    let consumer = thread::spawn(move || {
        for expected in 0..N {
            let value = consumer_ring.pop().expect("pop failed mid-run");
            assert_eq!(value, expected, "value out of order at position {}", expected);
        }
    });

    producer.join().expect("producer thread panicked");
    consumer.join().expect("consumer thread panicked");
    let duration = start.elapsed();

    assert!(ring.is_empty());
    println!(
        "Blocking stress: {} values through {} slots in {:.2}ms ({:.2} M ops/sec)",
        N,
        CAPACITY,
        duration.as_secs_f64() * 1000.0,
        N as f64 / duration.as_secs_f64() / 1_000_000.0
    );
}

#[test]
fn test_blocking_two_consumers_each_value_exactly_once() {
    let ring = Arc::new(BlockingRing::<u64>::new(CAPACITY).unwrap());

    // Each consumer drains until the closed ring reports Cancelled.
    let spawn_consumer = |ring: Arc<BlockingRing<u64>>| {
        thread::spawn(move || {
            let mut seen = Vec::new();
            loop {
                match ring.pop() {
                    Ok(value) => seen.push(value),
                    Err(RingError::Cancelled) => break,
                    Err(e) => panic!("unexpected pop error: {}", e),
                }
            }
            seen
        })
    };

    let first = spawn_consumer(Arc::clone(&ring));
    let second = spawn_consumer(Arc::clone(&ring));

    for i in 0..N {
        ring.push(i).expect("push failed mid-run");
    }
    ring.close();

    let first_seen = first.join().expect("consumer thread panicked");
    let second_seen = second.join().expect("consumer thread panicked");

    // Pops are serialized, so each consumer's subsequence is increasing.
    for seen in [&first_seen, &second_seen] {
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    // And together they observed every value exactly once.
    let mut all: Vec<u64> = first_seen;
    all.extend(second_seen);
    all.sort_unstable();
    assert_eq!(all, (0..N).collect::<Vec<u64>>());
}

#[test]
fn test_harness_reports_clean_sequential_run() {
    let metrics = run_test(1024, 1_000_000).expect("harness run failed");

    assert_eq!(metrics.iterations, 1_000_000);
    assert_eq!(metrics.full_rejections, 0);
    assert_eq!(metrics.empty_misses, 0);

    println!(
        "Harness: {} iterations in {:.2}ms ({:.2} ns/op, {:.2} M ops/sec)",
        metrics.iterations,
        metrics.elapsed.as_secs_f64() * 1000.0,
        metrics.ns_per_op(),
        metrics.ops_per_sec() / 1_000_000.0
    );
}
