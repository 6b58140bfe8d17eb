//! Ixion - Ring Buffer Micro-Benchmark Runner
//!
//! Runs the standard benchmark suite:
//! - Single-threaded ring: sequential write/read cycles
//! - Lock-free SPSC ring: producer/consumer threads, spin on full/empty
//! - Blocking ring: producer/consumer threads, park on full/empty

use ixion::harness::{run_blocking_test, run_spsc_test, run_test, Metrics};
use ixion::RingError;

const BUFFER_SIZE: usize = 1024;
const ITERATIONS: usize = 1_000_000;

fn main() -> Result<(), RingError> {
    println!("🚀 Ixion Ring Buffer Benchmarks");
    println!("================================\n");
    println!(
        "Buffer size: {} slots, {} iterations per scenario\n",
        BUFFER_SIZE, ITERATIONS
    );

    println!("📊 Single-Threaded Ring (reject + non-blocking)");
    println!("-----------------------------------------------");
    let metrics = run_test(BUFFER_SIZE, ITERATIONS)?;
    print_report(&metrics);

    println!("📊 Lock-Free SPSC Ring (spin on full/empty)");
    println!("-------------------------------------------");
    let metrics = run_spsc_test(BUFFER_SIZE, ITERATIONS)?;
    print_report(&metrics);

    println!("📊 Blocking Ring (park on full/empty)");
    println!("-------------------------------------");
    let metrics = run_blocking_test(BUFFER_SIZE, ITERATIONS)?;
    print_report(&metrics);

    println!("✅ All benchmarks complete!");
    Ok(())
}

fn print_report(metrics: &Metrics) {
    println!("  Iterations: {}", metrics.iterations);
    println!(
        "  Latency:    {:.2} ns/op ({:.3} μs/op)",
        metrics.ns_per_op(),
        metrics.ns_per_op() / 1000.0
    );
    println!(
        "  Throughput: {:.2} M ops/sec",
        metrics.ops_per_sec() / 1_000_000.0
    );
    println!(
        "  Signals:    {} full, {} empty\n",
        metrics.full_rejections, metrics.empty_misses
    );
}
