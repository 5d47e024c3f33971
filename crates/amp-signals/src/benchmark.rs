//! Bounded Micro-Benchmark
//!
//! Runs a fixed reference workload in small chunks and stops as soon as
//! the wall-clock cap is reached, so collection can never become a jank
//! source itself. When the cap cuts the run short the score is
//! extrapolated to the full workload.
//!
//! The score is a relative cost, not an absolute unit. It is only ever
//! compared against the policy thresholds.

use std::hint::black_box;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default wall-clock cap for one benchmark run
pub const DEFAULT_BENCHMARK_CAP: Duration = Duration::from_millis(8);

/// Hard upper bound on any configured cap
pub const MAX_BENCHMARK_CAP: Duration = Duration::from_millis(10);

/// Iterations in the reference workload
const REFERENCE_ITERATIONS: u64 = 8_000_000;

/// Iterations between clock checks
const CHUNK_ITERATIONS: u64 = 20_000;

/// Outcome of a single benchmark run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkResult {
    /// Projected milliseconds to finish the reference workload
    pub score_ms: f64,
    /// Wall-clock time actually spent
    pub elapsed: Duration,
    /// Iterations completed before stopping
    pub completed_iterations: u64,
    /// Whether the cap stopped the run early
    pub truncated: bool,
}

/// Short synchronous CPU benchmark with a hard time cap
#[derive(Debug, Clone, Copy)]
pub struct MicroBenchmark {
    cap: Duration,
    workload: u64,
}

impl MicroBenchmark {
    /// Create a benchmark with the given cap (clamped to `MAX_BENCHMARK_CAP`)
    pub fn new(cap: Duration) -> Self {
        Self {
            cap: cap.min(MAX_BENCHMARK_CAP),
            workload: REFERENCE_ITERATIONS,
        }
    }

    /// Effective wall-clock cap
    pub fn cap(&self) -> Duration {
        self.cap
    }

    /// Run the workload until it completes or the cap is hit
    pub fn run(&self) -> BenchmarkResult {
        let start = Instant::now();
        let mut completed = 0u64;
        let mut acc = 1.000_1f64;

        while completed < self.workload {
            let chunk = CHUNK_ITERATIONS.min(self.workload - completed);
            for i in 0..chunk {
                acc = black_box((acc * 1.000_000_1 + (i as f64).sqrt()) % 1_000.0);
            }
            completed += chunk;

            if start.elapsed() >= self.cap {
                break;
            }
        }

        let elapsed = start.elapsed();
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        let truncated = completed < self.workload;
        let score_ms = elapsed_ms * (self.workload as f64 / completed as f64);

        debug!(
            "Micro-benchmark: {} / {} iterations in {:.2}ms, score {:.1}",
            completed, self.workload, elapsed_ms, score_ms
        );

        BenchmarkResult {
            score_ms,
            elapsed,
            completed_iterations: completed,
            truncated,
        }
    }
}

impl Default for MicroBenchmark {
    fn default() -> Self {
        Self::new(DEFAULT_BENCHMARK_CAP)
    }
}
