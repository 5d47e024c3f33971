//! AMP Signals - Environment Signal Collection
//!
//! Gathers the raw device signals the policy engine tiers on:
//! memory hint, logical core count, reduced-motion preference,
//! WebGL version and a bounded micro-benchmark score.
//!
//! Collection never fails. A signal the environment cannot report is
//! carried as `None` and left for the profiler to degrade conservatively.
//!
//! # Sources
//!
//! | Probe | Memory | Cores | Reduced motion | WebGL |
//! |-------|--------|-------|----------------|-------|
//! | `SystemProbe` | sysinfo | available parallelism | host override | host override |
//! | `HintProbe` | `navigator.deviceMemory` | `hardwareConcurrency` | media query | context probe |

mod benchmark;
mod collector;
mod probe;
mod signal;

pub use benchmark::{BenchmarkResult, MicroBenchmark, DEFAULT_BENCHMARK_CAP, MAX_BENCHMARK_CAP};
pub use collector::SignalCollector;
pub use probe::{EnvironmentHints, EnvironmentProbe, HintProbe, HintsError, SystemProbe};
pub use signal::{Signal, WebGlVersion};
