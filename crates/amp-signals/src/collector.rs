//! Signal Collector
//!
//! Reads every hint from a probe, runs the bounded benchmark and
//! freezes the result into a `Signal`. No policy lives here.

use crate::benchmark::MicroBenchmark;
use crate::probe::{EnvironmentProbe, SystemProbe};
use crate::signal::Signal;
use tracing::debug;

/// Where the benchmark score comes from
#[derive(Debug, Clone, Copy)]
enum BenchmarkSource {
    /// Measure on every collection
    Measure(MicroBenchmark),
    /// Use a score measured elsewhere
    Fixed(f64),
}

/// Gathers a `Signal` snapshot from an environment probe
pub struct SignalCollector {
    probe: Box<dyn EnvironmentProbe>,
    benchmark: BenchmarkSource,
}

impl SignalCollector {
    /// Create a collector over a probe, measuring with the default benchmark
    pub fn new<P>(probe: P) -> Self
    where
        P: EnvironmentProbe + 'static,
    {
        Self {
            probe: Box::new(probe),
            benchmark: BenchmarkSource::Measure(MicroBenchmark::default()),
        }
    }

    /// Collector over the host OS
    pub fn system() -> Self {
        Self::new(SystemProbe::new())
    }

    /// Replace the benchmark used for measurement
    pub fn with_benchmark(mut self, benchmark: MicroBenchmark) -> Self {
        self.benchmark = BenchmarkSource::Measure(benchmark);
        self
    }

    /// Skip measuring and report a known score
    pub fn with_fixed_score(mut self, score_ms: f64) -> Self {
        self.benchmark = BenchmarkSource::Fixed(score_ms);
        self
    }

    /// Name of the underlying probe
    pub fn probe_name(&self) -> &'static str {
        self.probe.name()
    }

    /// Take a snapshot of the environment
    pub fn collect(&self) -> Signal {
        let benchmark_score_ms = match self.benchmark {
            BenchmarkSource::Measure(bench) => bench.run().score_ms,
            BenchmarkSource::Fixed(score) => score,
        };

        let signal = Signal::new(
            self.probe.device_memory_gib(),
            self.probe.logical_cores(),
            self.probe.prefers_reduced_motion(),
            self.probe.webgl_version(),
            benchmark_score_ms,
        );

        debug!(
            "Collected signal via {} probe: memory={:?}GiB cores={:?} reduced_motion={} webgl={} score={:.1}",
            self.probe.name(),
            signal.device_memory_gib,
            signal.logical_cores,
            signal.prefers_reduced_motion,
            signal.webgl_version.number(),
            signal.benchmark_score_ms
        );

        signal
    }
}

impl Default for SignalCollector {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Debug for SignalCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalCollector")
            .field("probe", &self.probe.name())
            .field("benchmark", &self.benchmark)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{EnvironmentHints, HintProbe};
    use crate::signal::WebGlVersion;
    use std::time::Duration;

    fn hint_collector() -> SignalCollector {
        SignalCollector::new(HintProbe::new(EnvironmentHints {
            device_memory: Some(1.0),
            hardware_concurrency: Some(2),
            prefers_reduced_motion: false,
            webgl_version: Some(1),
        }))
    }

    #[test]
    fn test_collect_from_hints() {
        let signal = hint_collector().with_fixed_score(250.0).collect();

        assert_eq!(signal.device_memory_gib, Some(1.0));
        assert_eq!(signal.logical_cores, Some(2));
        assert!(!signal.prefers_reduced_motion);
        assert_eq!(signal.webgl_version, WebGlVersion::WebGl1);
        assert_eq!(signal.benchmark_score_ms, 250.0);
    }

    #[test]
    fn test_collect_is_repeatable_with_fixed_score() {
        let collector = hint_collector().with_fixed_score(40.0);
        assert_eq!(collector.collect(), collector.collect());
    }

    #[test]
    fn test_collect_measures_benchmark() {
        let collector =
            hint_collector().with_benchmark(MicroBenchmark::new(Duration::from_millis(1)));
        let signal = collector.collect();

        assert!(signal.benchmark_score_ms > 0.0);
        assert!(signal.benchmark_score_ms.is_finite());
    }

    #[test]
    fn test_system_collector() {
        let collector = SignalCollector::system().with_fixed_score(10.0);
        assert_eq!(collector.probe_name(), "system");

        let signal = collector.collect();
        assert!(signal.logical_cores.unwrap_or(1) >= 1);
    }
}
