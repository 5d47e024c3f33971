//! Adaptive Engine
//!
//! Session-level facade: collects the signal once, caches the derived
//! profiles, and resolves intents against them. The cache is only
//! recomputed on an explicit `refresh`.
//!
//! `resolve` takes `&self` and touches nothing mutable, so a shared
//! engine can serve concurrent requests without locking.

use crate::capability::CapabilityProfile;
use crate::intent::IntentDescriptor;
use crate::policy::PolicyTable;
use crate::profiler::Profiler;
use crate::report;
use crate::resolver::{ResolvedConfiguration, Resolver};
use crate::tier::Tier;
use amp_signals::{Signal, SignalCollector};
use std::sync::Arc;
use tracing::{debug, info};

/// External events that may change the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// The `prefers-reduced-motion` media query flipped
    ReducedMotionChanged,
    /// Orientation or viewport size changed
    ViewportChanged,
    /// The page became visible again
    VisibilityChanged,
    /// Caller asked for a fresh reading
    Manual,
}

/// Cached profiles for one signal
#[derive(Debug, Clone, Copy, PartialEq)]
struct ProfileCache {
    signal: Signal,
    /// Profile for intents that work without WebGL
    general: CapabilityProfile,
    /// Profile for intents that require WebGL
    webgl: CapabilityProfile,
}

impl ProfileCache {
    fn build(profiler: &Profiler<'_>, signal: Signal) -> Self {
        Self {
            signal,
            general: profiler.profile_for(&signal, false),
            webgl: profiler.profile_for(&signal, true),
        }
    }
}

/// Signal collection, cached profiling and resolution for one session
#[derive(Debug)]
pub struct AdaptiveEngine {
    collector: SignalCollector,
    policy: Arc<PolicyTable>,
    cache: ProfileCache,
}

impl AdaptiveEngine {
    /// Collect the signal and build the profile cache
    pub fn new(collector: SignalCollector, policy: Arc<PolicyTable>) -> Self {
        let signal = collector.collect();
        let cache = ProfileCache::build(&Profiler::new(&policy), signal);

        info!(
            "Adaptive engine ready: tier={} (policy v{})",
            cache.general.tier, policy.version
        );

        Self {
            collector,
            policy,
            cache,
        }
    }

    /// Engine over the host OS with the version 1 policy
    pub fn with_defaults() -> Self {
        Self::new(SignalCollector::system(), Arc::new(PolicyTable::v1()))
    }

    pub fn signal(&self) -> &Signal {
        &self.cache.signal
    }

    /// Cached profile for intents that do not require WebGL
    pub fn profile(&self) -> &CapabilityProfile {
        &self.cache.general
    }

    /// Cached profile matching an intent's WebGL requirement
    pub fn profile_for(&self, intent: &IntentDescriptor) -> &CapabilityProfile {
        if intent.requires_webgl() {
            &self.cache.webgl
        } else {
            &self.cache.general
        }
    }

    pub fn tier(&self) -> Tier {
        self.cache.general.tier
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    /// Re-collect the signal after an environment event
    ///
    /// Returns true when the tier changed. Refreshing with an unchanged
    /// signal leaves the cache identical.
    pub fn refresh(&mut self, trigger: RefreshTrigger) -> bool {
        let signal = self.collector.collect();
        let cache = ProfileCache::build(&Profiler::new(&self.policy), signal);

        let previous = self.cache.general.tier;
        let changed = cache.general.tier != previous;
        self.cache = cache;

        if changed {
            info!(
                "Tier changed after {:?}: {} -> {}",
                trigger, previous, self.cache.general.tier
            );
        } else {
            debug!("Refreshed after {:?}, tier unchanged ({})", trigger, previous);
        }

        changed
    }

    /// Swap the policy table and rebuild the cache from the current signal
    pub fn set_policy(&mut self, policy: Arc<PolicyTable>) {
        self.cache = ProfileCache::build(&Profiler::new(&policy), self.cache.signal);
        info!(
            "Policy table v{} installed, tier={}",
            policy.version, self.cache.general.tier
        );
        self.policy = policy;
    }

    /// Resolve an intent against the cached profile
    pub fn resolve(&self, intent: &IntentDescriptor) -> ResolvedConfiguration {
        let config = Resolver::new(&self.policy).resolve(self.profile_for(intent), intent);
        debug!("Resolved intent: {}", report::summary(&config));
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{Complexity, Feature};
    use amp_signals::{EnvironmentHints, EnvironmentProbe, HintProbe, WebGlVersion};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn hint_engine(hints: EnvironmentHints, score: f64) -> AdaptiveEngine {
        let collector = SignalCollector::new(HintProbe::new(hints)).with_fixed_score(score);
        AdaptiveEngine::new(collector, Arc::new(PolicyTable::v1()))
    }

    fn desktop_hints() -> EnvironmentHints {
        EnvironmentHints {
            device_memory: Some(8.0),
            hardware_concurrency: Some(8),
            prefers_reduced_motion: false,
            webgl_version: Some(0),
        }
    }

    /// Probe whose reduced-motion answer can be flipped mid-session
    struct TogglingProbe {
        reduced: Arc<AtomicBool>,
    }

    impl EnvironmentProbe for TogglingProbe {
        fn name(&self) -> &'static str {
            "toggling"
        }

        fn device_memory_gib(&self) -> Option<f64> {
            Some(8.0)
        }

        fn logical_cores(&self) -> Option<u32> {
            Some(8)
        }

        fn prefers_reduced_motion(&self) -> bool {
            self.reduced.load(Ordering::SeqCst)
        }

        fn webgl_version(&self) -> WebGlVersion {
            WebGlVersion::WebGl2
        }
    }

    #[test]
    fn test_engine_profiles_once() {
        let engine = hint_engine(desktop_hints(), 40.0);

        assert_eq!(engine.tier(), Tier::High);
        assert_eq!(engine.signal().logical_cores, Some(8));
    }

    #[test]
    fn test_webgl_requirement_uses_second_profile() {
        let engine = hint_engine(desktop_hints(), 40.0);
        let intent = IntentDescriptor::builder()
            .complexity(Complexity::Advanced)
            .requires_webgl(true)
            .build()
            .unwrap();

        assert_eq!(engine.profile_for(&intent).tier, Tier::Unsupported);
        assert_eq!(engine.resolve(&intent).tier, Tier::Unsupported);

        let plain = IntentDescriptor::builder().build().unwrap();
        assert_eq!(engine.resolve(&plain).tier, Tier::High);
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let mut engine = hint_engine(desktop_hints(), 40.0);
        let before = *engine.profile();

        assert!(!engine.refresh(RefreshTrigger::VisibilityChanged));
        assert_eq!(*engine.profile(), before);
    }

    #[test]
    fn test_refresh_picks_up_reduced_motion() {
        let reduced = Arc::new(AtomicBool::new(false));
        let collector = SignalCollector::new(TogglingProbe {
            reduced: reduced.clone(),
        })
        .with_fixed_score(40.0);
        let mut engine = AdaptiveEngine::new(collector, Arc::new(PolicyTable::v1()));
        assert_eq!(engine.tier(), Tier::High);

        reduced.store(true, Ordering::SeqCst);
        assert!(engine.refresh(RefreshTrigger::ReducedMotionChanged));
        assert_eq!(engine.tier(), Tier::Accessibility);

        let intent = IntentDescriptor::builder()
            .feature(Feature::Shadows)
            .build()
            .unwrap();
        assert!(engine.resolve(&intent).enabled_features.is_empty());
    }

    #[test]
    fn test_set_policy_rebuilds_cache() {
        let mut engine = hint_engine(desktop_hints(), 40.0);

        let mut strict = PolicyTable::v1();
        strict.version = 2;
        strict.thresholds.slow_benchmark_ms = 30.0;
        strict.thresholds.moderate_benchmark_ms = 20.0;
        engine.set_policy(Arc::new(strict));

        assert_eq!(engine.tier(), Tier::Low);
        assert_eq!(engine.policy().version, 2);

        let intent = IntentDescriptor::builder().build().unwrap();
        assert_eq!(engine.resolve(&intent).policy_version, 2);
    }

    #[test]
    fn test_concurrent_resolution() {
        let engine = Arc::new(hint_engine(desktop_hints(), 150.0));
        let intent = IntentDescriptor::builder()
            .element_count(1000)
            .easing("bounce.out")
            .build()
            .unwrap();
        let expected = engine.resolve(&intent);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = engine.clone();
                let intent = intent.clone();
                std::thread::spawn(move || engine.resolve(&intent))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
