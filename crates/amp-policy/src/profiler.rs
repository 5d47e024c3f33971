//! Capability Profiler
//!
//! Reduces a `Signal` to a `Tier` and looks the tier up in the
//! capability table. Pure and total: a missing signal degrades to the
//! conservative default, never to an error.
//!
//! Tiering is evaluated top to bottom and the first match wins:
//!
//! 1. reduced motion requested → `Accessibility`
//! 2. WebGL required but unavailable → `Unsupported`
//! 3. low memory, few cores or a slow benchmark → `Low`
//! 4. medium memory and cores, or a moderate benchmark → `Medium`
//! 5. otherwise → `High`

use crate::capability::CapabilityProfile;
use crate::policy::PolicyTable;
use crate::tier::Tier;
use amp_signals::{Signal, WebGlVersion};

/// Derives capability profiles from signals under one policy table
#[derive(Debug, Clone, Copy)]
pub struct Profiler<'a> {
    policy: &'a PolicyTable,
}

impl<'a> Profiler<'a> {
    pub fn new(policy: &'a PolicyTable) -> Self {
        Self { policy }
    }

    /// Pick the tier for a signal
    pub fn classify(&self, signal: &Signal, requires_webgl: bool) -> Tier {
        let t = &self.policy.thresholds;

        if signal.prefers_reduced_motion {
            return Tier::Accessibility;
        }
        if requires_webgl && signal.webgl_version == WebGlVersion::None {
            return Tier::Unsupported;
        }

        // Unusable readings count as missing; an unmeasurable score counts as slow
        let memory = signal
            .device_memory_gib
            .filter(|gib| gib.is_finite() && *gib > 0.0)
            .unwrap_or(t.default_memory_gib);
        let cores = signal.logical_cores.unwrap_or(t.default_cores);
        let score = signal.benchmark_score_ms;
        let slow = !score.is_finite() || score > t.slow_benchmark_ms;

        if memory <= t.low_memory_gib || cores <= t.low_cores || slow {
            Tier::Low
        } else if (memory <= t.medium_memory_gib && cores <= t.medium_cores)
            || score > t.moderate_benchmark_ms
        {
            Tier::Medium
        } else {
            Tier::High
        }
    }

    /// Profile for an intent that does not need WebGL
    pub fn profile(&self, signal: &Signal) -> CapabilityProfile {
        self.profile_for(signal, false)
    }

    /// Profile for an intent with the given WebGL requirement
    pub fn profile_for(&self, signal: &Signal, requires_webgl: bool) -> CapabilityProfile {
        let tier = self.classify(signal, requires_webgl);
        let mut profile = CapabilityProfile::from_row(tier, self.policy.tiers.row(tier));

        if tier == Tier::Accessibility {
            profile.recommended_renderer = Some(self.policy.tiers.cheapest_renderer());
        }
        profile
    }
}

/// Profile a signal under the version 1 policy
pub fn profile(signal: &Signal) -> CapabilityProfile {
    Profiler::new(PolicyTable::default_ref()).profile(signal)
}
