//! AMP Policy - Adaptive Animation Policy Engine
//!
//! Turns device signals and a declared animation intent into a concrete,
//! device-safe animation configuration, recording every change made to
//! the intent along the way.
//!
//! # Flow
//!
//! ```text
//! Signal ──► Profiler ──► CapabilityProfile ─┐
//!                                            ├──► Resolver ──► ResolvedConfiguration ──► report
//!                        IntentDescriptor ───┘
//! ```
//!
//! Thresholds, per-tier capabilities and duration/easing rules live in a
//! versioned [`PolicyTable`] that can be swapped at runtime or loaded
//! from TOML/JSON. Everything past signal collection is a pure function
//! of its inputs.
//!
//! # Example
//!
//! ```
//! use amp_policy::{profile, resolve, Feature, IntentDescriptor, Signal, Tier, WebGlVersion};
//!
//! let signal = Signal::new(Some(1.0), Some(2), false, WebGlVersion::WebGl1, 250.0);
//! let intent = IntentDescriptor::builder()
//!     .element_count(500)
//!     .duration_ms(1200.0)
//!     .easing("elastic.out")
//!     .feature(Feature::Shadows)
//!     .build()
//!     .unwrap();
//!
//! let profile = profile(&signal);
//! assert_eq!(profile.tier, Tier::Low);
//!
//! let config = resolve(&profile, &intent);
//! assert_eq!(config.element_count_cap, 100);
//! for line in amp_policy::report::format(&config) {
//!     println!("{}", line);
//! }
//! ```

mod capability;
mod engine;
mod intent;
mod policy;
mod profiler;
mod resolver;
mod tier;

pub mod report;

pub use capability::{CapabilityProfile, TierCapabilities, TierTable};
pub use engine::{AdaptiveEngine, RefreshTrigger};
pub use intent::{Complexity, Feature, FeatureSet, IntentBuilder, IntentDescriptor, InvalidIntent};
pub use policy::{
    ConfigFormat, DurationPolicy, EasingPolicy, PolicyError, PolicyTable, TierThresholds,
    POLICY_VERSION,
};
pub use profiler::{profile, Profiler};
pub use resolver::{
    reason, resolve, Adjustment, AdjustmentValue, ResolvedConfiguration, Resolver, Rule,
    PIPELINE_VERSION,
};
pub use tier::{Renderer, Tier};

pub use amp_signals::{
    EnvironmentHints, EnvironmentProbe, HintProbe, MicroBenchmark, Signal, SignalCollector,
    SystemProbe, WebGlVersion,
};
