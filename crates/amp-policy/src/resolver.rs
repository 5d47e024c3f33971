//! Policy Resolver
//!
//! Combines a capability profile with an intent into a concrete,
//! device-safe configuration. The resolver is an ordered pipeline of
//! rules over a working copy of the intent; each rule sees the effects
//! of the rules before it and records every change it makes as an
//! `Adjustment`.
//!
//! # Pipeline (version 1)
//!
//! | # | Rule | Changes | Reason(s) |
//! |---|------|---------|-----------|
//! | 1 | element-cap | `element_count_cap` | `element-count-exceeds-capability` |
//! | 2 | feature-gating | `features.*` | `feature-unsupported-at-tier` |
//! | 3 | duration-scaling | `duration_ms`, `features.skip-to-end` | see `reason` |
//! | 4 | easing-simplification | `easing` | `complex-easing-at-tier` |
//! | 5 | renderer-downgrade | `renderer` | `complexity-exceeds-tier`, `renderer-unavailable-at-tier` |
//!
//! Reordering the pipeline changes results and must bump
//! `PIPELINE_VERSION`.

use crate::capability::CapabilityProfile;
use crate::intent::{Complexity, Feature, FeatureSet, IntentDescriptor};
use crate::policy::PolicyTable;
use crate::tier::{Renderer, Tier};
use serde::Serialize;
use tracing::debug;

/// Version of the rule pipeline
pub const PIPELINE_VERSION: u32 = 1;

/// Adjustment reasons
pub mod reason {
    pub const ELEMENT_COUNT_EXCEEDS_CAPABILITY: &str = "element-count-exceeds-capability";
    pub const FEATURE_UNSUPPORTED_AT_TIER: &str = "feature-unsupported-at-tier";
    pub const DURATION_DAMPED_AT_TIER: &str = "duration-damped-at-tier";
    pub const DURATION_EXCEEDS_TIER_CEILING: &str = "duration-exceeds-tier-ceiling";
    pub const REDUCED_MOTION_REQUESTED: &str = "reduced-motion-requested";
    pub const ANIMATION_UNSUPPORTED: &str = "animation-unsupported";
    pub const ANIMATION_PERMITTED_AT_TIER: &str = "animation-permitted-at-tier";
    pub const COMPLEX_EASING_AT_TIER: &str = "complex-easing-at-tier";
    pub const COMPLEXITY_EXCEEDS_TIER: &str = "complexity-exceeds-tier";
    pub const RENDERER_UNAVAILABLE_AT_TIER: &str = "renderer-unavailable-at-tier";
}

/// A value before or after an adjustment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AdjustmentValue {
    Count(u32),
    DurationMs(f64),
    Text(String),
    Flag(bool),
    Renderer(Renderer),
    None,
}

impl std::fmt::Display for AdjustmentValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{}", n),
            Self::DurationMs(ms) => write!(f, "{}ms", ms),
            Self::Text(s) => write!(f, "{}", s),
            Self::Flag(true) => write!(f, "enabled"),
            Self::Flag(false) => write!(f, "disabled"),
            Self::Renderer(r) => write!(f, "{}", r),
            Self::None => write!(f, "none"),
        }
    }
}

/// One recorded deviation from the intent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Adjustment {
    /// Rule that fired
    pub rule: String,
    /// Configuration field it changed
    pub field: String,
    pub from: AdjustmentValue,
    pub to: AdjustmentValue,
    pub reason: String,
}

/// Final, device-safe animation parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfiguration {
    pub duration_ms: f64,
    pub easing: String,
    pub renderer: Renderer,
    pub enabled_features: FeatureSet,
    pub element_count_cap: u32,
    /// Animated property names, verbatim from the intent
    pub properties: Vec<String>,
    /// Tier the configuration was resolved against
    pub tier: Tier,
    /// Version of the policy table that produced it
    pub policy_version: u32,
    /// Every change made, in pipeline order
    pub adjustments: Vec<Adjustment>,
}

impl ResolvedConfiguration {
    /// Whether the consumer should jump to the end state instead of animating
    pub fn skip_to_end(&self) -> bool {
        self.enabled_features.contains(&Feature::SkipToEnd)
    }

    /// Whether the intent came through untouched
    pub fn is_verbatim(&self) -> bool {
        self.adjustments.is_empty()
    }

    /// Serialize for hand-off to a JS runtime
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// One step of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    ElementCap,
    FeatureGating,
    DurationScaling,
    EasingSimplification,
    RendererDowngrade,
}

impl Rule {
    /// The fixed rule order
    pub const PIPELINE: [Rule; 5] = [
        Rule::ElementCap,
        Rule::FeatureGating,
        Rule::DurationScaling,
        Rule::EasingSimplification,
        Rule::RendererDowngrade,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Rule::ElementCap => "element-cap",
            Rule::FeatureGating => "feature-gating",
            Rule::DurationScaling => "duration-scaling",
            Rule::EasingSimplification => "easing-simplification",
            Rule::RendererDowngrade => "renderer-downgrade",
        }
    }

    fn apply(&self, ctx: &RuleContext<'_>, working: &mut Working, log: &mut AdjustmentLog) {
        match self {
            Rule::ElementCap => apply_element_cap(ctx, working, log),
            Rule::FeatureGating => apply_feature_gating(ctx, working, log),
            Rule::DurationScaling => apply_duration_scaling(ctx, working, log),
            Rule::EasingSimplification => apply_easing_simplification(ctx, working, log),
            Rule::RendererDowngrade => apply_renderer_downgrade(ctx, working, log),
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Read-only inputs shared by every rule
struct RuleContext<'a> {
    profile: &'a CapabilityProfile,
    intent: &'a IntentDescriptor,
    policy: &'a PolicyTable,
}

/// Configuration being built up by the pipeline
struct Working {
    duration_ms: f64,
    easing: String,
    renderer: Option<Renderer>,
    features: FeatureSet,
    element_count_cap: u32,
}

#[derive(Default)]
struct AdjustmentLog {
    entries: Vec<Adjustment>,
}

impl AdjustmentLog {
    fn record(
        &mut self,
        rule: Rule,
        field: impl Into<String>,
        from: AdjustmentValue,
        to: AdjustmentValue,
        reason: &str,
    ) {
        let adjustment = Adjustment {
            rule: rule.name().to_string(),
            field: field.into(),
            from,
            to,
            reason: reason.to_string(),
        };

        debug!(
            "Policy adjustment [{}] {}: {} -> {} ({})",
            adjustment.rule, adjustment.field, adjustment.from, adjustment.to, adjustment.reason
        );

        self.entries.push(adjustment);
    }
}

fn feature_field(feature: Feature) -> String {
    format!("features.{}", feature.name())
}

fn apply_element_cap(ctx: &RuleContext<'_>, working: &mut Working, log: &mut AdjustmentLog) {
    let requested = ctx.intent.element_count();
    if requested == 0 || requested <= ctx.profile.max_elements {
        return;
    }

    working.element_count_cap = ctx.profile.max_elements;
    log.record(
        Rule::ElementCap,
        "element_count_cap",
        AdjustmentValue::Count(requested),
        AdjustmentValue::Count(ctx.profile.max_elements),
        reason::ELEMENT_COUNT_EXCEEDS_CAPABILITY,
    );
}

fn apply_feature_gating(ctx: &RuleContext<'_>, working: &mut Working, log: &mut AdjustmentLog) {
    for &feature in ctx.intent.features() {
        if ctx.profile.allows(feature) == Some(false) && working.features.remove(&feature) {
            log.record(
                Rule::FeatureGating,
                feature_field(feature),
                AdjustmentValue::Flag(true),
                AdjustmentValue::Flag(false),
                reason::FEATURE_UNSUPPORTED_AT_TIER,
            );
        }
    }
}

fn apply_duration_scaling(ctx: &RuleContext<'_>, working: &mut Working, log: &mut AdjustmentLog) {
    let policy = &ctx.policy.duration;

    match ctx.profile.tier {
        Tier::Low => {
            let before = working.duration_ms;
            let damped = before * policy.low_damping;
            working.duration_ms = damped;
            log.record(
                Rule::DurationScaling,
                "duration_ms",
                AdjustmentValue::DurationMs(before),
                AdjustmentValue::DurationMs(damped),
                reason::DURATION_DAMPED_AT_TIER,
            );

            if damped > policy.low_ceiling_ms {
                working.duration_ms = policy.low_ceiling_ms;
                log.record(
                    Rule::DurationScaling,
                    "duration_ms",
                    AdjustmentValue::DurationMs(damped),
                    AdjustmentValue::DurationMs(policy.low_ceiling_ms),
                    reason::DURATION_EXCEEDS_TIER_CEILING,
                );
            }
        }
        Tier::Accessibility | Tier::Unsupported => {
            let why = if ctx.profile.tier == Tier::Accessibility {
                reason::REDUCED_MOTION_REQUESTED
            } else {
                reason::ANIMATION_UNSUPPORTED
            };

            if working.duration_ms != policy.still_duration_ms {
                let before = working.duration_ms;
                working.duration_ms = policy.still_duration_ms;
                log.record(
                    Rule::DurationScaling,
                    "duration_ms",
                    AdjustmentValue::DurationMs(before),
                    AdjustmentValue::DurationMs(policy.still_duration_ms),
                    why,
                );
            }
        }
        Tier::Medium | Tier::High => {}
    }

    // Skip-to-end only means something where nothing animates
    if ctx.profile.tier.is_animated() && working.features.remove(&Feature::SkipToEnd) {
        log.record(
            Rule::DurationScaling,
            feature_field(Feature::SkipToEnd),
            AdjustmentValue::Flag(true),
            AdjustmentValue::Flag(false),
            reason::ANIMATION_PERMITTED_AT_TIER,
        );
    }
}

fn apply_easing_simplification(
    ctx: &RuleContext<'_>,
    working: &mut Working,
    log: &mut AdjustmentLog,
) {
    let easing = &ctx.policy.easing;
    if ctx.profile.tier >= Tier::High || !easing.is_complex(&working.easing) {
        return;
    }

    let before = std::mem::replace(&mut working.easing, easing.fallback.clone());
    log.record(
        Rule::EasingSimplification,
        "easing",
        AdjustmentValue::Text(before),
        AdjustmentValue::Text(easing.fallback.clone()),
        reason::COMPLEX_EASING_AT_TIER,
    );
}

fn apply_renderer_downgrade(
    ctx: &RuleContext<'_>,
    working: &mut Working,
    log: &mut AdjustmentLog,
) {
    let cheapest = ctx.policy.tiers.cheapest_renderer();

    match working.renderer {
        None => {
            working.renderer = Some(cheapest);
            log.record(
                Rule::RendererDowngrade,
                "renderer",
                AdjustmentValue::None,
                AdjustmentValue::Renderer(cheapest),
                reason::RENDERER_UNAVAILABLE_AT_TIER,
            );
        }
        Some(current)
            if ctx.intent.complexity() == Complexity::Advanced
                && ctx.profile.tier == Tier::Low
                && current != cheapest =>
        {
            working.renderer = Some(cheapest);
            log.record(
                Rule::RendererDowngrade,
                "renderer",
                AdjustmentValue::Renderer(current),
                AdjustmentValue::Renderer(cheapest),
                reason::COMPLEXITY_EXCEEDS_TIER,
            );
        }
        Some(_) => {}
    }
}

/// Resolves intents under one policy table
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    policy: &'a PolicyTable,
}

impl<'a> Resolver<'a> {
    pub fn new(policy: &'a PolicyTable) -> Self {
        Self { policy }
    }

    /// Run the pipeline. Total: every valid pair produces exactly one result.
    pub fn resolve(
        &self,
        profile: &CapabilityProfile,
        intent: &IntentDescriptor,
    ) -> ResolvedConfiguration {
        let ctx = RuleContext {
            profile,
            intent,
            policy: self.policy,
        };

        let mut working = Working {
            duration_ms: intent.requested_duration_ms(),
            easing: intent.requested_easing().to_string(),
            renderer: profile.recommended_renderer,
            features: intent.features().clone(),
            element_count_cap: intent.element_count(),
        };
        let mut log = AdjustmentLog::default();

        for rule in Rule::PIPELINE {
            rule.apply(&ctx, &mut working, &mut log);
        }

        ResolvedConfiguration {
            duration_ms: working.duration_ms,
            easing: working.easing,
            renderer: working.renderer.unwrap_or_else(|| self.policy.tiers.cheapest_renderer()),
            enabled_features: working.features,
            element_count_cap: working.element_count_cap,
            properties: intent.properties().to_vec(),
            tier: profile.tier,
            policy_version: self.policy.version,
            adjustments: log.entries,
        }
    }
}

/// Resolve under the version 1 policy
pub fn resolve(profile: &CapabilityProfile, intent: &IntentDescriptor) -> ResolvedConfiguration {
    Resolver::new(PolicyTable::default_ref()).resolve(profile, intent)
}
