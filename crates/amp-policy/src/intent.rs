//! Animation Intent
//!
//! What the caller would like to animate, independent of what the
//! device can sustain. Validated once at construction so the resolver
//! can assume well-formed input.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Declared complexity of the animation
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// A few properties, a few elements
    #[default]
    Simple,
    /// Timelines, staggers, scroll-driven sequences
    Intermediate,
    /// 3D scenes, particle systems, physics
    Advanced,
}

/// Optional features an animation may request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    Shadows,
    PostProcessing,
    Physics,
    ScrollLinked,
    /// Jump straight to the end state when the device should not animate
    SkipToEnd,
}

impl Feature {
    /// All features
    pub fn all() -> &'static [Feature] {
        &[
            Feature::Shadows,
            Feature::PostProcessing,
            Feature::Physics,
            Feature::ScrollLinked,
            Feature::SkipToEnd,
        ]
    }

    /// Kebab-case feature name
    pub fn name(&self) -> &'static str {
        match self {
            Feature::Shadows => "shadows",
            Feature::PostProcessing => "post-processing",
            Feature::Physics => "physics",
            Feature::ScrollLinked => "scroll-linked",
            Feature::SkipToEnd => "skip-to-end",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Ordered feature set
pub type FeatureSet = BTreeSet<Feature>;

/// A validated animation request
///
/// Fields are private; the only ways in are `IntentBuilder::build` and
/// deserialization, both of which validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "IntentBuilder")]
pub struct IntentDescriptor {
    complexity: Complexity,
    element_count: u32,
    requested_duration_ms: f64,
    requested_easing: String,
    features: FeatureSet,
    properties: Vec<String>,
    requires_webgl: bool,
}

impl IntentDescriptor {
    /// Start building an intent
    pub fn builder() -> IntentBuilder {
        IntentBuilder::default()
    }

    pub fn complexity(&self) -> Complexity {
        self.complexity
    }

    pub fn element_count(&self) -> u32 {
        self.element_count
    }

    pub fn requested_duration_ms(&self) -> f64 {
        self.requested_duration_ms
    }

    pub fn requested_easing(&self) -> &str {
        &self.requested_easing
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Animated property names, in request order
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    /// Whether the animation cannot run without WebGL
    pub fn requires_webgl(&self) -> bool {
        self.requires_webgl
    }

    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }
}

/// Unvalidated intent fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntentBuilder {
    pub complexity: Complexity,
    pub element_count: i64,
    pub requested_duration_ms: f64,
    pub requested_easing: String,
    pub features: FeatureSet,
    pub properties: Vec<String>,
    pub requires_webgl: bool,
}

impl Default for IntentBuilder {
    fn default() -> Self {
        Self {
            complexity: Complexity::Simple,
            element_count: 1,
            requested_duration_ms: 300.0,
            requested_easing: "ease-out".to_string(),
            features: FeatureSet::new(),
            properties: Vec::new(),
            requires_webgl: false,
        }
    }
}

impl IntentBuilder {
    pub fn complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = complexity;
        self
    }

    /// Signed so that negative counts reach validation instead of wrapping
    pub fn element_count(mut self, count: i64) -> Self {
        self.element_count = count;
        self
    }

    pub fn duration_ms(mut self, duration_ms: f64) -> Self {
        self.requested_duration_ms = duration_ms;
        self
    }

    pub fn easing(mut self, easing: impl Into<String>) -> Self {
        self.requested_easing = easing.into();
        self
    }

    pub fn feature(mut self, feature: Feature) -> Self {
        self.features.insert(feature);
        self
    }

    pub fn features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        self.features.extend(features);
        self
    }

    pub fn property(mut self, property: impl Into<String>) -> Self {
        self.properties.push(property.into());
        self
    }

    pub fn requires_webgl(mut self, requires_webgl: bool) -> Self {
        self.requires_webgl = requires_webgl;
        self
    }

    /// Validate and freeze the intent
    pub fn build(self) -> Result<IntentDescriptor, InvalidIntent> {
        if self.element_count < 0 {
            return Err(InvalidIntent::NegativeElementCount(self.element_count));
        }
        let element_count = u32::try_from(self.element_count)
            .map_err(|_| InvalidIntent::ElementCountOverflow(self.element_count))?;

        if !self.requested_duration_ms.is_finite() || self.requested_duration_ms <= 0.0 {
            return Err(InvalidIntent::InvalidDuration(self.requested_duration_ms));
        }
        if self.requested_easing.trim().is_empty() {
            return Err(InvalidIntent::EmptyEasing);
        }
        if self.properties.iter().any(|p| p.trim().is_empty()) {
            return Err(InvalidIntent::EmptyProperty);
        }

        Ok(IntentDescriptor {
            complexity: self.complexity,
            element_count,
            requested_duration_ms: self.requested_duration_ms,
            requested_easing: self.requested_easing.trim().to_string(),
            features: self.features,
            properties: self.properties,
            requires_webgl: self.requires_webgl,
        })
    }
}

impl TryFrom<IntentBuilder> for IntentDescriptor {
    type Error = InvalidIntent;

    fn try_from(builder: IntentBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

/// Rejected intent
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidIntent {
    #[error("Element count cannot be negative (got {0})")]
    NegativeElementCount(i64),

    #[error("Element count {0} is out of range")]
    ElementCountOverflow(i64),

    #[error("Requested duration must be positive and finite (got {0})")]
    InvalidDuration(f64),

    #[error("Requested easing is empty")]
    EmptyEasing,

    #[error("Animated property name is empty")]
    EmptyProperty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let intent = IntentDescriptor::builder().build().unwrap();

        assert_eq!(intent.complexity(), Complexity::Simple);
        assert_eq!(intent.element_count(), 1);
        assert_eq!(intent.requested_duration_ms(), 300.0);
        assert_eq!(intent.requested_easing(), "ease-out");
        assert!(intent.features().is_empty());
        assert!(!intent.requires_webgl());
    }

    #[test]
    fn test_negative_element_count_rejected() {
        let result = IntentDescriptor::builder().element_count(-1).build();
        assert_eq!(result, Err(InvalidIntent::NegativeElementCount(-1)));
    }

    #[test]
    fn test_element_count_overflow_rejected() {
        let result = IntentDescriptor::builder()
            .element_count(u32::MAX as i64 + 1)
            .build();
        assert!(matches!(result, Err(InvalidIntent::ElementCountOverflow(_))));
    }

    #[test]
    fn test_invalid_durations_rejected() {
        for duration in [0.0, -16.0, f64::NAN, f64::INFINITY] {
            let result = IntentDescriptor::builder().duration_ms(duration).build();
            assert!(
                matches!(result, Err(InvalidIntent::InvalidDuration(_))),
                "duration {duration} should be rejected"
            );
        }
    }

    #[test]
    fn test_empty_strings_rejected() {
        assert_eq!(
            IntentDescriptor::builder().easing("  ").build(),
            Err(InvalidIntent::EmptyEasing)
        );
        assert_eq!(
            IntentDescriptor::builder().property("opacity").property("").build(),
            Err(InvalidIntent::EmptyProperty)
        );
    }

    #[test]
    fn test_zero_elements_allowed() {
        let intent = IntentDescriptor::builder().element_count(0).build().unwrap();
        assert_eq!(intent.element_count(), 0);
    }

    #[test]
    fn test_features_deduplicate() {
        let intent = IntentDescriptor::builder()
            .feature(Feature::Shadows)
            .features([Feature::Shadows, Feature::Physics])
            .build()
            .unwrap();

        assert_eq!(intent.features().len(), 2);
        assert!(intent.has_feature(Feature::Physics));
        assert!(!intent.has_feature(Feature::PostProcessing));
    }

    #[test]
    fn test_deserialize_validates() {
        let intent: IntentDescriptor = serde_json::from_str(
            r#"{"complexity": "advanced", "elementCount": 500, "requestedDurationMs": 1200,
                "requestedEasing": "elastic.out", "features": ["shadows", "post-processing"]}"#,
        )
        .unwrap();

        assert_eq!(intent.complexity(), Complexity::Advanced);
        assert_eq!(intent.element_count(), 500);
        assert!(intent.has_feature(Feature::PostProcessing));

        let rejected = serde_json::from_str::<IntentDescriptor>(r#"{"elementCount": -1}"#);
        assert!(rejected.is_err());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let intent = IntentDescriptor::builder()
            .complexity(Complexity::Intermediate)
            .element_count(12)
            .feature(Feature::ScrollLinked)
            .property("transform")
            .build()
            .unwrap();

        let json = serde_json::to_string(&intent).unwrap();
        let parsed: IntentDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, intent);
    }
}
