//! Device tiers and renderer choices.

use serde::{Deserialize, Serialize};

/// Discrete device-capability class
///
/// Ordered from least to most capable, so `tier < Tier::High` reads as
/// "below high".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// The animation cannot run here at all
    Unsupported,
    /// User asked for reduced motion; everything is degraded
    Accessibility,
    /// Low-end device
    Low,
    /// Mid-range device
    Medium,
    /// High-end device
    High,
}

impl Tier {
    /// All tiers, least capable first
    pub fn all() -> &'static [Tier] {
        &[
            Tier::Unsupported,
            Tier::Accessibility,
            Tier::Low,
            Tier::Medium,
            Tier::High,
        ]
    }

    /// Lowercase tier name
    pub fn name(&self) -> &'static str {
        match self {
            Tier::Unsupported => "unsupported",
            Tier::Accessibility => "accessibility",
            Tier::Low => "low",
            Tier::Medium => "medium",
            Tier::High => "high",
        }
    }

    /// Does this tier play animations at all (as opposed to jumping to the end)?
    pub fn is_animated(&self) -> bool {
        !matches!(self, Tier::Unsupported | Tier::Accessibility)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Rendering path handed to the external animation runtime
///
/// Declared cheapest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Renderer {
    /// SVG / CSS transforms
    Svg,
    /// 2D canvas
    Canvas,
    /// WebGL context
    WebGl,
}

impl Renderer {
    /// Cheapest renderer there is
    pub fn cheapest() -> Self {
        Renderer::Svg
    }

    /// Lowercase renderer name
    pub fn name(&self) -> &'static str {
        match self {
            Renderer::Svg => "svg",
            Renderer::Canvas => "canvas",
            Renderer::WebGl => "webgl",
        }
    }

    /// Whether this renderer needs a WebGL context
    pub fn requires_webgl(&self) -> bool {
        matches!(self, Renderer::WebGl)
    }
}

impl std::fmt::Display for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
