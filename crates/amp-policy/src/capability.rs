//! Capability Table
//!
//! The single source of truth mapping each tier to its concrete
//! capability attributes. Kept as data so it can be swapped with the
//! policy table and tested row by row.
//!
//! | Tier | Elements | Triangles | Texture | Renderer | Post | Shadows | Physics | Scroll |
//! |------|---------:|----------:|--------:|----------|------|---------|---------|--------|
//! | Unsupported | 0 | 0 | 0 | - | no | no | no | no |
//! | Accessibility | 0 | 0 | 512 | svg | no | no | no | no |
//! | Low | 100 | 50K | 1024 | svg | no | no | no | yes |
//! | Medium | 300 | 250K | 2048 | canvas | no | yes | yes | yes |
//! | High | 1000 | 1M | 4096 | webgl | yes | yes | yes | yes |

use crate::intent::Feature;
use crate::tier::{Renderer, Tier};
use serde::{Deserialize, Serialize};

/// Capability attributes of one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCapabilities {
    /// Maximum animated elements
    pub max_elements: u32,
    /// Maximum triangles for 3D scenes
    pub max_triangles: u32,
    /// Recommended texture edge length (px)
    pub recommended_texture_size: u32,
    /// Suggested renderer, absent when nothing can render
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_renderer: Option<Renderer>,
    pub allow_post_processing: bool,
    pub allow_shadows: bool,
    pub allow_physics: bool,
    pub allow_scroll_linked: bool,
}

impl TierCapabilities {
    /// Row with every capability off
    pub const fn disabled() -> Self {
        Self {
            max_elements: 0,
            max_triangles: 0,
            recommended_texture_size: 0,
            recommended_renderer: None,
            allow_post_processing: false,
            allow_shadows: false,
            allow_physics: false,
            allow_scroll_linked: false,
        }
    }

    /// Whether every flag and count is off
    pub fn is_disabled(&self) -> bool {
        *self == Self::disabled()
    }

    /// Whether any feature gate is open
    pub fn allows_any_feature(&self) -> bool {
        self.allow_post_processing
            || self.allow_shadows
            || self.allow_physics
            || self.allow_scroll_linked
    }
}

/// Per-tier capability rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierTable {
    pub unsupported: TierCapabilities,
    pub accessibility: TierCapabilities,
    pub low: TierCapabilities,
    pub medium: TierCapabilities,
    pub high: TierCapabilities,
}

impl TierTable {
    /// Version 1 table
    pub fn v1() -> Self {
        Self {
            unsupported: TierCapabilities::disabled(),
            accessibility: TierCapabilities {
                recommended_texture_size: 512,
                recommended_renderer: Some(Renderer::Svg),
                ..TierCapabilities::disabled()
            },
            low: TierCapabilities {
                max_elements: 100,
                max_triangles: 50_000,
                recommended_texture_size: 1024,
                recommended_renderer: Some(Renderer::Svg),
                allow_post_processing: false,
                allow_shadows: false,
                allow_physics: false,
                allow_scroll_linked: true,
            },
            medium: TierCapabilities {
                max_elements: 300,
                max_triangles: 250_000,
                recommended_texture_size: 2048,
                recommended_renderer: Some(Renderer::Canvas),
                allow_post_processing: false,
                allow_shadows: true,
                allow_physics: true,
                allow_scroll_linked: true,
            },
            high: TierCapabilities {
                max_elements: 1000,
                max_triangles: 1_000_000,
                recommended_texture_size: 4096,
                recommended_renderer: Some(Renderer::WebGl),
                allow_post_processing: true,
                allow_shadows: true,
                allow_physics: true,
                allow_scroll_linked: true,
            },
        }
    }

    /// Row for a tier
    pub fn row(&self, tier: Tier) -> &TierCapabilities {
        match tier {
            Tier::Unsupported => &self.unsupported,
            Tier::Accessibility => &self.accessibility,
            Tier::Low => &self.low,
            Tier::Medium => &self.medium,
            Tier::High => &self.high,
        }
    }

    /// Cheapest renderer any row recommends
    pub fn cheapest_renderer(&self) -> Renderer {
        Tier::all()
            .iter()
            .filter_map(|&tier| self.row(tier).recommended_renderer)
            .min()
            .unwrap_or_else(Renderer::cheapest)
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::v1()
    }
}

/// Capabilities of the current device, derived from a `Signal`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityProfile {
    pub tier: Tier,
    pub max_elements: u32,
    pub max_triangles: u32,
    pub recommended_texture_size: u32,
    pub recommended_renderer: Option<Renderer>,
    pub allow_post_processing: bool,
    pub allow_shadows: bool,
    pub allow_physics: bool,
    pub allow_scroll_linked: bool,
}

impl CapabilityProfile {
    /// Build a profile for a tier from a table row
    ///
    /// The Unsupported and Accessibility tiers never take feature gates
    /// or element budgets from the row, whatever the table says.
    pub fn from_row(tier: Tier, row: &TierCapabilities) -> Self {
        match tier {
            Tier::Unsupported => return Self::unsupported(),
            Tier::Accessibility => return Self::reduced_motion(row),
            _ => {}
        }

        Self {
            tier,
            max_elements: row.max_elements,
            max_triangles: row.max_triangles,
            recommended_texture_size: row.recommended_texture_size,
            recommended_renderer: row.recommended_renderer,
            allow_post_processing: row.allow_post_processing,
            allow_shadows: row.allow_shadows,
            allow_physics: row.allow_physics,
            allow_scroll_linked: row.allow_scroll_linked,
        }
    }

    /// The profile of a user who asked for reduced motion
    ///
    /// Only the texture size and renderer come from the row; the profiler
    /// replaces the renderer with the table's cheapest one.
    pub fn reduced_motion(row: &TierCapabilities) -> Self {
        Self {
            tier: Tier::Accessibility,
            max_elements: 0,
            max_triangles: 0,
            recommended_texture_size: row.recommended_texture_size,
            recommended_renderer: row.recommended_renderer,
            allow_post_processing: false,
            allow_shadows: false,
            allow_physics: false,
            allow_scroll_linked: false,
        }
    }

    /// The profile of a device that cannot run the animation
    pub fn unsupported() -> Self {
        let row = TierCapabilities::disabled();
        Self {
            tier: Tier::Unsupported,
            max_elements: row.max_elements,
            max_triangles: row.max_triangles,
            recommended_texture_size: row.recommended_texture_size,
            recommended_renderer: row.recommended_renderer,
            allow_post_processing: row.allow_post_processing,
            allow_shadows: row.allow_shadows,
            allow_physics: row.allow_physics,
            allow_scroll_linked: row.allow_scroll_linked,
        }
    }

    /// Capability flag gating a feature, `None` for features with no gate
    pub fn allows(&self, feature: Feature) -> Option<bool> {
        match feature {
            Feature::Shadows => Some(self.allow_shadows),
            Feature::PostProcessing => Some(self.allow_post_processing),
            Feature::Physics => Some(self.allow_physics),
            Feature::ScrollLinked => Some(self.allow_scroll_linked),
            Feature::SkipToEnd => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v1_rows() {
        let table = TierTable::v1();

        let expected = [
            (Tier::Unsupported, 0, 0, 0, None, [false, false, false, false]),
            (Tier::Accessibility, 0, 0, 512, Some(Renderer::Svg), [false, false, false, false]),
            (Tier::Low, 100, 50_000, 1024, Some(Renderer::Svg), [false, false, false, true]),
            (Tier::Medium, 300, 250_000, 2048, Some(Renderer::Canvas), [false, true, true, true]),
            (Tier::High, 1000, 1_000_000, 4096, Some(Renderer::WebGl), [true, true, true, true]),
        ];

        for (tier, elements, triangles, texture, renderer, flags) in expected {
            let row = table.row(tier);
            assert_eq!(row.max_elements, elements, "{tier}");
            assert_eq!(row.max_triangles, triangles, "{tier}");
            assert_eq!(row.recommended_texture_size, texture, "{tier}");
            assert_eq!(row.recommended_renderer, renderer, "{tier}");
            assert_eq!(
                [
                    row.allow_post_processing,
                    row.allow_shadows,
                    row.allow_physics,
                    row.allow_scroll_linked
                ],
                flags,
                "{tier}"
            );
        }
    }

    #[test]
    fn test_capacity_grows_with_tier() {
        let table = TierTable::v1();
        let animated = [Tier::Low, Tier::Medium, Tier::High];

        for pair in animated.windows(2) {
            let (lower, higher) = (table.row(pair[0]), table.row(pair[1]));
            assert!(lower.max_elements < higher.max_elements);
            assert!(lower.max_triangles < higher.max_triangles);
            assert!(lower.recommended_renderer <= higher.recommended_renderer);
        }
    }

    #[test]
    fn test_unsupported_profile_invariant() {
        let profile = CapabilityProfile::from_row(Tier::Unsupported, TierTable::v1().row(Tier::High));

        assert_eq!(profile, CapabilityProfile::unsupported());
        assert_eq!(profile.max_elements, 0);
        assert_eq!(profile.recommended_renderer, None);
        for feature in Feature::all() {
            assert_ne!(profile.allows(*feature), Some(true));
        }
    }

    #[test]
    fn test_accessibility_profile_ignores_open_gates() {
        let row = TierCapabilities {
            max_elements: 50,
            max_triangles: 10_000,
            recommended_texture_size: 512,
            recommended_renderer: Some(Renderer::WebGl),
            allow_post_processing: true,
            allow_shadows: true,
            allow_physics: true,
            allow_scroll_linked: true,
        };
        assert!(row.allows_any_feature());

        let profile = CapabilityProfile::from_row(Tier::Accessibility, &row);
        assert_eq!(profile.tier, Tier::Accessibility);
        assert_eq!(profile.max_elements, 0);
        assert_eq!(profile.max_triangles, 0);
        assert_eq!(profile.recommended_texture_size, 512);
        for feature in Feature::all() {
            assert_ne!(profile.allows(*feature), Some(true), "{feature}");
        }
    }

    #[test]
    fn test_cheapest_renderer() {
        let mut table = TierTable::v1();
        assert_eq!(table.cheapest_renderer(), Renderer::Svg);

        table.accessibility.recommended_renderer = Some(Renderer::Canvas);
        table.low.recommended_renderer = Some(Renderer::Canvas);
        assert_eq!(table.cheapest_renderer(), Renderer::Canvas);
    }

    #[test]
    fn test_feature_gates() {
        let profile = CapabilityProfile::from_row(Tier::Medium, TierTable::v1().row(Tier::Medium));

        assert_eq!(profile.allows(Feature::Shadows), Some(true));
        assert_eq!(profile.allows(Feature::PostProcessing), Some(false));
        assert_eq!(profile.allows(Feature::SkipToEnd), None);
    }
}
