//! Policy Table
//!
//! The versioned, swappable set of numbers the engine runs on: tiering
//! thresholds, the capability table, duration scaling and easing
//! simplification. Tuning any of them never touches control flow.
//!
//! Tables load from TOML or JSON. Missing sections fall back to the
//! version 1 defaults.
//!
//! ```toml
//! version = 2
//!
//! [thresholds]
//! slow_benchmark_ms = 250.0
//!
//! [duration]
//! low_damping = 0.5
//! ```

use crate::capability::{TierCapabilities, TierTable};
use crate::tier::Tier;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::info;

/// Version of the default policy table
pub const POLICY_VERSION: u32 = 1;

/// Thresholds used to pick a tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    /// Benchmark score above which a device is `Low`
    pub slow_benchmark_ms: f64,
    /// Benchmark score above which a device is at most `Medium`
    pub moderate_benchmark_ms: f64,
    /// Memory at or below this is `Low` (GiB)
    pub low_memory_gib: f64,
    /// Cores at or below this are `Low`
    pub low_cores: u32,
    /// Memory at or below this (together with `medium_cores`) is `Medium` (GiB)
    pub medium_memory_gib: f64,
    pub medium_cores: u32,
    /// Assumed when the environment does not expose memory (GiB)
    pub default_memory_gib: f64,
    /// Assumed when the environment does not expose core count
    pub default_cores: u32,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            slow_benchmark_ms: 200.0,
            moderate_benchmark_ms: 100.0,
            low_memory_gib: 2.0,
            low_cores: 2,
            medium_memory_gib: 4.0,
            medium_cores: 4,
            default_memory_gib: 4.0,
            default_cores: 4,
        }
    }
}

/// Duration scaling per tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationPolicy {
    /// Multiplier applied at `Low` (must be in (0, 1))
    pub low_damping: f64,
    /// Ceiling applied at `Low` after damping (ms)
    pub low_ceiling_ms: f64,
    /// Flat duration for tiers that do not animate (ms)
    pub still_duration_ms: f64,
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self {
            low_damping: 0.6,
            low_ceiling_ms: 800.0,
            still_duration_ms: 1.0,
        }
    }
}

/// Easing simplification below `High`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EasingPolicy {
    /// Family names treated as expensive (matched case-insensitively)
    pub complex_families: Vec<String>,
    /// Easings considered cheap everywhere
    pub whitelist: Vec<String>,
    /// Replacement for complex easings; must be on the whitelist
    pub fallback: String,
}

impl Default for EasingPolicy {
    fn default() -> Self {
        Self {
            complex_families: vec![
                "spring".to_string(),
                "elastic".to_string(),
                "bounce".to_string(),
            ],
            whitelist: vec![
                "linear".to_string(),
                "ease".to_string(),
                "ease-in".to_string(),
                "ease-out".to_string(),
                "ease-in-out".to_string(),
                "power1.out".to_string(),
                "power2.out".to_string(),
            ],
            fallback: "power2.out".to_string(),
        }
    }
}

impl EasingPolicy {
    /// Does the easing belong to a complex family?
    pub fn is_complex(&self, easing: &str) -> bool {
        let easing = easing.to_ascii_lowercase();
        self.complex_families
            .iter()
            .any(|family| easing.contains(&family.to_ascii_lowercase()))
    }

    /// Is the easing on the whitelist?
    pub fn is_whitelisted(&self, easing: &str) -> bool {
        self.whitelist.iter().any(|e| e.eq_ignore_ascii_case(easing))
    }
}

/// Complete policy table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyTable {
    /// Table version, reported in every resolved configuration
    pub version: u32,
    pub thresholds: TierThresholds,
    pub duration: DurationPolicy,
    pub easing: EasingPolicy,
    pub tiers: TierTable,
}

impl PolicyTable {
    /// Version 1 defaults
    pub fn v1() -> Self {
        Self {
            version: POLICY_VERSION,
            thresholds: TierThresholds::default(),
            duration: DurationPolicy::default(),
            easing: EasingPolicy::default(),
            tiers: TierTable::v1(),
        }
    }

    /// Shared instance of the version 1 table
    pub fn default_ref() -> &'static PolicyTable {
        static DEFAULT: OnceLock<PolicyTable> = OnceLock::new();
        DEFAULT.get_or_init(PolicyTable::v1)
    }

    /// Load from a file, picking the format from the extension
    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let table = match ext {
            "toml" => Self::from_toml_file(path)?,
            "json" => Self::from_json_file(path)?,
            _ => return Err(PolicyError::UnsupportedFormat),
        };

        info!("Loaded policy table version {} from {}", table.version, path.display());
        Ok(table)
    }

    /// Load from a string in the given format
    pub fn load_str(content: &str, format: ConfigFormat) -> Result<Self, PolicyError> {
        match format {
            ConfigFormat::Toml => Self::from_toml(content),
            ConfigFormat::Json => Self::from_json(content),
        }
    }

    /// Load from TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self, PolicyError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| PolicyError::IoError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse and validate TOML
    pub fn from_toml(content: &str) -> Result<Self, PolicyError> {
        let table: Self =
            toml::from_str(content).map_err(|e| PolicyError::ParseError(e.to_string()))?;
        table.validate()?;
        Ok(table)
    }

    /// Load from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, PolicyError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| PolicyError::IoError(e.to_string()))?;
        Self::from_json(&content)
    }

    /// Parse and validate JSON
    pub fn from_json(content: &str) -> Result<Self, PolicyError> {
        let table: Self =
            serde_json::from_str(content).map_err(|e| PolicyError::ParseError(e.to_string()))?;
        table.validate()?;
        Ok(table)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.version == 0 {
            return Err(PolicyError::InvalidVersion);
        }

        let t = &self.thresholds;
        if !(t.moderate_benchmark_ms.is_finite() && t.slow_benchmark_ms.is_finite())
            || t.moderate_benchmark_ms > t.slow_benchmark_ms
        {
            return Err(PolicyError::InvalidThresholds(
                "moderate benchmark threshold must not exceed the slow one".into(),
            ));
        }
        if t.low_memory_gib > t.medium_memory_gib || t.low_cores > t.medium_cores {
            return Err(PolicyError::InvalidThresholds(
                "low memory/core cutoffs must not exceed the medium ones".into(),
            ));
        }
        if !(t.default_memory_gib.is_finite() && t.default_memory_gib > 0.0) || t.default_cores == 0 {
            return Err(PolicyError::InvalidThresholds(
                "defaults for missing signals must be positive".into(),
            ));
        }

        let d = &self.duration;
        if !(d.low_damping > 0.0 && d.low_damping < 1.0) {
            return Err(PolicyError::InvalidDamping(d.low_damping));
        }
        if !(d.low_ceiling_ms.is_finite() && d.low_ceiling_ms > 0.0) {
            return Err(PolicyError::InvalidDuration(d.low_ceiling_ms));
        }
        if !(d.still_duration_ms.is_finite() && d.still_duration_ms > 0.0) {
            return Err(PolicyError::InvalidDuration(d.still_duration_ms));
        }

        let e = &self.easing;
        if !e.is_whitelisted(&e.fallback) || e.is_complex(&e.fallback) {
            return Err(PolicyError::InvalidFallbackEasing(e.fallback.clone()));
        }

        if !self.tiers.unsupported.is_disabled() {
            return Err(PolicyError::UnsupportedTierNotDisabled);
        }
        let reduced = &self.tiers.accessibility;
        if reduced.max_elements != 0 {
            return Err(PolicyError::InvalidTierRow("accessibility", "max_elements must be 0"));
        }
        if reduced.allows_any_feature() {
            return Err(PolicyError::InvalidTierRow(
                "accessibility",
                "every allow_* flag must be false",
            ));
        }
        if reduced.recommended_renderer != Some(self.tiers.cheapest_renderer()) {
            return Err(PolicyError::InvalidTierRow(
                "accessibility",
                "recommended_renderer must be the cheapest renderer",
            ));
        }
        for (name, row) in [
            ("accessibility", &self.tiers.accessibility),
            ("low", &self.tiers.low),
            ("medium", &self.tiers.medium),
            ("high", &self.tiers.high),
        ] {
            if row.recommended_renderer.is_none() {
                return Err(PolicyError::InvalidTierRow(name, "recommended_renderer is required"));
            }
        }

        Ok(())
    }

    /// Capability row override helper, used when tuning a single tier
    pub fn with_row(mut self, tier: Tier, row: TierCapabilities) -> Self {
        match tier {
            Tier::Unsupported => self.tiers.unsupported = row,
            Tier::Accessibility => self.tiers.accessibility = row,
            Tier::Low => self.tiers.low = row,
            Tier::Medium => self.tiers.medium = row,
            Tier::High => self.tiers.high = row,
        }
        self
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::v1()
    }
}

/// Policy file format
#[derive(Debug, Clone, Copy)]
pub enum ConfigFormat {
    Toml,
    Json,
}

/// Policy table errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unsupported policy format")]
    UnsupportedFormat,

    #[error("Policy version must be at least 1")]
    InvalidVersion,

    #[error("Invalid thresholds: {0}")]
    InvalidThresholds(String),

    #[error("Low-tier damping must be in (0, 1), got {0}")]
    InvalidDamping(f64),

    #[error("Duration must be positive and finite, got {0}")]
    InvalidDuration(f64),

    #[error("Fallback easing {0:?} must be whitelisted and not complex")]
    InvalidFallbackEasing(String),

    #[error("Unsupported tier must disable every capability")]
    UnsupportedTierNotDisabled,

    #[error("Invalid {0} tier row: {1}")]
    InvalidTierRow(&'static str, &'static str),
}
