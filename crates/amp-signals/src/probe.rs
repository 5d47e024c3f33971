//! Environment Probes
//!
//! A probe is the only thing that reads the ambient environment.
//! `SystemProbe` asks the host OS; `HintProbe` replays the hints a
//! browser exposes (`navigator.deviceMemory`, `hardwareConcurrency`,
//! the `prefers-reduced-motion` media query and a WebGL context probe).

use crate::signal::WebGlVersion;
use serde::{Deserialize, Serialize};
use std::path::Path;
use sysinfo::System;
use thiserror::Error;
use tracing::warn;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Read-only access to the environment hints
pub trait EnvironmentProbe: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Device memory in GiB, if exposed
    fn device_memory_gib(&self) -> Option<f64>;

    /// Logical CPU cores, if exposed
    fn logical_cores(&self) -> Option<u32>;

    /// Reduced-motion preference (false when unknown)
    fn prefers_reduced_motion(&self) -> bool;

    /// Highest available WebGL version
    fn webgl_version(&self) -> WebGlVersion;
}

/// Probe backed by the host operating system
///
/// Memory comes from sysinfo, cores from the scheduler's available
/// parallelism. The host has no notion of a reduced-motion media query
/// or a WebGL context, so those are supplied by the embedder.
#[derive(Debug, Clone, Default)]
pub struct SystemProbe {
    reduced_motion: bool,
    webgl: WebGlVersion,
}

impl SystemProbe {
    /// Create a probe with no reduced-motion preference and no WebGL
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reduced-motion preference reported by the host shell
    pub fn with_reduced_motion(mut self, reduced_motion: bool) -> Self {
        self.reduced_motion = reduced_motion;
        self
    }

    /// Set the WebGL version the embedding surface supports
    pub fn with_webgl(mut self, webgl: WebGlVersion) -> Self {
        self.webgl = webgl;
        self
    }
}

impl EnvironmentProbe for SystemProbe {
    fn name(&self) -> &'static str {
        "system"
    }

    fn device_memory_gib(&self) -> Option<f64> {
        let mut system = System::new();
        system.refresh_memory();

        match system.total_memory() {
            0 => None,
            bytes => Some(bytes as f64 / BYTES_PER_GIB),
        }
    }

    fn logical_cores(&self) -> Option<u32> {
        std::thread::available_parallelism()
            .ok()
            .map(|p| p.get() as u32)
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn webgl_version(&self) -> WebGlVersion {
        self.webgl
    }
}

/// Hint payload as posted by a browser front-end
///
/// ```json
/// { "deviceMemory": 4, "hardwareConcurrency": 8,
///   "prefersReducedMotion": false, "webglVersion": 2 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentHints {
    /// `navigator.deviceMemory` (GiB, bucketed by the browser)
    #[serde(default)]
    pub device_memory: Option<f64>,
    /// `navigator.hardwareConcurrency`
    #[serde(default)]
    pub hardware_concurrency: Option<u32>,
    /// `matchMedia('(prefers-reduced-motion: reduce)').matches`
    #[serde(default)]
    pub prefers_reduced_motion: bool,
    /// 0, 1 or 2
    #[serde(default)]
    pub webgl_version: Option<u8>,
}

impl EnvironmentHints {
    /// Parse from a JSON string
    pub fn from_json(content: &str) -> Result<Self, HintsError> {
        serde_json::from_str(content).map_err(|e| HintsError::ParseError(e.to_string()))
    }

    /// Load from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, HintsError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| HintsError::IoError(e.to_string()))?;
        Self::from_json(&content)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Probe that replays browser-supplied hints
///
/// Values a browser could never legitimately report (non-finite or
/// non-positive memory, zero cores, unknown WebGL versions) are treated
/// as unavailable rather than trusted.
#[derive(Debug, Clone, Default)]
pub struct HintProbe {
    hints: EnvironmentHints,
}

impl HintProbe {
    /// Wrap a hint payload
    pub fn new(hints: EnvironmentHints) -> Self {
        Self { hints }
    }

    /// The raw hints
    pub fn hints(&self) -> &EnvironmentHints {
        &self.hints
    }
}

impl EnvironmentProbe for HintProbe {
    fn name(&self) -> &'static str {
        "hints"
    }

    fn device_memory_gib(&self) -> Option<f64> {
        match self.hints.device_memory {
            Some(gib) if gib.is_finite() && gib > 0.0 => Some(gib),
            Some(gib) => {
                warn!("Ignoring invalid deviceMemory hint: {}", gib);
                None
            }
            None => None,
        }
    }

    fn logical_cores(&self) -> Option<u32> {
        self.hints.hardware_concurrency.filter(|&cores| cores > 0)
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.hints.prefers_reduced_motion
    }

    fn webgl_version(&self) -> WebGlVersion {
        match self.hints.webgl_version {
            Some(n) => WebGlVersion::from_number(n).unwrap_or_else(|| {
                warn!("Ignoring unknown webglVersion hint: {}", n);
                WebGlVersion::None
            }),
            None => WebGlVersion::None,
        }
    }
}

/// Hint parsing errors
#[derive(Debug, Clone, Error)]
pub enum HintsError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_probe() {
        let probe = SystemProbe::new();

        assert!(probe.logical_cores().unwrap_or(1) >= 1);
        if let Some(gib) = probe.device_memory_gib() {
            assert!(gib > 0.0);
        }
        assert!(!probe.prefers_reduced_motion());
        assert_eq!(probe.webgl_version(), WebGlVersion::None);
    }

    #[test]
    fn test_system_probe_overrides() {
        let probe = SystemProbe::new()
            .with_reduced_motion(true)
            .with_webgl(WebGlVersion::WebGl2);

        assert!(probe.prefers_reduced_motion());
        assert_eq!(probe.webgl_version(), WebGlVersion::WebGl2);
    }

    #[test]
    fn test_hints_from_json() {
        let hints = EnvironmentHints::from_json(
            r#"{"deviceMemory": 0.5, "hardwareConcurrency": 2, "prefersReducedMotion": true, "webglVersion": 1}"#,
        )
        .unwrap();
        let probe = HintProbe::new(hints);

        assert_eq!(probe.device_memory_gib(), Some(0.5));
        assert_eq!(probe.logical_cores(), Some(2));
        assert!(probe.prefers_reduced_motion());
        assert_eq!(probe.webgl_version(), WebGlVersion::WebGl1);
    }

    #[test]
    fn test_missing_hints_are_unavailable() {
        let probe = HintProbe::new(EnvironmentHints::from_json("{}").unwrap());

        assert_eq!(probe.device_memory_gib(), None);
        assert_eq!(probe.logical_cores(), None);
        assert!(!probe.prefers_reduced_motion());
        assert_eq!(probe.webgl_version(), WebGlVersion::None);
    }

    #[test]
    fn test_invalid_hints_are_discarded() {
        let probe = HintProbe::new(EnvironmentHints {
            device_memory: Some(-4.0),
            hardware_concurrency: Some(0),
            prefers_reduced_motion: false,
            webgl_version: Some(9),
        });

        assert_eq!(probe.device_memory_gib(), None);
        assert_eq!(probe.logical_cores(), None);
        assert_eq!(probe.webgl_version(), WebGlVersion::None);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            EnvironmentHints::from_json("not json"),
            Err(HintsError::ParseError(_))
        ));
    }

    #[test]
    fn test_hints_json_roundtrip() {
        let hints = EnvironmentHints {
            device_memory: Some(8.0),
            hardware_concurrency: Some(8),
            prefers_reduced_motion: false,
            webgl_version: Some(2),
        };

        let parsed = EnvironmentHints::from_json(&hints.to_json()).unwrap();
        assert_eq!(parsed, hints);
    }
}
