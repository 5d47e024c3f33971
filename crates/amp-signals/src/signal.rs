//! Raw environment signal snapshot.

use serde::{Deserialize, Serialize};

/// WebGL support reported by the environment
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum WebGlVersion {
    /// No WebGL context could be created
    #[default]
    None,
    /// WebGL 1.0
    WebGl1,
    /// WebGL 2.0
    WebGl2,
}

impl WebGlVersion {
    /// Map a reported version number (0, 1 or 2)
    pub fn from_number(version: u8) -> Option<Self> {
        match version {
            0 => Some(Self::None),
            1 => Some(Self::WebGl1),
            2 => Some(Self::WebGl2),
            _ => None,
        }
    }

    /// Version number as reported by browsers
    pub fn number(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::WebGl1 => 1,
            Self::WebGl2 => 2,
        }
    }

    /// Is any WebGL context available?
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Immutable snapshot of the environment, taken once per session.
///
/// `None` means the environment did not expose that hint. The profiler
/// substitutes conservative defaults; nothing here is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    /// Device memory hint in GiB
    pub device_memory_gib: Option<f64>,
    /// Logical CPU cores
    pub logical_cores: Option<u32>,
    /// User asked the platform to minimize motion
    pub prefers_reduced_motion: bool,
    /// Highest WebGL version available
    pub webgl_version: WebGlVersion,
    /// Relative cost score from the micro-benchmark (higher is slower)
    pub benchmark_score_ms: f64,
}

impl Signal {
    /// Create a snapshot from explicit values
    pub fn new(
        device_memory_gib: Option<f64>,
        logical_cores: Option<u32>,
        prefers_reduced_motion: bool,
        webgl_version: WebGlVersion,
        benchmark_score_ms: f64,
    ) -> Self {
        Self {
            device_memory_gib,
            logical_cores,
            prefers_reduced_motion,
            webgl_version,
            benchmark_score_ms,
        }
    }

    /// Snapshot of an environment that reported nothing
    pub fn unknown() -> Self {
        Self {
            device_memory_gib: None,
            logical_cores: None,
            prefers_reduced_motion: false,
            webgl_version: WebGlVersion::None,
            benchmark_score_ms: 0.0,
        }
    }

    /// Copy with a different reduced-motion preference
    pub fn with_reduced_motion(self, prefers_reduced_motion: bool) -> Self {
        Self {
            prefers_reduced_motion,
            ..self
        }
    }

    /// Copy with a different WebGL version
    pub fn with_webgl(self, webgl_version: WebGlVersion) -> Self {
        Self {
            webgl_version,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webgl_numbers() {
        for version in [WebGlVersion::None, WebGlVersion::WebGl1, WebGlVersion::WebGl2] {
            assert_eq!(WebGlVersion::from_number(version.number()), Some(version));
        }
        assert_eq!(WebGlVersion::from_number(3), None);
        assert!(!WebGlVersion::None.is_available());
        assert!(WebGlVersion::WebGl1.is_available());
        assert_eq!(WebGlVersion::default(), WebGlVersion::None);
    }

    #[test]
    fn test_signal_copies_are_independent() {
        let base = Signal::new(Some(8.0), Some(8), false, WebGlVersion::WebGl2, 40.0);
        let reduced = base.with_reduced_motion(true);

        assert!(!base.prefers_reduced_motion);
        assert!(reduced.prefers_reduced_motion);
        assert_eq!(reduced.device_memory_gib, Some(8.0));
    }

    #[test]
    fn test_signal_json_shape() {
        let signal = Signal::new(Some(1.0), Some(2), false, WebGlVersion::WebGl1, 250.0);
        let json = serde_json::to_value(signal).unwrap();

        assert_eq!(json["deviceMemoryGib"], 1.0);
        assert_eq!(json["logicalCores"], 2);
        assert_eq!(json["webglVersion"], "webgl1");
    }
}
