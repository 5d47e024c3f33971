//! Recommendation Reporter
//!
//! Developer-facing notes explaining what the resolver changed. Pure
//! formatting; no decisions are made here.

use crate::resolver::{Adjustment, ResolvedConfiguration};

/// One line per adjustment, in pipeline order
///
/// `[rule] field: from → to (reason)`
pub fn format(config: &ResolvedConfiguration) -> Vec<String> {
    config.adjustments.iter().map(format_adjustment).collect()
}

/// Format a single adjustment
pub fn format_adjustment(adjustment: &Adjustment) -> String {
    format!(
        "[{}] {}: {} → {} ({})",
        adjustment.rule, adjustment.field, adjustment.from, adjustment.to, adjustment.reason
    )
}

/// One-line digest for logs
pub fn summary(config: &ResolvedConfiguration) -> String {
    let adjusted = match config.adjustments.len() {
        0 => "verbatim".to_string(),
        1 => "1 adjustment".to_string(),
        n => format!("{} adjustments", n),
    };

    format!(
        "tier={} renderer={} duration={}ms cap={} policy=v{} ({})",
        config.tier,
        config.renderer,
        config.duration_ms,
        config.element_count_cap,
        config.policy_version,
        adjusted
    )
}
