//! Keyword-based high-risk classifier for intelligence items.

use crate::types::IntelligenceItem;

/// Lowercase keywords that mark an item as high risk.
///
/// Matching is plain substring containment, so a keyword embedded in an
/// unrelated longer word still counts.
pub const HIGH_RISK_KEYWORDS: &[&str] = &[
    "高风险",
    "重大风险",
    "严重",
    "紧急",
    "预警",
    "警告",
    "high risk",
    "critical",
    "urgent",
    "warning",
];

/// Returns `true` if the item's `risk_hint` or `summary` contains any of
/// [`HIGH_RISK_KEYWORDS`], case-insensitively. Absent fields count as empty.
#[must_use]
pub fn is_high_risk(item: &IntelligenceItem) -> bool {
    let hint = item.risk_hint.as_deref().unwrap_or_default().to_lowercase();
    let summary = item.summary.as_deref().unwrap_or_default().to_lowercase();
    HIGH_RISK_KEYWORDS
        .iter()
        .any(|k| hint.contains(k) || summary.contains(k))
}
