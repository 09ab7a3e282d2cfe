//! Derived dashboard aggregates.

use std::collections::HashSet;

use serde::Serialize;

use crate::risk::is_high_risk;
use crate::types::IntelligenceItem;

/// Aggregates shown in the dashboard header.
///
/// Always a pure function of the item collection: callers recompute after
/// every change to the items and never adjust the counts in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Number of distinct `source_id` values across the items.
    pub total_sources: usize,
    /// Number of items the classifier marks as high risk.
    pub high_risk_count: usize,
}

/// Recomputes [`DashboardStats`] over the full item collection.
#[must_use]
pub fn recompute_stats(items: &[IntelligenceItem]) -> DashboardStats {
    let total_sources = items
        .iter()
        .map(|i| i.source_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    let high_risk_count = items.iter().filter(|i| is_high_risk(i)).count();

    DashboardStats {
        total_sources,
        high_risk_count,
    }
}
