use autograph_types::Thresholds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable record of one dynamic threshold change.
///
/// Written only when an adjuster actually moved a threshold; no-op
/// evaluations leave no record. Exists for audit and explainability —
/// "why did the engine stop auto-committing yesterday afternoon" should
/// be answerable from this table alone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdAdjustment {
    pub id: uuid::Uuid,
    /// Strategy that made the change (e.g. "global_ratio").
    pub strategy: String,
    pub before: Thresholds,
    pub after: Thresholds,
    /// Observed rejection rate that triggered the change.
    pub rejection_rate: f64,
    /// Number of decisions the rate was computed over.
    pub window: usize,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
