use serde::{Deserialize, Serialize};

/// Aggregated decision outcomes over a window (by count or by time).
///
/// Queued records are classified by their *current* review status, so a
/// pending item that a human later reverts moves from `pending_review`
/// to `human_reverted` the next time stats are taken.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionStats {
    pub total: usize,
    pub auto_approved: usize,
    pub pending_review: usize,
    pub human_confirmed: usize,
    pub human_reverted: usize,
    pub auto_rejected: usize,
}

impl DecisionStats {
    /// Fraction of decisions that were later reverted or rejected
    /// outright. Drives dynamic threshold adjustment.
    pub fn rejection_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.human_reverted + self.auto_rejected) as f64 / self.total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_has_zero_rejection_rate() {
        assert_eq!(DecisionStats::default().rejection_rate(), 0.0);
    }

    #[test]
    fn rejection_rate_counts_reverts_and_rejects() {
        let stats = DecisionStats {
            total: 20,
            auto_approved: 6,
            pending_review: 2,
            human_confirmed: 2,
            human_reverted: 4,
            auto_rejected: 6,
        };
        assert!((stats.rejection_rate() - 0.5).abs() < 1e-9);
    }
}
