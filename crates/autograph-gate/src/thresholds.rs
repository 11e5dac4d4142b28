use std::sync::Arc;

use async_trait::async_trait;
use autograph_audit::{ProvenanceStore, ThresholdAdjustment};
use autograph_types::{AdjustmentPolicy, Thresholds};
use chrono::Utc;
use tracing::info;

use crate::error::EngineError;

/// What an adjuster decided for one evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct AdjustedThresholds {
    pub thresholds: Thresholds,
    pub was_adjusted: bool,
    /// Rejection rate observed over the adjuster's window.
    pub rejection_rate: f64,
    /// Human-readable explanation when a change was made.
    pub reason: Option<String>,
}

impl AdjustedThresholds {
    fn unchanged(thresholds: Thresholds, rejection_rate: f64) -> Self {
        Self {
            thresholds,
            was_adjusted: false,
            rejection_rate,
            reason: None,
        }
    }
}

/// Strategy seam for dynamic thresholds. Runs once per evaluation,
/// before the configured thresholds are compared against the score.
#[async_trait]
pub trait ThresholdAdjuster: Send + Sync {
    fn name(&self) -> &'static str;

    async fn adjust(&self, configured: &Thresholds) -> Result<AdjustedThresholds, EngineError>;
}

/// Pass-through: thresholds never move.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticThresholds;

#[async_trait]
impl ThresholdAdjuster for StaticThresholds {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn adjust(&self, configured: &Thresholds) -> Result<AdjustedThresholds, EngineError> {
        Ok(AdjustedThresholds::unchanged(*configured, 0.0))
    }
}

/// Feedback-driven adjustment over the global rejection ratio.
///
/// Looks at the last `policy.window` decisions. A rejection rate above
/// `tighten_above` raises both accept thresholds by the full step and
/// the reject floor by half a step; a rate below `loosen_below` lowers
/// the accept thresholds by half a step and leaves the reject floor
/// alone. Loosening is deliberately slower than tightening.
///
/// Every applied change is persisted as a [`ThresholdAdjustment`] so the
/// history of effective thresholds stays reconstructible.
pub struct GlobalRatioAdjuster {
    store: Arc<dyn ProvenanceStore>,
    policy: AdjustmentPolicy,
}

/// Fewer decisions than this and the rate is noise, not signal.
const MIN_DECISIONS: usize = 5;

impl GlobalRatioAdjuster {
    pub fn new(store: Arc<dyn ProvenanceStore>, policy: AdjustmentPolicy) -> Self {
        Self { store, policy }
    }

    fn tighten(&self, configured: &Thresholds) -> Thresholds {
        let (accept_lo, accept_hi) = self.policy.accept_bounds;
        let (reject_lo, reject_hi) = self.policy.reject_bounds;
        let entity =
            (configured.auto_accept_entity + self.policy.step).clamp(accept_lo, accept_hi);
        let connection =
            (configured.auto_accept_connection + self.policy.step).clamp(accept_lo, accept_hi);
        let reject = (configured.auto_reject_below + self.policy.step / 2.0)
            .clamp(reject_lo, reject_hi)
            // The reject floor must stay meaningfully below the accept
            // threshold or the gate collapses into accept-or-reject.
            .min(entity - 0.1);
        Thresholds {
            auto_accept_entity: entity,
            auto_accept_connection: connection,
            auto_reject_below: reject,
        }
    }

    fn loosen(&self, configured: &Thresholds) -> Thresholds {
        let (accept_lo, accept_hi) = self.policy.accept_bounds;
        Thresholds {
            auto_accept_entity: (configured.auto_accept_entity - self.policy.step / 2.0)
                .clamp(accept_lo, accept_hi),
            auto_accept_connection: (configured.auto_accept_connection - self.policy.step / 2.0)
                .clamp(accept_lo, accept_hi),
            auto_reject_below: configured.auto_reject_below,
        }
    }
}

#[async_trait]
impl ThresholdAdjuster for GlobalRatioAdjuster {
    fn name(&self) -> &'static str {
        "global_ratio"
    }

    async fn adjust(&self, configured: &Thresholds) -> Result<AdjustedThresholds, EngineError> {
        let stats = self.store.decision_stats(self.policy.window).await?;
        if stats.total < MIN_DECISIONS {
            return Ok(AdjustedThresholds::unchanged(*configured, stats.rejection_rate()));
        }

        let rate = stats.rejection_rate();
        let (after, reason) = if rate > self.policy.tighten_above {
            (
                self.tighten(configured),
                format!(
                    "rejection rate {rate:.2} above {:.2}, tightening",
                    self.policy.tighten_above
                ),
            )
        } else if rate < self.policy.loosen_below {
            (
                self.loosen(configured),
                format!(
                    "rejection rate {rate:.2} below {:.2}, loosening",
                    self.policy.loosen_below
                ),
            )
        } else {
            return Ok(AdjustedThresholds::unchanged(*configured, rate));
        };

        if after == *configured {
            // Already pinned at a bound.
            return Ok(AdjustedThresholds::unchanged(*configured, rate));
        }

        info!(
            strategy = self.name(),
            rejection_rate = rate,
            window = self.policy.window,
            before_accept_entity = configured.auto_accept_entity,
            after_accept_entity = after.auto_accept_entity,
            %reason,
            "thresholds adjusted"
        );
        self.store
            .record_adjustment(ThresholdAdjustment {
                id: uuid::Uuid::new_v4(),
                strategy: self.name().to_string(),
                before: *configured,
                after,
                rejection_rate: rate,
                window: self.policy.window,
                reason: reason.clone(),
                created_at: Utc::now(),
            })
            .await?;

        Ok(AdjustedThresholds {
            thresholds: after,
            was_adjusted: true,
            rejection_rate: rate,
            reason: Some(reason),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autograph_audit::MemoryProvenanceStore;
    use autograph_types::{
        AutoCommitProvenance, AutonomousConfig, ConfidenceFactors, CorrelationId, EntityId,
        ProvenanceId, ProvenanceSource, ReviewStatus, TargetType, ThresholdStrategy,
    };

    fn balanced() -> Thresholds {
        Thresholds {
            auto_accept_entity: 0.90,
            auto_accept_connection: 0.85,
            auto_reject_below: 0.30,
        }
    }

    fn policy() -> AdjustmentPolicy {
        AdjustmentPolicy {
            strategy: ThresholdStrategy::GlobalRatio,
            ..AdjustmentPolicy::default()
        }
    }

    fn approved_record(n: usize) -> AutoCommitProvenance {
        AutoCommitProvenance {
            id: ProvenanceId::new(),
            target_type: TargetType::Entity,
            entity_ids: vec![EntityId(format!("e{n}"))],
            connection_ids: vec![],
            source: ProvenanceSource::ChatExtraction,
            correlation_id: CorrelationId::new(),
            confidence: 0.93,
            confidence_factors: ConfidenceFactors::new(),
            validations_passed: vec![],
            critique_survival: None,
            created_at: Utc::now(),
            config_snapshot: AutonomousConfig::balanced(),
            review_status: ReviewStatus::AutoApproved,
            queue_reason: None,
            reviewed_at: None,
            review_note: None,
            can_revert: true,
            revert_snapshot: None,
        }
    }

    #[tokio::test]
    async fn static_adjuster_never_moves() {
        let adjusted = StaticThresholds.adjust(&balanced()).await.unwrap();
        assert!(!adjusted.was_adjusted);
        assert_eq!(adjusted.thresholds, balanced());
    }

    #[tokio::test]
    async fn too_few_decisions_is_a_no_op() {
        let store = Arc::new(MemoryProvenanceStore::new());
        for n in 0..3 {
            store.record(approved_record(n)).await.unwrap();
        }
        let adjuster = GlobalRatioAdjuster::new(store.clone(), policy());
        let adjusted = adjuster.adjust(&balanced()).await.unwrap();
        assert!(!adjusted.was_adjusted);
        assert!(store.recent_adjustments(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn high_rejection_rate_tightens_and_records() {
        let store = Arc::new(MemoryProvenanceStore::new());
        // 10 approved + 10 auto-rejected over the window of 20: rate 0.5.
        for n in 0..10 {
            store.record(approved_record(n)).await.unwrap();
        }
        for _ in 0..10 {
            store.record_auto_reject(&CorrelationId::new()).await.unwrap();
        }

        let adjuster = GlobalRatioAdjuster::new(store.clone(), policy());
        let adjusted = adjuster.adjust(&balanced()).await.unwrap();

        assert!(adjusted.was_adjusted);
        assert!((adjusted.rejection_rate - 0.5).abs() < 1e-9);
        let t = adjusted.thresholds;
        assert!((t.auto_accept_entity - 0.95).abs() < 1e-9);
        assert!((t.auto_accept_connection - 0.90).abs() < 1e-9);
        assert!((t.auto_reject_below - 0.325).abs() < 1e-9);

        let history = store.recent_adjustments(10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].strategy, "global_ratio");
        assert_eq!(history[0].before, balanced());
        assert_eq!(history[0].after, t);
    }

    #[tokio::test]
    async fn low_rejection_rate_loosens_accepts_only() {
        let store = Arc::new(MemoryProvenanceStore::new());
        for n in 0..20 {
            store.record(approved_record(n)).await.unwrap();
        }

        let adjuster = GlobalRatioAdjuster::new(store, policy());
        let adjusted = adjuster.adjust(&balanced()).await.unwrap();

        assert!(adjusted.was_adjusted);
        let t = adjusted.thresholds;
        assert!((t.auto_accept_entity - 0.875).abs() < 1e-9);
        assert!((t.auto_accept_connection - 0.825).abs() < 1e-9);
        assert!((t.auto_reject_below - 0.30).abs() < 1e-9);
    }

    #[tokio::test]
    async fn tightening_clamps_at_accept_upper_bound() {
        let store = Arc::new(MemoryProvenanceStore::new());
        for n in 0..10 {
            store.record(approved_record(n)).await.unwrap();
        }
        for _ in 0..10 {
            store.record_auto_reject(&CorrelationId::new()).await.unwrap();
        }

        let pinned = Thresholds {
            auto_accept_entity: 0.99,
            auto_accept_connection: 0.99,
            auto_reject_below: 0.60,
        };
        let adjuster = GlobalRatioAdjuster::new(store.clone(), policy());
        let adjusted = adjuster.adjust(&pinned).await.unwrap();

        // Fully pinned: no change applied, no history row written.
        assert!(!adjusted.was_adjusted);
        assert!(store.recent_adjustments(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reject_floor_stays_below_entity_accept() {
        let store = Arc::new(MemoryProvenanceStore::new());
        for n in 0..10 {
            store.record(approved_record(n)).await.unwrap();
        }
        for _ in 0..10 {
            store.record_auto_reject(&CorrelationId::new()).await.unwrap();
        }

        let narrow = Thresholds {
            auto_accept_entity: 0.70,
            auto_accept_connection: 0.70,
            auto_reject_below: 0.60,
        };
        let adjuster = GlobalRatioAdjuster::new(store, policy());
        let adjusted = adjuster.adjust(&narrow).await.unwrap();

        assert!(adjusted.was_adjusted);
        let t = adjusted.thresholds;
        assert!(t.auto_reject_below <= t.auto_accept_entity - 0.1 + 1e-9);
    }

    #[tokio::test]
    async fn mid_band_rate_is_stable() {
        let store = Arc::new(MemoryProvenanceStore::new());
        // 18 approved + 2 rejected: rate 0.1, between loosen and tighten.
        for n in 0..18 {
            store.record(approved_record(n)).await.unwrap();
        }
        for _ in 0..2 {
            store.record_auto_reject(&CorrelationId::new()).await.unwrap();
        }

        let adjuster = GlobalRatioAdjuster::new(store, policy());
        let adjusted = adjuster.adjust(&balanced()).await.unwrap();
        assert!(!adjusted.was_adjusted);
        assert_eq!(adjusted.thresholds, balanced());
    }
}
