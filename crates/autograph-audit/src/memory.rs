use async_trait::async_trait;
use autograph_types::{
    AutoCommitProvenance, CorrelationId, ProvenanceId, RevertSnapshot, ReviewStatus,
};
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::adjustment::ThresholdAdjustment;
use crate::error::AuditError;
use crate::stats::DecisionStats;
use crate::store::ProvenanceStore;

#[derive(Default)]
struct Inner {
    records: Vec<AutoCommitProvenance>,
    /// Auto-rejections, which leave no provenance row.
    auto_rejects: Vec<(CorrelationId, DateTime<Utc>)>,
    adjustments: Vec<ThresholdAdjustment>,
}

/// In-memory provenance store.
///
/// Append-only under an async RwLock: concurrent evaluations may append
/// and read freely, and a write completing before a later read is
/// guaranteed to be visible to it (single-process read-after-write).
/// Suitable for tests and single-process deployments; a database-backed
/// implementation satisfies the same trait for durable setups.
#[derive(Default)]
pub struct MemoryProvenanceStore {
    inner: RwLock<Inner>,
}

impl MemoryProvenanceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

enum OutcomeClass {
    Record(ReviewStatus),
    AutoReject,
}

fn tally(stats: &mut DecisionStats, class: &OutcomeClass) {
    stats.total += 1;
    match class {
        OutcomeClass::Record(ReviewStatus::AutoApproved) => stats.auto_approved += 1,
        OutcomeClass::Record(ReviewStatus::PendingReview) => stats.pending_review += 1,
        OutcomeClass::Record(ReviewStatus::HumanConfirmed) => stats.human_confirmed += 1,
        OutcomeClass::Record(ReviewStatus::HumanReverted) => stats.human_reverted += 1,
        OutcomeClass::AutoReject => stats.auto_rejected += 1,
    }
}

impl Inner {
    /// All decisions (rows + auto-rejects) newest first.
    fn outcomes(&self) -> Vec<(DateTime<Utc>, OutcomeClass)> {
        let mut outcomes: Vec<(DateTime<Utc>, OutcomeClass)> = self
            .records
            .iter()
            .map(|r| (r.created_at, OutcomeClass::Record(r.review_status)))
            .chain(
                self.auto_rejects
                    .iter()
                    .map(|(_, at)| (*at, OutcomeClass::AutoReject)),
            )
            .collect();
        outcomes.sort_by(|a, b| b.0.cmp(&a.0));
        outcomes
    }
}

#[async_trait]
impl ProvenanceStore for MemoryProvenanceStore {
    async fn record(&self, record: AutoCommitProvenance) -> Result<(), AuditError> {
        let mut inner = self.inner.write().await;
        if inner.records.iter().any(|r| r.id == record.id) {
            return Err(AuditError::DuplicateEntry(record.id.clone()));
        }
        debug!(id = %record.id, status = %record.review_status, "provenance recorded");
        inner.records.push(record);
        Ok(())
    }

    async fn get(&self, id: &ProvenanceId) -> Result<Option<AutoCommitProvenance>, AuditError> {
        let inner = self.inner.read().await;
        Ok(inner.records.iter().find(|r| r.id == *id).cloned())
    }

    async fn get_by_status(
        &self,
        status: ReviewStatus,
    ) -> Result<Vec<AutoCommitProvenance>, AuditError> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .iter()
            .filter(|r| r.review_status == status)
            .cloned()
            .collect())
    }

    async fn get_by_correlation(
        &self,
        correlation_id: &CorrelationId,
    ) -> Result<Vec<AutoCommitProvenance>, AuditError> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .iter()
            .filter(|r| r.correlation_id == *correlation_id)
            .cloned()
            .collect())
    }

    async fn get_recent(&self, limit: usize) -> Result<Vec<AutoCommitProvenance>, AuditError> {
        let inner = self.inner.read().await;
        let mut records: Vec<AutoCommitProvenance> = inner.records.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }

    async fn update_review_status(
        &self,
        id: &ProvenanceId,
        status: ReviewStatus,
        note: Option<String>,
    ) -> Result<AutoCommitProvenance, AuditError> {
        let mut inner = self.inner.write().await;
        let record = inner
            .records
            .iter_mut()
            .find(|r| r.id == *id)
            .ok_or_else(|| AuditError::NotFound(id.clone()))?;
        record.apply_review(status, note, Utc::now());
        Ok(record.clone())
    }

    async fn get_revert_snapshot(
        &self,
        id: &ProvenanceId,
    ) -> Result<Option<RevertSnapshot>, AuditError> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .iter()
            .find(|r| r.id == *id)
            .and_then(|r| r.revert_snapshot.clone()))
    }

    async fn count_committed_since(&self, since: DateTime<Utc>) -> Result<usize, AuditError> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .iter()
            .filter(|r| r.can_revert && r.created_at >= since)
            .count())
    }

    async fn count_pending(&self) -> Result<usize, AuditError> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .iter()
            .filter(|r| r.review_status == ReviewStatus::PendingReview)
            .count())
    }

    async fn record_auto_reject(
        &self,
        correlation_id: &CorrelationId,
    ) -> Result<(), AuditError> {
        let mut inner = self.inner.write().await;
        inner.auto_rejects.push((correlation_id.clone(), Utc::now()));
        Ok(())
    }

    async fn decision_stats(&self, window: usize) -> Result<DecisionStats, AuditError> {
        let inner = self.inner.read().await;
        let mut stats = DecisionStats::default();
        for (_, class) in inner.outcomes().iter().take(window) {
            tally(&mut stats, class);
        }
        Ok(stats)
    }

    async fn get_stats(&self, hours: u32) -> Result<DecisionStats, AuditError> {
        let cutoff = Utc::now() - Duration::hours(i64::from(hours));
        let inner = self.inner.read().await;
        let mut stats = DecisionStats::default();
        for (at, class) in inner.outcomes() {
            if at >= cutoff {
                tally(&mut stats, &class);
            }
        }
        Ok(stats)
    }

    async fn record_adjustment(
        &self,
        adjustment: ThresholdAdjustment,
    ) -> Result<(), AuditError> {
        let mut inner = self.inner.write().await;
        inner.adjustments.push(adjustment);
        Ok(())
    }

    async fn recent_adjustments(
        &self,
        limit: usize,
    ) -> Result<Vec<ThresholdAdjustment>, AuditError> {
        let inner = self.inner.read().await;
        let mut adjustments = inner.adjustments.clone();
        adjustments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        adjustments.truncate(limit);
        Ok(adjustments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autograph_types::{
        AutonomousConfig, ConfidenceFactors, EntityId, ProvenanceSource, SnapshotTarget,
        TargetType,
    };
    use std::sync::Arc;

    fn committed_record() -> AutoCommitProvenance {
        AutoCommitProvenance {
            id: ProvenanceId::new(),
            target_type: TargetType::Entity,
            entity_ids: vec![EntityId("e1".into())],
            connection_ids: vec![],
            source: ProvenanceSource::ChatExtraction,
            correlation_id: CorrelationId::new(),
            confidence: 0.93,
            confidence_factors: ConfidenceFactors::new(),
            validations_passed: vec!["schema".into()],
            critique_survival: None,
            created_at: Utc::now(),
            config_snapshot: AutonomousConfig::balanced(),
            review_status: ReviewStatus::AutoApproved,
            queue_reason: None,
            reviewed_at: None,
            review_note: None,
            can_revert: true,
            revert_snapshot: Some(RevertSnapshot {
                entities: vec![SnapshotTarget::created(EntityId("e1".into()))],
                connections: vec![],
            }),
        }
    }

    fn queued_record() -> AutoCommitProvenance {
        AutoCommitProvenance {
            review_status: ReviewStatus::PendingReview,
            can_revert: false,
            revert_snapshot: None,
            ..committed_record()
        }
    }

    #[tokio::test]
    async fn record_and_reread_deep_equal() {
        let store = MemoryProvenanceStore::new();
        let record = committed_record();
        store.record(record.clone()).await.unwrap();

        let by_status = store
            .get_by_status(ReviewStatus::AutoApproved)
            .await
            .unwrap();
        assert_eq!(by_status, vec![record.clone()]);

        let recent = store.get_recent(10).await.unwrap();
        assert_eq!(recent, vec![record]);
    }

    #[tokio::test]
    async fn duplicate_id_rejected() {
        let store = MemoryProvenanceStore::new();
        let record = committed_record();
        store.record(record.clone()).await.unwrap();
        assert!(matches!(
            store.record(record).await,
            Err(AuditError::DuplicateEntry(_))
        ));
    }

    #[tokio::test]
    async fn update_touches_only_review_fields() {
        let store = MemoryProvenanceStore::new();
        let record = committed_record();
        let id = record.id.clone();
        store.record(record.clone()).await.unwrap();

        let updated = store
            .update_review_status(&id, ReviewStatus::HumanConfirmed, Some("ok".into()))
            .await
            .unwrap();
        assert_eq!(updated.review_status, ReviewStatus::HumanConfirmed);
        assert_eq!(updated.review_note.as_deref(), Some("ok"));
        assert!(updated.reviewed_at.is_some());
        // Immutable fields untouched.
        assert_eq!(updated.confidence, record.confidence);
        assert_eq!(updated.correlation_id, record.correlation_id);
        assert_eq!(updated.created_at, record.created_at);
    }

    #[tokio::test]
    async fn counts_are_status_aware() {
        let store = MemoryProvenanceStore::new();
        store.record(committed_record()).await.unwrap();
        store.record(queued_record()).await.unwrap();
        store.record(queued_record()).await.unwrap();

        let day_ago = Utc::now() - Duration::hours(24);
        assert_eq!(store.count_committed_since(day_ago).await.unwrap(), 1);
        assert_eq!(store.count_pending().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn stats_merge_rows_and_auto_rejects() {
        let store = MemoryProvenanceStore::new();
        store.record(committed_record()).await.unwrap();
        let queued = queued_record();
        let queued_id = queued.id.clone();
        store.record(queued).await.unwrap();
        store
            .update_review_status(&queued_id, ReviewStatus::HumanReverted, None)
            .await
            .unwrap();
        store
            .record_auto_reject(&CorrelationId::new())
            .await
            .unwrap();

        let stats = store.decision_stats(10).await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.auto_approved, 1);
        assert_eq!(stats.human_reverted, 1);
        assert_eq!(stats.auto_rejected, 1);
        assert!((stats.rejection_rate() - 2.0 / 3.0).abs() < 1e-9);

        let hourly = store.get_stats(1).await.unwrap();
        assert_eq!(hourly.total, 3);
    }

    #[tokio::test]
    async fn decision_stats_window_is_bounded() {
        let store = MemoryProvenanceStore::new();
        for _ in 0..5 {
            store.record(committed_record()).await.unwrap();
        }
        let stats = store.decision_stats(3).await.unwrap();
        assert_eq!(stats.total, 3);
    }

    #[tokio::test]
    async fn concurrent_appends_all_land() {
        let store = Arc::new(MemoryProvenanceStore::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.record(committed_record()).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.get_recent(100).await.unwrap().len(), 16);
    }

    #[tokio::test]
    async fn adjustment_history_is_ordered() {
        let store = MemoryProvenanceStore::new();
        for rate in [0.4, 0.5] {
            store
                .record_adjustment(ThresholdAdjustment {
                    id: uuid::Uuid::new_v4(),
                    strategy: "global_ratio".into(),
                    before: AutonomousConfig::balanced().thresholds,
                    after: AutonomousConfig::strict().thresholds,
                    rejection_rate: rate,
                    window: 20,
                    reason: format!("rate {rate}"),
                    created_at: Utc::now(),
                })
                .await
                .unwrap();
        }
        let recent = store.recent_adjustments(1).await.unwrap();
        assert_eq!(recent.len(), 1);
    }
}
