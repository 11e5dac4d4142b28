use std::collections::VecDeque;
use std::sync::Mutex;

use autograph_audit::ProvenanceStore;
use autograph_types::{Proposal, RateLimits};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::error::EngineError;

/// Result of a capacity check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl RateDecision {
    fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn denied(reason: String) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

/// Multi-window commit rate limiter.
///
/// The hourly cap runs against an in-memory sliding window (trimmed at
/// check time) because this check runs per proposal and must be fast.
/// The daily cap and the review-queue depth run against the audit
/// store, which is the durable source of truth and survives restarts —
/// the in-memory window is a performance cache, never the sole gate for
/// the hard limits.
///
/// Checks run in a fixed order — batch size, hourly, daily, queue
/// depth — and the first failing check wins.
///
/// Single-process by design: the window assumes one limiter instance
/// per deployment. Distributed rate limiting is an open question this
/// design does not solve.
#[derive(Debug, Default)]
pub struct RateLimiter {
    window: Mutex<VecDeque<DateTime<Utc>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits recorded in the trailing hour. Trims expired entries.
    pub fn hourly_count(&self) -> usize {
        let cutoff = Utc::now() - Duration::hours(1);
        let mut window = self.window.lock().unwrap_or_else(|e| e.into_inner());
        while window.front().is_some_and(|at| *at < cutoff) {
            window.pop_front();
        }
        window.len()
    }

    /// Record one executed commit. Must complete before the next
    /// `can_commit` that should observe it (read-after-write within the
    /// process).
    pub fn record_commit(&self) {
        let mut window = self.window.lock().unwrap_or_else(|e| e.into_inner());
        window.push_back(Utc::now());
    }

    pub async fn can_commit(
        &self,
        limits: &RateLimits,
        store: &dyn ProvenanceStore,
        proposal: &Proposal,
    ) -> Result<RateDecision, EngineError> {
        let batch = proposal.target_count();
        if batch > limits.max_targets_per_commit as usize {
            return Ok(RateDecision::denied(format!(
                "Batch of {batch} exceeds per-commit limit {}",
                limits.max_targets_per_commit
            )));
        }

        let hourly = self.hourly_count();
        if hourly >= limits.max_auto_commits_per_hour as usize {
            debug!(hourly, cap = limits.max_auto_commits_per_hour, "hourly cap hit");
            return Ok(RateDecision::denied(format!(
                "Hourly limit reached ({hourly}/{})",
                limits.max_auto_commits_per_hour
            )));
        }

        let since = Utc::now() - Duration::hours(24);
        let daily = store.count_committed_since(since).await?;
        if daily >= limits.max_auto_commits_per_day as usize {
            return Ok(RateDecision::denied(format!(
                "Daily limit reached ({daily}/{})",
                limits.max_auto_commits_per_day
            )));
        }

        let pending = store.count_pending().await?;
        if pending >= limits.max_pending_reviews as usize {
            return Ok(RateDecision::denied(format!(
                "Review queue full ({pending}/{})",
                limits.max_pending_reviews
            )));
        }

        Ok(RateDecision::allowed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use autograph_audit::{
        AuditError, DecisionStats, MemoryProvenanceStore, ThresholdAdjustment,
    };
    use autograph_types::{
        AutoCommitProvenance, CorrelationId, ProvenanceId, RevertSnapshot, ReviewStatus,
    };

    fn limits() -> RateLimits {
        RateLimits {
            max_auto_commits_per_hour: 3,
            max_auto_commits_per_day: 10,
            max_pending_reviews: 5,
            max_targets_per_commit: 10,
        }
    }

    #[tokio::test]
    async fn allows_under_all_caps() {
        let limiter = RateLimiter::new();
        let store = MemoryProvenanceStore::new();
        let proposal = Proposal::new(CorrelationId::new());
        let decision = limiter
            .can_commit(&limits(), &store, &proposal)
            .await
            .unwrap();
        assert!(decision.allowed);
        assert!(decision.reason.is_none());
    }

    #[tokio::test]
    async fn hourly_cap_denies_with_counts_in_reason() {
        let limiter = RateLimiter::new();
        let store = MemoryProvenanceStore::new();
        let proposal = Proposal::new(CorrelationId::new());
        for _ in 0..3 {
            limiter.record_commit();
        }

        let decision = limiter
            .can_commit(&limits(), &store, &proposal)
            .await
            .unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.reason.as_deref(), Some("Hourly limit reached (3/3)"));
    }

    /// Store that panics on durable checks — proves the hourly check
    /// short-circuits before any store round trip.
    struct ExplodingStore;

    #[async_trait]
    impl ProvenanceStore for ExplodingStore {
        async fn record(&self, _: AutoCommitProvenance) -> Result<(), AuditError> {
            unreachable!()
        }
        async fn get(
            &self,
            _: &ProvenanceId,
        ) -> Result<Option<AutoCommitProvenance>, AuditError> {
            unreachable!()
        }
        async fn get_by_status(
            &self,
            _: ReviewStatus,
        ) -> Result<Vec<AutoCommitProvenance>, AuditError> {
            unreachable!()
        }
        async fn get_by_correlation(
            &self,
            _: &CorrelationId,
        ) -> Result<Vec<AutoCommitProvenance>, AuditError> {
            unreachable!()
        }
        async fn get_recent(&self, _: usize) -> Result<Vec<AutoCommitProvenance>, AuditError> {
            unreachable!()
        }
        async fn update_review_status(
            &self,
            _: &ProvenanceId,
            _: ReviewStatus,
            _: Option<String>,
        ) -> Result<AutoCommitProvenance, AuditError> {
            unreachable!()
        }
        async fn get_revert_snapshot(
            &self,
            _: &ProvenanceId,
        ) -> Result<Option<RevertSnapshot>, AuditError> {
            unreachable!()
        }
        async fn count_committed_since(
            &self,
            _: DateTime<Utc>,
        ) -> Result<usize, AuditError> {
            panic!("daily check must not run after hourly denial")
        }
        async fn count_pending(&self) -> Result<usize, AuditError> {
            panic!("queue check must not run after hourly denial")
        }
        async fn record_auto_reject(&self, _: &CorrelationId) -> Result<(), AuditError> {
            unreachable!()
        }
        async fn decision_stats(&self, _: usize) -> Result<DecisionStats, AuditError> {
            unreachable!()
        }
        async fn get_stats(&self, _: u32) -> Result<DecisionStats, AuditError> {
            unreachable!()
        }
        async fn record_adjustment(&self, _: ThresholdAdjustment) -> Result<(), AuditError> {
            unreachable!()
        }
        async fn recent_adjustments(
            &self,
            _: usize,
        ) -> Result<Vec<ThresholdAdjustment>, AuditError> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn hourly_denial_short_circuits_durable_checks() {
        let limiter = RateLimiter::new();
        let proposal = Proposal::new(CorrelationId::new());
        for _ in 0..3 {
            limiter.record_commit();
        }

        let decision = limiter
            .can_commit(&limits(), &ExplodingStore, &proposal)
            .await
            .unwrap();
        assert!(!decision.allowed);
        assert!(decision.reason.unwrap().starts_with("Hourly limit"));
    }

    #[tokio::test]
    async fn oversized_batch_denied_before_any_window() {
        use autograph_types::{EntityId, ProposedEntity};

        let limiter = RateLimiter::new();
        let proposal = Proposal::new(CorrelationId::new()).with_entity(ProposedEntity {
            id: EntityId("a".into()),
            entity_type: "concept".into(),
            label: "a".into(),
            ai_confidence: 0.9,
        });
        let tight = RateLimits {
            max_targets_per_commit: 0,
            ..limits()
        };
        let decision = limiter
            .can_commit(&tight, &ExplodingStore, &proposal)
            .await
            .unwrap();
        assert!(!decision.allowed);
        assert!(decision.reason.unwrap().contains("per-commit limit"));
    }

    #[tokio::test]
    async fn window_trims_after_an_hour() {
        let limiter = RateLimiter::new();
        {
            let mut window = limiter.window.lock().unwrap();
            window.push_back(Utc::now() - Duration::hours(2));
            window.push_back(Utc::now());
        }
        assert_eq!(limiter.hourly_count(), 1);
    }
}
