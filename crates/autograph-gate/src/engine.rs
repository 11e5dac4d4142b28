use std::sync::Arc;

use autograph_audit::ProvenanceStore;
use autograph_confidence::{
    ConfidenceModel, ConfidenceResult, EvaluationInput, FactorPipeline, MultiFactorCalculator,
};
use autograph_types::{
    AutoCommitProvenance, AutonomousConfig, ConfidenceFactors, ConnectionId, Decision,
    DecisionKind, FactorKind, Proposal, ProposedConnection, ProvenanceId, ProvenanceSource,
    QueueReason, RevertSnapshot, ReviewStatus, SnapshotTarget, TargetType, ThresholdStrategy,
    WorkflowResult,
};
use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::error::EngineError;
use crate::events::{EventBridge, NullEventBridge, ReviewEvent};
use crate::executor::{CommitExecutor, ConnectionAdapter, EntityAdapter};
use crate::rate_limit::RateLimiter;
use crate::thresholds::{GlobalRatioAdjuster, StaticThresholds, ThresholdAdjuster};

/// One proposal plus everything known about how it was produced.
#[derive(Clone, Debug)]
pub struct EvaluationRequest {
    pub proposal: Proposal,
    pub workflow: WorkflowResult,
    pub source: ProvenanceSource,
    /// Fraction of adversarial critiques survived, when a critique pass ran.
    pub critique_survival: Option<f64>,
    /// Structural agreement across re-extractions, when measured.
    pub invariance: Option<f64>,
    /// Precomputed factor snapshot. When set, the evaluator pipeline is
    /// skipped entirely — upstream callers that already scored the
    /// proposal pass their snapshot through unchanged.
    pub factors: Option<ConfidenceFactors>,
}

impl EvaluationRequest {
    pub fn new(proposal: Proposal, workflow: WorkflowResult, source: ProvenanceSource) -> Self {
        Self {
            proposal,
            workflow,
            source,
            critique_survival: None,
            invariance: None,
            factors: None,
        }
    }

    pub fn with_critique_survival(mut self, survival: f64) -> Self {
        self.critique_survival = Some(survival);
        self
    }

    pub fn with_invariance(mut self, invariance: f64) -> Self {
        self.invariance = Some(invariance);
        self
    }

    pub fn with_factors(mut self, factors: ConfidenceFactors) -> Self {
        self.factors = Some(factors);
        self
    }
}

/// Outcome of one full evaluation.
#[derive(Clone, Debug)]
pub struct Evaluation {
    pub decision: Decision,
    /// Present once the evaluation reached the confidence gate.
    pub confidence: Option<ConfidenceResult>,
    /// The audit record written, for committed and queued decisions.
    pub provenance: Option<AutoCommitProvenance>,
}

/// The confidence-gated autonomous commit engine.
///
/// Holds a config snapshot plus the wired collaborators: a confidence
/// model, an evaluator pipeline, a threshold adjuster, the rate limiter
/// and the audit store. The commit executor and the delete adapters are
/// optional — an engine without an executor can still evaluate and
/// queue, it just cannot reach the final commit gate.
pub struct CommitEngine {
    config: AutonomousConfig,
    model: Box<dyn ConfidenceModel>,
    pipeline: FactorPipeline,
    adjuster: Box<dyn ThresholdAdjuster>,
    limiter: RateLimiter,
    store: Arc<dyn ProvenanceStore>,
    executor: Option<Arc<dyn CommitExecutor>>,
    entity_adapter: Option<Arc<dyn EntityAdapter>>,
    connection_adapter: Option<Arc<dyn ConnectionAdapter>>,
    events: Arc<dyn EventBridge>,
}

impl CommitEngine {
    /// Engine with the balanced multi-factor model, the adapter-free
    /// evaluator pipeline, and the adjuster named by the config.
    pub fn new(config: AutonomousConfig, store: Arc<dyn ProvenanceStore>) -> Self {
        let adjuster: Box<dyn ThresholdAdjuster> = match config.adjustment.strategy {
            ThresholdStrategy::Static => Box::new(StaticThresholds),
            ThresholdStrategy::GlobalRatio => Box::new(GlobalRatioAdjuster::new(
                Arc::clone(&store),
                config.adjustment,
            )),
        };
        Self {
            config,
            model: Box::new(MultiFactorCalculator::balanced()),
            pipeline: FactorPipeline::baseline(),
            adjuster,
            limiter: RateLimiter::new(),
            store,
            executor: None,
            entity_adapter: None,
            connection_adapter: None,
            events: Arc::new(NullEventBridge),
        }
    }

    pub fn with_model(mut self, model: Box<dyn ConfidenceModel>) -> Self {
        self.model = model;
        self
    }

    pub fn with_pipeline(mut self, pipeline: FactorPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn with_adjuster(mut self, adjuster: Box<dyn ThresholdAdjuster>) -> Self {
        self.adjuster = adjuster;
        self
    }

    pub fn with_executor(mut self, executor: Arc<dyn CommitExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn with_adapters(
        mut self,
        entities: Arc<dyn EntityAdapter>,
        connections: Arc<dyn ConnectionAdapter>,
    ) -> Self {
        self.entity_adapter = Some(entities);
        self.connection_adapter = Some(connections);
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventBridge>) -> Self {
        self.events = events;
        self
    }

    pub fn config(&self) -> &AutonomousConfig {
        &self.config
    }

    pub(crate) fn store(&self) -> &Arc<dyn ProvenanceStore> {
        &self.store
    }

    pub(crate) fn events(&self) -> &Arc<dyn EventBridge> {
        &self.events
    }

    /// Run one proposal through the gates, in order:
    ///
    /// enable flag, scope, validation, confidence, floor veto, reject
    /// floor, accept threshold, critique requirement, rate limits, and
    /// finally the commit itself. The first gate that resolves wins;
    /// later gates never run.
    #[instrument(skip_all, fields(correlation = %request.proposal.correlation_id))]
    pub async fn evaluate(&self, request: &EvaluationRequest) -> Result<Evaluation, EngineError> {
        // Gate 1: master switch.
        if !self.config.enabled {
            return Ok(Evaluation {
                decision: Decision::new(DecisionKind::Disabled, "autonomous commits disabled"),
                confidence: None,
                provenance: None,
            });
        }

        // Gate 2: entity-type scope. Violations always go to a human —
        // policy breaches are never silently discarded.
        if let Some(reason) = self.scope_violation(&request.proposal) {
            let decision = Decision::queued(reason, QueueReason::ScopeViolation);
            return self.queue(request, decision, None).await;
        }

        // Gate 3: upstream validation requirement.
        if self.config.scope.require_validation && !request.workflow.success {
            let decision = Decision::queued(
                "upstream validation did not succeed",
                QueueReason::ValidationFailed,
            );
            return self.queue(request, decision, None).await;
        }

        // Gate 4: confidence.
        let factors = match &request.factors {
            Some(snapshot) => snapshot.clone(),
            None => self.pipeline.gather(&self.evaluation_input(request)).await,
        };
        let confidence = self.model.calculate(&factors);
        let score = confidence.score;

        // Gate 5: floor veto. Overrides the score entirely.
        if confidence.has_floor_veto {
            let decision =
                Decision::queued(confidence.summary(), QueueReason::FloorVeto).with_score(score);
            return self.queue(request, decision, Some(confidence)).await;
        }

        let adjusted = self.adjuster.adjust(&self.config.thresholds).await?;
        let thresholds = adjusted.thresholds;

        // Gate 6: reject floor. No audit row, but the outcome feeds the
        // rejection-rate aggregates.
        if score < thresholds.auto_reject_below {
            self.store
                .record_auto_reject(&request.proposal.correlation_id)
                .await?;
            let reason = format!(
                "score {score:.2} below reject floor {:.2}",
                thresholds.auto_reject_below
            );
            info!(score, %reason, "proposal auto-rejected");
            return Ok(Evaluation {
                decision: Decision::new(DecisionKind::AutoReject, reason).with_score(score),
                confidence: Some(confidence),
                provenance: None,
            });
        }

        // Gate 7: accept threshold. Entity batches are held to the
        // stricter entity threshold; connection-only batches to the
        // connection threshold.
        let accept = if request.proposal.has_entities() {
            thresholds.auto_accept_entity
        } else {
            thresholds.auto_accept_connection
        };
        if score < accept {
            let decision = Decision::queued(
                format!("score {score:.2} below accept threshold {accept:.2}"),
                QueueReason::BelowThreshold,
            )
            .with_score(score);
            return self.queue(request, decision, Some(confidence)).await;
        }

        // Gate 8: critique requirement.
        if self.config.scope.require_critique
            && factors.get(FactorKind::CritiqueSurvival).is_none()
        {
            let decision = Decision::queued(
                "critique survival required but not measured",
                QueueReason::CritiqueMissing,
            )
            .with_score(score);
            return self.queue(request, decision, Some(confidence)).await;
        }

        // Gate 9: capacity.
        let capacity = self
            .limiter
            .can_commit(&self.config.limits, self.store.as_ref(), &request.proposal)
            .await?;
        if !capacity.allowed {
            let reason = capacity
                .reason
                .unwrap_or_else(|| "rate limit reached".to_string());
            info!(score, %reason, "proposal rate limited");
            return Ok(Evaluation {
                decision: Decision::new(DecisionKind::RateLimited, reason).with_score(score),
                confidence: Some(confidence),
                provenance: None,
            });
        }

        // Gate 10: commit.
        self.commit(request, confidence).await
    }

    /// Undo one committed batch: delete every target the commit created
    /// and mark the record `HumanReverted`.
    ///
    /// Idempotent at the outcome level — a record that is missing,
    /// already terminal, not revertable, or without a snapshot yields
    /// `Ok(false)` rather than an error. Adapter failures abort mid-way;
    /// deletion of creations is itself idempotent, so a retry converges.
    pub async fn revert(
        &self,
        id: &ProvenanceId,
        note: Option<String>,
    ) -> Result<bool, EngineError> {
        let entities = self
            .entity_adapter
            .as_ref()
            .ok_or(EngineError::AdapterMissing("entity delete adapter"))?;
        let connections = self
            .connection_adapter
            .as_ref()
            .ok_or(EngineError::AdapterMissing("connection delete adapter"))?;

        let Some(record) = self.store.get(id).await? else {
            return Ok(false);
        };
        if !record.can_revert
            || !record
                .review_status
                .can_transition_to(ReviewStatus::HumanReverted)
        {
            return Ok(false);
        }
        let Some(snapshot) = record.revert_snapshot else {
            warn!(provenance = %id, "revertable record has no snapshot");
            return Ok(false);
        };

        // Only creations are undone; `previous_state` restoration for
        // modified targets is not implemented in this version.
        for target in &snapshot.entities {
            if !target.existed_before {
                entities
                    .delete(&target.id)
                    .await
                    .map_err(EngineError::Adapter)?;
            }
        }
        for target in &snapshot.connections {
            if !target.existed_before {
                connections
                    .delete(&target.id)
                    .await
                    .map_err(EngineError::Adapter)?;
            }
        }

        self.store
            .update_review_status(id, ReviewStatus::HumanReverted, note)
            .await?;
        info!(provenance = %id, "committed batch reverted");
        Ok(true)
    }

    fn evaluation_input<'a>(&self, request: &'a EvaluationRequest) -> EvaluationInput<'a> {
        let mut input =
            EvaluationInput::new(&request.proposal, &request.workflow, request.source);
        input.critique_survival = request.critique_survival;
        input.invariance = request.invariance;
        input
    }

    /// First scope breach found, if any. Blocked types win over the
    /// allow-list so an explicit block cannot be undone by a wildcard.
    fn scope_violation(&self, proposal: &Proposal) -> Option<String> {
        for entity in &proposal.entities {
            if self
                .config
                .scope
                .blocked_entity_types
                .iter()
                .any(|t| t == &entity.entity_type)
            {
                return Some(format!("blocked type: {}", entity.entity_type));
            }
            if !self
                .config
                .scope
                .allowed_entity_types
                .admits(&entity.entity_type)
            {
                return Some(format!("type not in allow-list: {}", entity.entity_type));
            }
        }
        None
    }

    /// Write a `PendingReview` audit row for a queue decision and notify
    /// the bridge.
    async fn queue(
        &self,
        request: &EvaluationRequest,
        decision: Decision,
        confidence: Option<ConfidenceResult>,
    ) -> Result<Evaluation, EngineError> {
        let factors = confidence
            .as_ref()
            .map(|c| c.factors.clone())
            .unwrap_or_default();
        let record = AutoCommitProvenance {
            id: ProvenanceId::new(),
            target_type: target_type(&request.proposal),
            entity_ids: request.proposal.entities.iter().map(|e| e.id.clone()).collect(),
            connection_ids: request
                .proposal
                .connections
                .iter()
                .map(derived_connection_id)
                .collect(),
            source: request.source,
            correlation_id: request.proposal.correlation_id.clone(),
            confidence: decision.score.unwrap_or(0.0),
            critique_survival: factors.get(FactorKind::CritiqueSurvival),
            confidence_factors: factors,
            validations_passed: validations_passed(&request.workflow),
            created_at: Utc::now(),
            config_snapshot: self.config.clone(),
            review_status: ReviewStatus::PendingReview,
            queue_reason: decision.queue_reason,
            reviewed_at: None,
            review_note: None,
            can_revert: false,
            revert_snapshot: None,
        };
        self.store.record(record.clone()).await?;
        info!(
            provenance = %record.id,
            reason = %decision.reason,
            "proposal queued for review"
        );
        self.events.emit(ReviewEvent::Queued {
            provenance_id: record.id.clone(),
            reason: decision.reason.clone(),
        });
        Ok(Evaluation {
            decision,
            confidence,
            provenance: Some(record),
        })
    }

    /// Execute the commit and write the audit row.
    ///
    /// The executor runs first: if it fails, nothing is recorded and the
    /// rate limiter does not advance — a failed commit must not consume
    /// capacity or leave a phantom audit entry.
    async fn commit(
        &self,
        request: &EvaluationRequest,
        confidence: ConfidenceResult,
    ) -> Result<Evaluation, EngineError> {
        let executor = self
            .executor
            .as_ref()
            .ok_or(EngineError::AdapterMissing("commit executor"))?;

        let committed = executor
            .commit(&request.proposal)
            .await
            .map_err(EngineError::Executor)?;

        let snapshot = RevertSnapshot {
            entities: committed
                .entity_ids
                .iter()
                .cloned()
                .map(SnapshotTarget::created)
                .collect(),
            connections: committed
                .connection_ids
                .iter()
                .cloned()
                .map(SnapshotTarget::created)
                .collect(),
        };
        let score = confidence.score;
        let record = AutoCommitProvenance {
            id: ProvenanceId::new(),
            target_type: target_type(&request.proposal),
            entity_ids: committed.entity_ids,
            connection_ids: committed.connection_ids,
            source: request.source,
            correlation_id: request.proposal.correlation_id.clone(),
            confidence: score,
            critique_survival: confidence.factors.get(FactorKind::CritiqueSurvival),
            confidence_factors: confidence.factors.clone(),
            validations_passed: validations_passed(&request.workflow),
            created_at: Utc::now(),
            config_snapshot: self.config.clone(),
            review_status: ReviewStatus::AutoApproved,
            queue_reason: None,
            reviewed_at: None,
            review_note: None,
            can_revert: true,
            revert_snapshot: Some(snapshot),
        };
        self.store.record(record.clone()).await?;
        self.limiter.record_commit();
        info!(
            provenance = %record.id,
            score,
            targets = request.proposal.target_count(),
            "proposal auto-committed"
        );
        Ok(Evaluation {
            decision: Decision::new(DecisionKind::AutoCommit, format!("score {score:.2}"))
                .with_score(score),
            confidence: Some(confidence),
            provenance: Some(record),
        })
    }
}

fn target_type(proposal: &Proposal) -> TargetType {
    match (proposal.entities.is_empty(), proposal.connections.is_empty()) {
        (false, true) => TargetType::Entity,
        (true, false) => TargetType::Connection,
        _ => TargetType::Batch,
    }
}

/// Stable identifier for a proposed (not yet created) connection.
fn derived_connection_id(connection: &ProposedConnection) -> ConnectionId {
    ConnectionId(format!("{}->{}", connection.from.0, connection.to.0))
}

fn validations_passed(workflow: &WorkflowResult) -> Vec<String> {
    if !workflow.success {
        return Vec::new();
    }
    workflow.transitions.iter().map(|t| t.id.clone()).collect()
}
