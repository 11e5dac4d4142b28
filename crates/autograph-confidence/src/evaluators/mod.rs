//! Independent factor evaluators, one per confidence dimension.
//!
//! Every evaluator returns `Ok(Some(score))` for a tested dimension,
//! `Ok(None)` when the dimension cannot be assessed with the inputs at
//! hand, and `Err` only for adapter failures — which the pipeline maps
//! back to absent.

mod clarity;
mod coherence;
mod critique;
mod invariance;
mod novelty;
mod self_report;
mod similarity;
mod source_trust;
mod validation;

pub use clarity::ExtractionClarityEvaluator;
pub use coherence::{CoherenceStrategy, GraphCoherenceEvaluator, NeighborhoodCoherence};
pub use critique::CritiqueSurvivalEvaluator;
pub use invariance::StructuralInvarianceEvaluator;
pub use novelty::NoveltyEvaluator;
pub use self_report::AiSelfReportEvaluator;
pub use similarity::EmbeddingSimilarityEvaluator;
pub use source_trust::SourceTrustEvaluator;
pub use validation::ValidationOutcomeEvaluator;

use async_trait::async_trait;
use autograph_types::{FactorKind, Proposal, ProvenanceSource, WorkflowResult};

use crate::error::EvaluatorError;

/// Everything an evaluator may look at for one proposal.
#[derive(Clone, Debug)]
pub struct EvaluationInput<'a> {
    pub proposal: &'a Proposal,
    pub workflow: &'a WorkflowResult,
    pub source: ProvenanceSource,
    /// Fraction of adversarial critiques survived, when a critique pass ran.
    pub critique_survival: Option<f64>,
    /// Structural agreement across re-extractions, when measured.
    pub invariance: Option<f64>,
}

impl<'a> EvaluationInput<'a> {
    pub fn new(
        proposal: &'a Proposal,
        workflow: &'a WorkflowResult,
        source: ProvenanceSource,
    ) -> Self {
        Self {
            proposal,
            workflow,
            source,
            critique_survival: None,
            invariance: None,
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
}

/// One independent scorer for one confidence dimension.
#[async_trait]
pub trait FactorEvaluator: Send + Sync {
    fn kind(&self) -> FactorKind;

    /// Score the dimension in [0,1], or report it as not yet tested.
    async fn evaluate(&self, input: &EvaluationInput<'_>)
        -> Result<Option<f64>, EvaluatorError>;
}
