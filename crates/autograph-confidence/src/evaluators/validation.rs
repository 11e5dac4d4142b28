use async_trait::async_trait;
use autograph_types::FactorKind;

use super::{EvaluationInput, FactorEvaluator};
use crate::error::EvaluatorError;

/// Scores the upstream validation outcome.
///
/// A clean success scores 1.0; every retry the workflow needed to get
/// there damps the score, floored at 0.5 (it did succeed). Outright
/// failure scores 0.0 — the dimension *was* tested and the test failed,
/// which is distinct from absent.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValidationOutcomeEvaluator;

const RETRY_PENALTY: f64 = 0.1;

#[async_trait]
impl FactorEvaluator for ValidationOutcomeEvaluator {
    fn kind(&self) -> FactorKind {
        FactorKind::ValidationOutcome
    }

    async fn evaluate(
        &self,
        input: &EvaluationInput<'_>,
    ) -> Result<Option<f64>, EvaluatorError> {
        if !input.workflow.success {
            return Ok(Some(0.0));
        }
        let damped = 1.0 - input.workflow.retry_count() as f64 * RETRY_PENALTY;
        Ok(Some(damped.max(0.5)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autograph_types::{
        CorrelationId, Proposal, ProvenanceSource, WorkflowResult, WorkflowTransition,
    };
    use std::time::Duration;

    #[tokio::test]
    async fn clean_success_scores_one() {
        let proposal = Proposal::new(CorrelationId::new());
        let workflow = WorkflowResult::succeeded();
        let input = EvaluationInput::new(&proposal, &workflow, ProvenanceSource::Api);
        let score = ValidationOutcomeEvaluator
            .evaluate(&input)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(score, 1.0);
    }

    #[tokio::test]
    async fn retries_damp_but_never_below_half() {
        let proposal = Proposal::new(CorrelationId::new());
        let mut workflow = WorkflowResult::succeeded();
        for i in 0..8 {
            workflow = workflow.with_transition(WorkflowTransition {
                id: format!("validate -> retry#{i}"),
                reason: "transient".into(),
                duration: Duration::from_millis(5),
            });
        }
        let input = EvaluationInput::new(&proposal, &workflow, ProvenanceSource::Api);
        let score = ValidationOutcomeEvaluator
            .evaluate(&input)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(score, 0.5);
    }

    #[tokio::test]
    async fn failure_is_zero_not_absent() {
        let proposal = Proposal::new(CorrelationId::new());
        let workflow = WorkflowResult::failed("schema mismatch");
        let input = EvaluationInput::new(&proposal, &workflow, ProvenanceSource::Api);
        let score = ValidationOutcomeEvaluator.evaluate(&input).await.unwrap();
        assert_eq!(score, Some(0.0));
    }
}
