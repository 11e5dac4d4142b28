use async_trait::async_trait;
use autograph_types::FactorKind;

use super::{EvaluationInput, FactorEvaluator};
use crate::error::EvaluatorError;

/// Passes through the critique-survival signal from the adversarial
/// critique pass, when one ran. No critique pass means absent — the
/// upstream AI call timing out must never read as a zero survival rate.
#[derive(Clone, Copy, Debug, Default)]
pub struct CritiqueSurvivalEvaluator;

#[async_trait]
impl FactorEvaluator for CritiqueSurvivalEvaluator {
    fn kind(&self) -> FactorKind {
        FactorKind::CritiqueSurvival
    }

    async fn evaluate(
        &self,
        input: &EvaluationInput<'_>,
    ) -> Result<Option<f64>, EvaluatorError> {
        Ok(input.critique_survival.map(|s| s.clamp(0.0, 1.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autograph_types::{CorrelationId, Proposal, ProvenanceSource, WorkflowResult};

    #[tokio::test]
    async fn no_critique_pass_is_absent() {
        let proposal = Proposal::new(CorrelationId::new());
        let workflow = WorkflowResult::succeeded();
        let input = EvaluationInput::new(&proposal, &workflow, ProvenanceSource::Api);
        let score = CritiqueSurvivalEvaluator.evaluate(&input).await.unwrap();
        assert!(score.is_none());
    }

    #[tokio::test]
    async fn survival_signal_passes_through() {
        let proposal = Proposal::new(CorrelationId::new());
        let workflow = WorkflowResult::succeeded();
        let input = EvaluationInput::new(&proposal, &workflow, ProvenanceSource::Api)
            .with_critique_survival(0.75);
        let score = CritiqueSurvivalEvaluator.evaluate(&input).await.unwrap();
        assert_eq!(score, Some(0.75));
    }
}
