use async_trait::async_trait;
use autograph_types::{FactorKind, ProvenanceSource};

use super::{EvaluationInput, FactorEvaluator};
use crate::error::EvaluatorError;

/// Scores how much the extraction source itself is trusted.
///
/// Manual input is near-authoritative; free-form chat extraction is the
/// least trusted because the model both reads and invents there.
#[derive(Clone, Copy, Debug, Default)]
pub struct SourceTrustEvaluator;

impl SourceTrustEvaluator {
    fn trust(source: ProvenanceSource) -> f64 {
        match source {
            ProvenanceSource::Manual => 0.95,
            ProvenanceSource::DocumentImport => 0.85,
            ProvenanceSource::Api => 0.80,
            ProvenanceSource::ChatExtraction => 0.70,
        }
    }
}

#[async_trait]
impl FactorEvaluator for SourceTrustEvaluator {
    fn kind(&self) -> FactorKind {
        FactorKind::SourceTrust
    }

    async fn evaluate(
        &self,
        input: &EvaluationInput<'_>,
    ) -> Result<Option<f64>, EvaluatorError> {
        Ok(Some(Self::trust(input.source)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autograph_types::{CorrelationId, Proposal, WorkflowResult};

    #[tokio::test]
    async fn manual_outranks_chat_extraction() {
        let proposal = Proposal::new(CorrelationId::new());
        let workflow = WorkflowResult::succeeded();

        let manual = EvaluationInput::new(&proposal, &workflow, ProvenanceSource::Manual);
        let chat = EvaluationInput::new(&proposal, &workflow, ProvenanceSource::ChatExtraction);

        let evaluator = SourceTrustEvaluator;
        let manual_score = evaluator.evaluate(&manual).await.unwrap().unwrap();
        let chat_score = evaluator.evaluate(&chat).await.unwrap().unwrap();
        assert!(manual_score > chat_score);
    }
}
