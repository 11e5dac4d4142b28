use async_trait::async_trait;
use autograph_types::FactorKind;

use super::{EvaluationInput, FactorEvaluator};
use crate::error::EvaluatorError;

/// Scores how unambiguous the extraction itself was.
///
/// Base signal is the mean per-creation AI confidence; unlabeled
/// entities and untyped relations each shave a fixed penalty, since they
/// indicate the extractor was guessing at structure.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExtractionClarityEvaluator;

const PENALTY_PER_GAP: f64 = 0.1;

#[async_trait]
impl FactorEvaluator for ExtractionClarityEvaluator {
    fn kind(&self) -> FactorKind {
        FactorKind::ExtractionClarity
    }

    async fn evaluate(
        &self,
        input: &EvaluationInput<'_>,
    ) -> Result<Option<f64>, EvaluatorError> {
        let Some(base) = input.proposal.mean_ai_confidence() else {
            // Empty batch: clarity is untestable, not zero.
            return Ok(None);
        };

        let gaps = input
            .proposal
            .entities
            .iter()
            .filter(|e| e.label.trim().is_empty() || e.entity_type.trim().is_empty())
            .count()
            + input
                .proposal
                .connections
                .iter()
                .filter(|c| c.relation.trim().is_empty())
                .count();

        let score = (base - gaps as f64 * PENALTY_PER_GAP).clamp(0.0, 1.0);
        Ok(Some(score))
    }
}
