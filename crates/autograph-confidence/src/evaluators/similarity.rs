use std::sync::Arc;

use async_trait::async_trait;
use autograph_types::FactorKind;

use super::{EvaluationInput, FactorEvaluator};
use crate::adapters::EmbeddingIndex;
use crate::error::EvaluatorError;

const NEIGHBOR_K: usize = 5;

/// Scores how close proposed content sits to what the graph already
/// holds, via the embedding index. High similarity supports the
/// proposal (it fits the corpus); the inverse signal is novelty.
pub struct EmbeddingSimilarityEvaluator {
    index: Arc<dyn EmbeddingIndex>,
}

impl EmbeddingSimilarityEvaluator {
    pub fn new(index: Arc<dyn EmbeddingIndex>) -> Self {
        Self { index }
    }
}

/// Mean over entities of the best stored-neighbor similarity.
/// Returns `None` when the batch has no entities or the index has no
/// neighbors to offer.
pub(super) async fn best_neighbor_similarity(
    index: &dyn EmbeddingIndex,
    input: &EvaluationInput<'_>,
) -> Result<Option<f64>, EvaluatorError> {
    let mut best_per_entity = Vec::new();
    for entity in &input.proposal.entities {
        let vector = index.embed(&entity.label).await?;
        let neighbors = index.nearest(&vector, NEIGHBOR_K).await?;
        if let Some(best) = neighbors
            .iter()
            .map(|(_, sim)| *sim)
            .fold(None::<f64>, |acc, s| Some(acc.map_or(s, |a| a.max(s))))
        {
            best_per_entity.push(best);
        }
    }

    if best_per_entity.is_empty() {
        return Ok(None);
    }
    Ok(Some(
        best_per_entity.iter().sum::<f64>() / best_per_entity.len() as f64,
    ))
}

#[async_trait]
impl FactorEvaluator for EmbeddingSimilarityEvaluator {
    fn kind(&self) -> FactorKind {
        FactorKind::EmbeddingSimilarity
    }

    async fn evaluate(
        &self,
        input: &EvaluationInput<'_>,
    ) -> Result<Option<f64>, EvaluatorError> {
        best_neighbor_similarity(self.index.as_ref(), input).await
    }
}
