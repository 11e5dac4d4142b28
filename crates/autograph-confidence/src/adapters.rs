use async_trait::async_trait;
use autograph_types::EntityId;

use crate::error::EvaluatorError;

/// Embedding backend consumed by the similarity and novelty evaluators.
///
/// Implementations may hit a remote model; every call is a suspension
/// point and may fail, in which case the factor is reported absent.
#[async_trait]
pub trait EmbeddingIndex: Send + Sync {
    /// Embed a piece of text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EvaluatorError>;

    /// Nearest stored neighbors of a vector: (entity, similarity in [0,1]).
    async fn nearest(
        &self,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<(EntityId, f64)>, EvaluatorError>;
}

/// Graph backend consumed by the coherence evaluator.
#[async_trait]
pub trait GraphNeighborhood: Send + Sync {
    /// Whether an entity already exists in the graph.
    async fn contains(&self, id: &EntityId) -> Result<bool, EvaluatorError>;

    /// Direct neighbors of an entity. Empty for unknown entities.
    async fn neighbors(&self, id: &EntityId) -> Result<Vec<EntityId>, EvaluatorError>;
}
