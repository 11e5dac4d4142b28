use async_trait::async_trait;
use autograph_types::{ConnectionId, EntityId, Proposal};

/// Identifiers of everything a commit actually created.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommittedIds {
    pub entity_ids: Vec<EntityId>,
    pub connection_ids: Vec<ConnectionId>,
}

/// The caller-supplied commit function. Performs the actual graph
/// mutation — which is outside this crate's responsibility — and
/// reports what it created. Errors are foreign by design, hence
/// `anyhow`.
#[async_trait]
pub trait CommitExecutor: Send + Sync {
    async fn commit(&self, proposal: &Proposal) -> anyhow::Result<CommittedIds>;
}

/// Entity-side delete adapter, used only during revert.
#[async_trait]
pub trait EntityAdapter: Send + Sync {
    async fn delete(&self, id: &EntityId) -> anyhow::Result<()>;
}

/// Connection-side delete adapter, used only during revert.
#[async_trait]
pub trait ConnectionAdapter: Send + Sync {
    async fn delete(&self, id: &ConnectionId) -> anyhow::Result<()>;
}
