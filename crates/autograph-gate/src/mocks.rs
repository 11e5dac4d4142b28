//! Test doubles for the engine's wiring seams. Shipped in the library
//! (not behind `cfg(test)`) so downstream crates can exercise the engine
//! without a real graph backend.

use std::sync::Mutex;

use async_trait::async_trait;
use anyhow::anyhow;
use autograph_types::{ConnectionId, EntityId, Proposal};

use crate::events::{EventBridge, ReviewEvent};
use crate::executor::{CommitExecutor, CommittedIds, ConnectionAdapter, EntityAdapter};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Executor that "creates" exactly what the proposal names, or fails
/// with a configured message.
#[derive(Debug, Default)]
pub struct MockCommitExecutor {
    failure: Option<String>,
    committed: Mutex<Vec<Proposal>>,
}

impl MockCommitExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            committed: Mutex::new(Vec::new()),
        }
    }

    /// Every proposal committed so far, in order.
    pub fn committed(&self) -> Vec<Proposal> {
        lock(&self.committed).clone()
    }
}

#[async_trait]
impl CommitExecutor for MockCommitExecutor {
    async fn commit(&self, proposal: &Proposal) -> anyhow::Result<CommittedIds> {
        if let Some(message) = &self.failure {
            return Err(anyhow!("{message}"));
        }
        lock(&self.committed).push(proposal.clone());
        Ok(CommittedIds {
            entity_ids: proposal.entities.iter().map(|e| e.id.clone()).collect(),
            connection_ids: proposal
                .connections
                .iter()
                .map(|c| ConnectionId(format!("{}->{}", c.from.0, c.to.0)))
                .collect(),
        })
    }
}

/// Records entity deletions.
#[derive(Debug, Default)]
pub struct MockEntityAdapter {
    deleted: Mutex<Vec<EntityId>>,
}

impl MockEntityAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deleted(&self) -> Vec<EntityId> {
        lock(&self.deleted).clone()
    }
}

#[async_trait]
impl EntityAdapter for MockEntityAdapter {
    async fn delete(&self, id: &EntityId) -> anyhow::Result<()> {
        lock(&self.deleted).push(id.clone());
        Ok(())
    }
}

/// Records connection deletions.
#[derive(Debug, Default)]
pub struct MockConnectionAdapter {
    deleted: Mutex<Vec<ConnectionId>>,
}

impl MockConnectionAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deleted(&self) -> Vec<ConnectionId> {
        lock(&self.deleted).clone()
    }
}

#[async_trait]
impl ConnectionAdapter for MockConnectionAdapter {
    async fn delete(&self, id: &ConnectionId) -> anyhow::Result<()> {
        lock(&self.deleted).push(id.clone());
        Ok(())
    }
}

/// Event bridge that remembers everything it was handed.
#[derive(Debug, Default)]
pub struct RecordingEventBridge {
    events: Mutex<Vec<ReviewEvent>>,
}

impl RecordingEventBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReviewEvent> {
        lock(&self.events).clone()
    }
}

impl EventBridge for RecordingEventBridge {
    fn emit(&self, event: ReviewEvent) {
        lock(&self.events).push(event);
    }
}
