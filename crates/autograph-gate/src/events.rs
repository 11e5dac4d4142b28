use autograph_types::{ProvenanceId, ReviewStatus};

/// Notifications emitted around the review queue.
#[derive(Clone, Debug, PartialEq)]
pub enum ReviewEvent {
    /// An item entered the review queue.
    Queued {
        provenance_id: ProvenanceId,
        reason: String,
    },
    /// A human decided one item.
    Decided {
        provenance_id: ProvenanceId,
        status: ReviewStatus,
    },
    /// A bulk action finished; one notification for the whole batch.
    BatchDecided {
        approved: usize,
        rejected: usize,
        failed: usize,
    },
}

/// Fire-and-forget notification sink.
///
/// Implementations must not block: decision logic never waits on the
/// bridge, and a lost notification is acceptable where a stalled
/// decision is not.
pub trait EventBridge: Send + Sync {
    fn emit(&self, event: ReviewEvent);
}

/// Discards every event. The default when no bridge is wired.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEventBridge;

impl EventBridge for NullEventBridge {
    fn emit(&self, _event: ReviewEvent) {}
}
