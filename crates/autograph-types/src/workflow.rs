use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One transition taken by the upstream validation workflow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowTransition {
    /// Transition identifier (e.g. "extract -> validate").
    pub id: String,
    /// Human-readable reason the transition fired.
    pub reason: String,
    /// How long the workflow spent in the source state.
    pub duration: Duration,
}

/// Outcome of upstream proposal validation. Read-only input to the
/// commit engine — produced and owned by the workflow state machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub success: bool,
    /// Ordered transition history, oldest first.
    pub transitions: Vec<WorkflowTransition>,
}

impl WorkflowResult {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            transitions: Vec::new(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            transitions: vec![WorkflowTransition {
                id: "validate -> failed".into(),
                reason: reason.into(),
                duration: Duration::ZERO,
            }],
        }
    }

    pub fn with_transition(mut self, transition: WorkflowTransition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Number of retry transitions taken before the terminal state.
    /// Used by the validation-outcome evaluator as a damping signal.
    pub fn retry_count(&self) -> usize {
        self.transitions
            .iter()
            .filter(|t| t.id.contains("retry"))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_result_carries_reason() {
        let result = WorkflowResult::failed("schema mismatch");
        assert!(!result.success);
        assert_eq!(result.transitions.len(), 1);
        assert_eq!(result.transitions[0].reason, "schema mismatch");
    }

    #[test]
    fn retry_count_filters_transition_ids() {
        let result = WorkflowResult::succeeded()
            .with_transition(WorkflowTransition {
                id: "validate -> retry".into(),
                reason: "transient".into(),
                duration: Duration::from_millis(10),
            })
            .with_transition(WorkflowTransition {
                id: "retry -> validated".into(),
                reason: "ok".into(),
                duration: Duration::from_millis(5),
            });
        assert_eq!(result.retry_count(), 2);
    }
}
