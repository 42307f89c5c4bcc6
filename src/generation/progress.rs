//! Observable progress of a stage run.

use crate::core::types::StageId;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Where the orchestrator is within one stage run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrchestratorState {
    Idle,
    Requesting,
    Parsing,
    SchemaValidating,
    BusinessValidating,
    Retrying,
    Accepted,
    ExhaustedFailure,
}

impl OrchestratorState {
    /// Whether the run has finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrchestratorState::Accepted | OrchestratorState::ExhaustedFailure)
    }
}

impl fmt::Display for OrchestratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A progress event emitted while a stage runs.
#[derive(Debug, Clone, PartialEq)]
pub enum StageEvent {
    /// The orchestrator entered a new state.
    Transition {
        stage: StageId,
        attempt: u32,
        state: OrchestratorState,
    },
    /// An attempt produced an invalid candidate.
    AttemptRejected {
        stage: StageId,
        attempt: u32,
        reason: String,
    },
    /// A candidate was accepted.
    Accepted { stage: StageId, attempt: u32 },
    /// The attempt budget ran out.
    Exhausted { stage: StageId, attempts: u32 },
    /// The generator call failed and the run was aborted.
    Aborted { stage: StageId, attempt: u32, message: String },
}

/// Callback type for stage events.
pub type EventCallback = Arc<dyn Fn(&StageEvent) + Send + Sync>;

/// Collects events from any number of runs.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<StageEvent>>,
}

impl EventLog {
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A callback that appends to this log.
    pub fn callback(self: &Arc<Self>) -> EventCallback {
        let log = Arc::clone(self);
        Arc::new(move |event: &StageEvent| log.events.lock().push(event.clone()))
    }

    pub fn events(&self) -> Vec<StageEvent> {
        self.events.lock().clone()
    }

    /// States visited by one stage, in order.
    pub fn states(&self, stage: StageId) -> Vec<OrchestratorState> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                StageEvent::Transition { stage: s, state, .. } if *s == stage => Some(*state),
                _ => None,
            })
            .collect()
    }
}
