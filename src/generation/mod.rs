//! Generating artifacts through an external text generator.
//!
//! The generator is untrusted: its output is parsed, checked against the
//! stage schema and then against the stage's business rules, and regenerated
//! with corrective feedback until it passes or the attempt budget runs out.

pub mod client;
pub mod orchestrator;
pub mod parse;
pub mod progress;
pub mod prompt;
pub mod runner;
pub mod stage;

pub use client::{GenerationRequest, ScriptedGenerator, TextGenerator};
pub use orchestrator::{AttemptFailure, AttemptRecord, Diagnostics, Orchestrator, StageOutcome};
pub use parse::{parse_output, strip_code_fence};
pub use progress::{EventCallback, EventLog, OrchestratorState, StageEvent};
pub use runner::{
    assemble_portfolio, run_portfolio, run_stage, run_tool, StageArtifact, ToolRun, UpstreamArtifacts,
};
pub use stage::{Stage, StageDescriptor, StageRegistry};
