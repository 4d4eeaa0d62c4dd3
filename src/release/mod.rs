//! Release orchestration: pipeline phases, run context and the orchestrator.

mod context;
mod orchestrator;
mod phase;

pub use context::{ReleaseContext, ReleaseFailure, ReleaseOutcome, ReleaseSummary};
pub use orchestrator::ReleaseOrchestrator;
pub use phase::ReleasePhase;
