//! AutoVid Session Layer
//!
//! Session-scoped orchestration on top of the HTTP client:
//! - `ScriptOrchestrator`: two-phase interactive script workflow as an
//!   explicit state machine with single-flight and stale-response guards
//! - `PipelineRunner`: cancellable full pipeline runs with a progress
//!   event subscription and a per-job stage query
//! - `LibrarySync`: wholesale-replacement snapshot cache of the library
//!
//! All session state is owned by its orchestrator instance; it is guarded
//! by sync mutexes that are never held across an await point. Ordering is
//! guaranteed by single-flight rejection plus a request epoch counter that
//! discards superseded responses.

mod library;
mod pipeline;
mod script;

pub use library::LibrarySync;
pub use pipeline::{PipelineRunner, RunEvent, RunHandle};
pub use script::{ScriptOrchestrator, ScriptPhase};
