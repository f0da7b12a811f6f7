//! Interactive script orchestrator
//!
//! Drives the two-phase script workflow: generate an editable prompt for a
//! niche, let the user edit it, then run the scriptwriter. The workflow is
//! one explicit state machine value instead of scattered loading/error
//! flags, with two ordering guards:
//!
//! - single-flight: a new request is rejected while one is in flight
//! - epoch guard: `cancel` bumps the request epoch, so a superseded
//!   response is discarded instead of overwriting current state with
//!   stale data

use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use autovid_client::api::GenerationApi;
use autovid_client::error::{ClientError, Result};
use autovid_core::domain::script::{Idea, Script};

/// Phase of the interactive script workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptPhase {
    Idle,
    PromptRequested,
    PromptReady,
    ScriptRequested,
    ScriptReady,
}

impl ScriptPhase {
    fn is_requesting(&self) -> bool {
        matches!(self, ScriptPhase::PromptRequested | ScriptPhase::ScriptRequested)
    }
}

struct ScriptState {
    phase: ScriptPhase,
    /// Phase to restore when the in-flight request fails or is cancelled
    resume: ScriptPhase,
    /// Monotonically increasing request epoch; responses from an older
    /// epoch are discarded
    epoch: u64,
    idea: Option<Idea>,
    prompt: Option<String>,
    script: Option<Script>,
    diagnostic: Option<String>,
}

/// Session-scoped orchestrator for the interactive script workflow
///
/// State is owned exclusively by this instance and guarded by a sync
/// mutex that is never held across an await point.
pub struct ScriptOrchestrator {
    api: Arc<dyn GenerationApi>,
    state: Mutex<ScriptState>,
}

/// Restores the pre-request phase if a request future is dropped at its
/// await point, so an abandoned request cannot leave the orchestrator
/// rejecting everything as busy. A no-op once the response has been
/// applied (the phase left its requesting state) or the request was
/// cancelled (the epoch advanced).
struct PhaseGuard<'a> {
    state: &'a Mutex<ScriptState>,
    epoch: u64,
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap();
        if state.epoch == self.epoch && state.phase.is_requesting() {
            state.phase = state.resume;
        }
    }
}

impl ScriptOrchestrator {
    /// Creates an orchestrator in the Idle phase
    pub fn new(api: Arc<dyn GenerationApi>) -> Self {
        Self {
            api,
            state: Mutex::new(ScriptState {
                phase: ScriptPhase::Idle,
                resume: ScriptPhase::Idle,
                epoch: 0,
                idea: None,
                prompt: None,
                script: None,
                diagnostic: None,
            }),
        }
    }

    /// Generate a prompt draft for a niche
    ///
    /// Validates the niche locally, then issues the prompt request. On
    /// success the returned draft (and the service's idea seed) are stored
    /// and the phase becomes PromptReady; on failure the phase preceding
    /// the request is restored and a diagnostic is recorded.
    ///
    /// # Errors
    /// * `Validation` if the niche is empty (no request is issued)
    /// * `Busy` if another request is already in flight on this instance
    /// * `Cancelled` if the request was superseded before its response
    pub async fn generate_prompt(&self, niche: &str) -> Result<String> {
        let niche = niche.trim();
        if niche.is_empty() {
            return Err(ClientError::Validation(
                "niche must not be empty".to_string(),
            ));
        }

        let epoch = {
            let mut state = self.state.lock().unwrap();
            if state.phase.is_requesting() {
                return Err(ClientError::Busy("a script request is already in flight"));
            }
            state.epoch += 1;
            state.resume = state.phase;
            state.phase = ScriptPhase::PromptRequested;
            state.diagnostic = None;
            state.epoch
        };

        let _guard = PhaseGuard {
            state: &self.state,
            epoch,
        };
        debug!(niche, epoch, "requesting script prompt");
        let result = self.api.generate_prompt(niche).await;

        let mut state = self.state.lock().unwrap();
        if state.epoch != epoch {
            warn!(epoch, "discarding stale prompt response");
            return Err(ClientError::Cancelled("prompt request superseded"));
        }

        match result {
            Ok(response) => {
                state.idea = Some(response.idea);
                state.prompt = Some(response.prompt.clone());
                state.script = None;
                state.phase = ScriptPhase::PromptReady;
                Ok(response.prompt)
            }
            Err(e) => {
                state.diagnostic = Some(e.to_string());
                state.phase = state.resume;
                Err(e)
            }
        }
    }

    /// Replace the prompt draft with an edited version
    ///
    /// Pure local mutation, permitted only while a prompt is ready.
    pub fn set_prompt(&self, prompt: impl Into<String>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.phase != ScriptPhase::PromptReady {
            return Err(ClientError::Validation(
                "no prompt draft to edit; generate the prompt first".to_string(),
            ));
        }
        state.prompt = Some(prompt.into());
        Ok(())
    }

    /// Run the scriptwriter with the stored idea and prompt draft
    ///
    /// Requires a prior successful `generate_prompt`; checked before any
    /// network call. On success the script is stored and the phase becomes
    /// ScriptReady; on failure the phase preceding the request is restored
    /// and a diagnostic is recorded.
    pub async fn run_script(&self) -> Result<Script> {
        let (idea, prompt, epoch) = {
            let mut state = self.state.lock().unwrap();
            if state.phase.is_requesting() {
                return Err(ClientError::Busy("a script request is already in flight"));
            }
            let Some(idea) = state.idea.clone() else {
                return Err(ClientError::Validation(
                    "no idea available; generate the prompt first".to_string(),
                ));
            };
            let prompt = state.prompt.clone().unwrap_or_default();
            state.epoch += 1;
            state.resume = state.phase;
            state.phase = ScriptPhase::ScriptRequested;
            state.diagnostic = None;
            (idea, prompt, state.epoch)
        };

        let _guard = PhaseGuard {
            state: &self.state,
            epoch,
        };
        debug!(epoch, "requesting script run");
        let result = self.api.run_script(&idea, &prompt).await;

        let mut state = self.state.lock().unwrap();
        if state.epoch != epoch {
            warn!(epoch, "discarding stale script response");
            return Err(ClientError::Cancelled("script request superseded"));
        }

        match result {
            Ok(script) => {
                state.script = Some(script.clone());
                state.phase = ScriptPhase::ScriptReady;
                Ok(script)
            }
            Err(e) => {
                state.diagnostic = Some(e.to_string());
                state.phase = state.resume;
                Err(e)
            }
        }
    }

    /// Cancel the in-flight request, if any
    ///
    /// Bumps the request epoch so the superseded response is discarded on
    /// arrival, and restores the phase preceding the request.
    pub fn cancel(&self) {
        let mut state = self.state.lock().unwrap();
        if state.phase.is_requesting() {
            state.epoch += 1;
            state.phase = state.resume;
            debug!(epoch = state.epoch, "cancelled in-flight script request");
        }
    }

    /// Current workflow phase
    pub fn phase(&self) -> ScriptPhase {
        self.state.lock().unwrap().phase
    }

    /// Current prompt draft, if one is stored
    pub fn prompt(&self) -> Option<String> {
        self.state.lock().unwrap().prompt.clone()
    }

    /// Stored idea seed, if the prompt phase succeeded
    pub fn idea(&self) -> Option<Idea> {
        self.state.lock().unwrap().idea.clone()
    }

    /// Generated script, if the script phase succeeded
    pub fn script(&self) -> Option<Script> {
        self.state.lock().unwrap().script.clone()
    }

    /// Diagnostic message from the most recent failed request
    pub fn diagnostic(&self) -> Option<String> {
        self.state.lock().unwrap().diagnostic.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockApi, sample_prompt_response, sample_script};

    #[tokio::test]
    async fn test_empty_niche_rejected_without_network_call() {
        let api = MockApi::new();
        let orchestrator = ScriptOrchestrator::new(api.clone());

        let err = orchestrator.generate_prompt("   ").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(api.call_count(), 0);
        assert_eq!(orchestrator.phase(), ScriptPhase::Idle);
    }

    #[tokio::test]
    async fn test_prompt_happy_path() {
        let api = MockApi::new();
        api.prompts
            .lock()
            .unwrap()
            .push_back(Ok(sample_prompt_response()));
        let orchestrator = ScriptOrchestrator::new(api.clone());

        let draft = orchestrator.generate_prompt("Stoicism").await.unwrap();
        assert_eq!(draft, "Write a 5-scene script about Stoicism.");
        assert_eq!(orchestrator.phase(), ScriptPhase::PromptReady);
        assert!(orchestrator.idea().is_some());
        assert!(orchestrator.diagnostic().is_none());
    }

    #[tokio::test]
    async fn test_prompt_failure_restores_idle_with_diagnostic() {
        let api = MockApi::new();
        api.prompts.lock().unwrap().push_back(Err(500));
        let orchestrator = ScriptOrchestrator::new(api.clone());

        let err = orchestrator.generate_prompt("Stoicism").await.unwrap_err();
        assert!(err.is_server_error());
        assert_eq!(orchestrator.phase(), ScriptPhase::Idle);
        assert!(orchestrator.diagnostic().unwrap().contains("500"));
        assert!(orchestrator.idea().is_none());
    }

    #[tokio::test]
    async fn test_overlapping_requests_rejected() {
        let api = MockApi::new();
        api.prompts
            .lock()
            .unwrap()
            .push_back(Ok(sample_prompt_response()));
        let gate = api.hold_replies();
        let orchestrator = Arc::new(ScriptOrchestrator::new(api.clone()));

        let first = {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move { orchestrator.generate_prompt("Stoicism").await })
        };
        // Let the first request reach the (held) service
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        let second = orchestrator.generate_prompt("Stoicism").await;
        assert!(matches!(second, Err(ClientError::Busy(_))));
        let third = orchestrator.run_script().await;
        assert!(matches!(third, Err(ClientError::Busy(_))));

        gate.add_permits(1);
        assert!(first.await.unwrap().is_ok());
        assert_eq!(orchestrator.phase(), ScriptPhase::PromptReady);
        // Only the first request hit the service
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_run_script_without_idea_rejected() {
        let api = MockApi::new();
        let orchestrator = ScriptOrchestrator::new(api.clone());

        let err = orchestrator.run_script().await.unwrap_err();
        match err {
            ClientError::Validation(message) => {
                assert!(message.contains("no idea available"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(api.call_count(), 0);
        assert!(orchestrator.script().is_none());
    }

    #[tokio::test]
    async fn test_full_workflow_with_prompt_edit() {
        let api = MockApi::new();
        api.prompts
            .lock()
            .unwrap()
            .push_back(Ok(sample_prompt_response()));
        api.scripts.lock().unwrap().push_back(Ok(sample_script()));
        let orchestrator = ScriptOrchestrator::new(api.clone());

        orchestrator.generate_prompt("Stoicism").await.unwrap();
        orchestrator
            .set_prompt("Make it about morning routines instead.")
            .unwrap();
        assert_eq!(
            orchestrator.prompt().as_deref(),
            Some("Make it about morning routines instead.")
        );

        let script = orchestrator.run_script().await.unwrap();
        assert_eq!(script.scenes.len(), 1);
        assert_eq!(orchestrator.phase(), ScriptPhase::ScriptReady);
    }

    #[tokio::test]
    async fn test_script_failure_returns_to_prompt_ready() {
        let api = MockApi::new();
        api.prompts
            .lock()
            .unwrap()
            .push_back(Ok(sample_prompt_response()));
        api.scripts.lock().unwrap().push_back(Err(502));
        let orchestrator = ScriptOrchestrator::new(api.clone());

        orchestrator.generate_prompt("Stoicism").await.unwrap();
        let err = orchestrator.run_script().await.unwrap_err();
        assert!(err.is_server_error());
        assert_eq!(orchestrator.phase(), ScriptPhase::PromptReady);
        assert!(orchestrator.script().is_none());
        assert!(orchestrator.diagnostic().is_some());
    }

    #[tokio::test]
    async fn test_cancel_discards_stale_response() {
        let api = MockApi::new();
        api.prompts
            .lock()
            .unwrap()
            .push_back(Ok(sample_prompt_response()));
        let gate = api.hold_replies();
        let orchestrator = Arc::new(ScriptOrchestrator::new(api.clone()));

        let task = {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move { orchestrator.generate_prompt("Stoicism").await })
        };
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        orchestrator.cancel();
        assert_eq!(orchestrator.phase(), ScriptPhase::Idle);

        gate.add_permits(1);
        let result = task.await.unwrap();
        assert!(matches!(result, Err(ClientError::Cancelled(_))));
        // The stale response did not overwrite state
        assert!(orchestrator.idea().is_none());
        assert!(orchestrator.prompt().is_none());
    }

    #[tokio::test]
    async fn test_abandoned_request_restores_phase() {
        let api = MockApi::new();
        api.prompts
            .lock()
            .unwrap()
            .push_back(Ok(sample_prompt_response()));
        let gate = api.hold_replies();
        let orchestrator = Arc::new(ScriptOrchestrator::new(api.clone()));

        // A prompt request is parked at the gate, then its future is
        // dropped mid-flight (the caller navigated away)
        let abandoned = {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move { orchestrator.generate_prompt("Stoicism").await })
        };
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert_eq!(orchestrator.phase(), ScriptPhase::PromptRequested);

        abandoned.abort();
        let _ = abandoned.await;
        assert_eq!(orchestrator.phase(), ScriptPhase::Idle);

        // The orchestrator recovered without an explicit cancel; a new
        // request is accepted, not rejected as busy
        gate.add_permits(1);
        let draft = orchestrator.generate_prompt("Stoicism").await.unwrap();
        assert_eq!(draft, "Write a 5-scene script about Stoicism.");
        assert_eq!(orchestrator.phase(), ScriptPhase::PromptReady);
    }

    #[tokio::test]
    async fn test_edit_before_prompt_rejected() {
        let api = MockApi::new();
        let orchestrator = ScriptOrchestrator::new(api);
        assert!(orchestrator.set_prompt("early edit").is_err());
    }
}
