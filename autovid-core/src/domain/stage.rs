//! Pipeline stage model
//!
//! The generation pipeline runs five ordered stages: idea, script, media,
//! render, output. Each stage moves `Pending -> Running -> {Success, Error}`;
//! `Error` is terminal for a stage (a re-run gets a fresh job and a fresh
//! tracker, there is no per-stage retry).
//!
//! `StageTracker` enforces the causal invariants: a stage cannot succeed
//! while a prior stage has not, and at most one stage is running at a time.

use serde::Serialize;
use thiserror::Error;

/// The five ordered pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKey {
    Idea,
    Script,
    Media,
    Render,
    Output,
}

impl StageKey {
    /// All stages in causal order
    pub const ALL: [StageKey; 5] = [
        StageKey::Idea,
        StageKey::Script,
        StageKey::Media,
        StageKey::Render,
        StageKey::Output,
    ];

    /// Stable key string
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKey::Idea => "idea",
            StageKey::Script => "script",
            StageKey::Media => "media",
            StageKey::Render => "render",
            StageKey::Output => "output",
        }
    }

    /// Human-readable stage name
    pub fn display_name(&self) -> &'static str {
        match self {
            StageKey::Idea => "Idea",
            StageKey::Script => "Script",
            StageKey::Media => "Media",
            StageKey::Render => "Render",
            StageKey::Output => "Output",
        }
    }

    /// Parses a stage name as reported by the service
    ///
    /// The service historically reports the media stage as "assets" and the
    /// output stage as "upload"; both spellings are accepted.
    pub fn parse(s: &str) -> Option<StageKey> {
        match s {
            "idea" => Some(StageKey::Idea),
            "script" => Some(StageKey::Script),
            "media" | "assets" => Some(StageKey::Media),
            "render" => Some(StageKey::Render),
            "output" | "upload" => Some(StageKey::Output),
            _ => None,
        }
    }

    fn index(&self) -> usize {
        StageKey::ALL.iter().position(|k| k == self).unwrap_or(0)
    }
}

impl std::fmt::Display for StageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of one pipeline stage
///
/// A structured payload per status rather than a free-form log blob, so
/// callers (and tests) can make typed assertions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    Running {
        /// Coarse completion estimate, when the service reports one
        percent: Option<u8>,
    },
    Success {
        /// Reference to the produced artifact, when the stage yields one
        artifact: Option<String>,
    },
    Error {
        reason: String,
    },
}

impl StageStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, StageStatus::Success { .. })
    }

    pub fn is_running(&self) -> bool {
        matches!(self, StageStatus::Running { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StageStatus::Error { .. })
    }
}

/// One named stage of a pipeline job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowStage {
    pub key: StageKey,
    pub name: &'static str,
    pub status: StageStatus,
}

/// Overall status of a pipeline job derived from its stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    InProgress,
    Succeeded,
    Failed,
}

/// Derives the overall job status from a stage sequence
///
/// Succeeded iff every stage is Success; Failed if any stage is Error;
/// otherwise the job is still in progress.
pub fn overall_status(stages: &[WorkflowStage]) -> JobStatus {
    if stages.iter().any(|s| s.status.is_error()) {
        JobStatus::Failed
    } else if stages.iter().all(|s| s.status.is_success()) {
        JobStatus::Succeeded
    } else {
        JobStatus::InProgress
    }
}

/// Invalid stage transition
#[derive(Debug, Error, PartialEq)]
pub enum StageError {
    #[error("stage '{0}' cannot start: a prior stage has not succeeded")]
    PriorNotSucceeded(StageKey),
    #[error("stage '{0}' cannot start: stage '{1}' is already running")]
    AlreadyRunning(StageKey, StageKey),
    #[error("stage '{stage}' is not in the expected state for this transition")]
    InvalidTransition { stage: StageKey },
}

/// Tracks the stage sequence of a single pipeline job
///
/// All mutating operations enforce the transition table
/// `Pending -> Running -> {Success, Error}` plus the cross-stage
/// invariants (causal ordering, single running stage).
#[derive(Debug, Clone)]
pub struct StageTracker {
    stages: Vec<WorkflowStage>,
}

impl StageTracker {
    /// Creates a tracker with every stage Pending
    pub fn new() -> Self {
        let stages = StageKey::ALL
            .iter()
            .map(|&key| WorkflowStage {
                key,
                name: key.display_name(),
                status: StageStatus::Pending,
            })
            .collect();
        Self { stages }
    }

    /// Marks a stage Running
    ///
    /// Rejected if any prior stage has not succeeded, if another stage is
    /// already running, or if the stage is not Pending.
    pub fn start(&mut self, key: StageKey) -> Result<(), StageError> {
        let idx = key.index();

        if let Some(prior) = self.stages[..idx].iter().find(|s| !s.status.is_success()) {
            return Err(StageError::PriorNotSucceeded(prior.key));
        }
        if let Some(running) = self.stages.iter().find(|s| s.status.is_running()) {
            return Err(StageError::AlreadyRunning(key, running.key));
        }
        if self.stages[idx].status != StageStatus::Pending {
            return Err(StageError::InvalidTransition { stage: key });
        }

        self.stages[idx].status = StageStatus::Running { percent: None };
        Ok(())
    }

    /// Marks a Running stage Success
    pub fn succeed(&mut self, key: StageKey, artifact: Option<String>) -> Result<(), StageError> {
        let idx = key.index();
        if !self.stages[idx].status.is_running() {
            return Err(StageError::InvalidTransition { stage: key });
        }
        self.stages[idx].status = StageStatus::Success { artifact };
        Ok(())
    }

    /// Marks a Running stage Error
    pub fn fail(&mut self, key: StageKey, reason: impl Into<String>) -> Result<(), StageError> {
        let idx = key.index();
        if !self.stages[idx].status.is_running() {
            return Err(StageError::InvalidTransition { stage: key });
        }
        self.stages[idx].status = StageStatus::Error {
            reason: reason.into(),
        };
        Ok(())
    }

    /// Fails whichever stage is currently running, if any
    ///
    /// Used when a run is aborted or the transport fails before the service
    /// reports which stage it reached.
    pub fn fail_running(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        if let Some(stage) = self.stages.iter_mut().find(|s| s.status.is_running()) {
            stage.status = StageStatus::Error { reason };
        }
    }

    /// Resolves the whole job as successful
    ///
    /// The service reports only the final outcome, so every stage is marked
    /// Success; the output stage carries the resolved artifact reference.
    pub fn resolve_success(&mut self, artifact: Option<String>) {
        for stage in &mut self.stages {
            stage.status = StageStatus::Success { artifact: None };
        }
        if let Some(last) = self.stages.last_mut() {
            last.status = StageStatus::Success { artifact };
        }
    }

    /// Resolves the job as failed at a reported stage
    ///
    /// Stages before the failed one are marked Success (the service reached
    /// the reported stage), the failed stage carries the reason, and later
    /// stages stay Pending. Ordering invariants hold by construction.
    pub fn resolve_failure(&mut self, key: StageKey, reason: impl Into<String>) {
        let idx = key.index();
        let reason = reason.into();
        for stage in &mut self.stages[..idx] {
            stage.status = StageStatus::Success { artifact: None };
        }
        self.stages[idx].status = StageStatus::Error { reason };
        for stage in &mut self.stages[idx + 1..] {
            stage.status = StageStatus::Pending;
        }
    }

    /// Current stage sequence
    pub fn stages(&self) -> &[WorkflowStage] {
        &self.stages
    }

    /// Cloned snapshot of the stage sequence
    pub fn snapshot(&self) -> Vec<WorkflowStage> {
        self.stages.clone()
    }

    /// Overall job status derived from the stages
    pub fn overall(&self) -> JobStatus {
        overall_status(&self.stages)
    }
}

impl Default for StageTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracker_is_all_pending_and_in_progress() {
        let tracker = StageTracker::new();
        assert_eq!(tracker.stages().len(), 5);
        assert!(
            tracker
                .stages()
                .iter()
                .all(|s| s.status == StageStatus::Pending)
        );
        assert_eq!(tracker.overall(), JobStatus::InProgress);
    }

    #[test]
    fn test_stage_cannot_start_before_prior_succeeds() {
        let mut tracker = StageTracker::new();
        assert_eq!(
            tracker.start(StageKey::Media),
            Err(StageError::PriorNotSucceeded(StageKey::Idea))
        );
    }

    #[test]
    fn test_only_one_stage_running() {
        let mut tracker = StageTracker::new();
        tracker.start(StageKey::Idea).unwrap();
        // Idea is still running; script cannot start even though the guard
        // that trips first is the unfinished prior stage.
        assert!(tracker.start(StageKey::Script).is_err());

        tracker.succeed(StageKey::Idea, None).unwrap();
        tracker.start(StageKey::Script).unwrap();
        assert!(tracker.stages()[1].status.is_running());
    }

    #[test]
    fn test_full_happy_path() {
        let mut tracker = StageTracker::new();
        for key in StageKey::ALL {
            tracker.start(key).unwrap();
            tracker.succeed(key, None).unwrap();
        }
        assert_eq!(tracker.overall(), JobStatus::Succeeded);
    }

    #[test]
    fn test_error_is_terminal_for_stage() {
        let mut tracker = StageTracker::new();
        tracker.start(StageKey::Idea).unwrap();
        tracker.fail(StageKey::Idea, "model unavailable").unwrap();

        // No retry operation: the stage cannot re-enter Running
        assert!(tracker.start(StageKey::Idea).is_err());
        assert_eq!(tracker.overall(), JobStatus::Failed);
    }

    #[test]
    fn test_overall_success_requires_all_stages() {
        let mut stages = StageTracker::new().snapshot();
        for stage in &mut stages {
            stage.status = StageStatus::Success { artifact: None };
        }
        assert_eq!(overall_status(&stages), JobStatus::Succeeded);

        // Flipping any single stage to Error fails the job
        for idx in 0..stages.len() {
            let mut flipped = stages.clone();
            flipped[idx].status = StageStatus::Error {
                reason: "boom".to_string(),
            };
            assert_eq!(overall_status(&flipped), JobStatus::Failed);
        }
    }

    #[test]
    fn test_resolve_failure_marks_prior_success() {
        let mut tracker = StageTracker::new();
        tracker.resolve_failure(StageKey::Render, "ffmpeg exited 1");

        let stages = tracker.stages();
        assert!(stages[0].status.is_success());
        assert!(stages[1].status.is_success());
        assert!(stages[2].status.is_success());
        assert!(stages[3].status.is_error());
        assert_eq!(stages[4].status, StageStatus::Pending);
        assert_eq!(tracker.overall(), JobStatus::Failed);
    }

    #[test]
    fn test_resolve_success_carries_artifact_on_output() {
        let mut tracker = StageTracker::new();
        tracker.resolve_success(Some("http://cdn.example/x.mp4".to_string()));

        assert_eq!(tracker.overall(), JobStatus::Succeeded);
        assert_eq!(
            tracker.stages()[4].status,
            StageStatus::Success {
                artifact: Some("http://cdn.example/x.mp4".to_string())
            }
        );
    }

    #[test]
    fn test_parse_accepts_service_spellings() {
        assert_eq!(StageKey::parse("assets"), Some(StageKey::Media));
        assert_eq!(StageKey::parse("upload"), Some(StageKey::Output));
        assert_eq!(StageKey::parse("render"), Some(StageKey::Render));
        assert_eq!(StageKey::parse("unknown"), None);
    }
}
