//! Full pipeline runner
//!
//! Submits authoritative generation runs and exposes their lifecycle as an
//! ordered event subscription plus a per-job stage query. One run is in
//! flight per runner instance: starting a new run aborts the superseded
//! one, and an explicit `cancel` aborts the current one.
//!
//! The service offers no streaming progress channel; until it does, the
//! emitted percent sequence is the documented placeholder heuristic
//! 5 (submitted) / 90 (response received) / 100 (settled). The event
//! stream shape is already what a finer-grained channel would use.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{info, warn};
use uuid::Uuid;

use autovid_client::api::GenerationApi;
use autovid_client::error::{ClientError, Result};
use autovid_client::resolve_artifact_url;
use autovid_core::domain::config::VideoConfig;
use autovid_core::domain::stage::{JobStatus, StageKey, StageTracker, WorkflowStage};
use autovid_core::dto::pipeline::RunOutcome;

type JobMap = Arc<Mutex<HashMap<Uuid, StageTracker>>>;
type CurrentRun = Arc<Mutex<Option<(Uuid, AbortHandle)>>>;

/// One event in the ordered lifecycle stream of a run
///
/// Progress events are non-decreasing and the stream terminates with
/// exactly one `Finished` or `Failed` event (or closes early if the run
/// was aborted).
#[derive(Debug)]
pub enum RunEvent {
    /// Coarse completion percent (0..=100)
    Progress(u8),
    /// The run settled successfully
    Finished {
        outcome: RunOutcome,
        /// Resolved playable artifact URL, when the service produced one
        artifact: Option<String>,
    },
    /// The run settled with a failure
    Failed { reason: String },
}

/// Handle to a submitted run
#[derive(Debug)]
pub struct RunHandle {
    /// Identifier for the stage query on the runner
    pub job_id: Uuid,
    events: mpsc::UnboundedReceiver<RunEvent>,
    abort: AbortHandle,
    jobs: JobMap,
    current: CurrentRun,
}

impl RunHandle {
    /// Next lifecycle event, or None once the stream is closed
    pub async fn next_event(&mut self) -> Option<RunEvent> {
        self.events.recv().await
    }

    /// Abort the run
    ///
    /// The network task is cancelled and the job's running stage is marked
    /// failed; the event stream closes without a terminal event. The job
    /// is also withdrawn as the runner's current run so a response already
    /// past its await cannot apply a stale result.
    pub fn cancel(&self) {
        self.abort.abort();
        let mut current = self.current.lock().unwrap();
        if matches!(*current, Some((id, _)) if id == self.job_id) {
            *current = None;
        }
        drop(current);
        if let Some(tracker) = self.jobs.lock().unwrap().get_mut(&self.job_id) {
            tracker.fail_running("run cancelled");
        }
    }
}

/// Session-scoped runner for full generation pipelines
pub struct PipelineRunner {
    api: Arc<dyn GenerationApi>,
    jobs: JobMap,
    current: CurrentRun,
}

impl PipelineRunner {
    pub fn new(api: Arc<dyn GenerationApi>) -> Self {
        Self {
            api,
            jobs: Arc::new(Mutex::new(HashMap::new())),
            current: Arc::new(Mutex::new(None)),
        }
    }

    /// Submit a run
    ///
    /// The configuration is validated locally before any request is
    /// issued. A run already in flight on this instance is aborted and its
    /// running stage marked failed: responses are thereby applied in
    /// request order, never interleaved.
    pub fn run(&self, config: VideoConfig) -> Result<RunHandle> {
        config.validate().map_err(ClientError::Validation)?;

        let job_id = Uuid::new_v4();
        let mut tracker = StageTracker::new();
        tracker
            .start(StageKey::Idea)
            .expect("fresh tracker accepts the first stage");
        self.jobs.lock().unwrap().insert(job_id, tracker);

        // Supersede any in-flight run before issuing the new one. The
        // current slot stays locked until the new job is stored in it, so
        // the spawned task can never observe the slot without itself in it.
        let mut current = self.current.lock().unwrap();
        if let Some((old_id, old_abort)) = current.take() {
            old_abort.abort();
            if let Some(old) = self.jobs.lock().unwrap().get_mut(&old_id) {
                old.fail_running("superseded by a newer run");
            }
            warn!(job_id = %old_id, "aborted superseded pipeline run");
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_task(
            Arc::clone(&self.api),
            Arc::clone(&self.jobs),
            Arc::clone(&self.current),
            job_id,
            config,
            tx,
        ));
        let abort = task.abort_handle();
        *current = Some((job_id, abort.clone()));
        drop(current);

        Ok(RunHandle {
            job_id,
            events: rx,
            abort,
            jobs: Arc::clone(&self.jobs),
            current: Arc::clone(&self.current),
        })
    }

    /// Current stage sequence for a job, if the job is known
    pub fn job_stages(&self, job_id: Uuid) -> Option<Vec<WorkflowStage>> {
        self.jobs
            .lock()
            .unwrap()
            .get(&job_id)
            .map(StageTracker::snapshot)
    }

    /// Overall status for a job, if the job is known
    pub fn job_status(&self, job_id: Uuid) -> Option<JobStatus> {
        self.jobs
            .lock()
            .unwrap()
            .get(&job_id)
            .map(StageTracker::overall)
    }
}

async fn run_task(
    api: Arc<dyn GenerationApi>,
    jobs: JobMap,
    current: CurrentRun,
    job_id: Uuid,
    config: VideoConfig,
    tx: mpsc::UnboundedSender<RunEvent>,
) {
    info!(%job_id, niche = %config.niche, "pipeline run submitted");
    let _ = tx.send(RunEvent::Progress(5));

    let result = api.run_pipeline(&config).await;

    // The abort lands at the await above, but a response that raced past it
    // must still not touch the tracker or emit further events once the job
    // has been superseded or cancelled.
    let still_current = current
        .lock()
        .unwrap()
        .as_ref()
        .is_some_and(|(id, _)| *id == job_id);
    if !still_current {
        warn!(%job_id, "discarding response for a run that is no longer current");
        return;
    }

    // A response was received, success or failure
    let _ = tx.send(RunEvent::Progress(90));

    match result {
        Ok(outcome) if outcome.error.is_none() => {
            let artifact = resolve_artifact_url(api.base_url(), outcome.final_video_url.as_deref());
            if let Some(tracker) = jobs.lock().unwrap().get_mut(&job_id) {
                tracker.resolve_success(artifact.clone());
            }
            info!(%job_id, artifact = ?artifact, "pipeline run finished");
            let _ = tx.send(RunEvent::Progress(100));
            let _ = tx.send(RunEvent::Finished { outcome, artifact });
        }
        Ok(outcome) => {
            // 2xx response that still carries a service-reported failure
            let reason = outcome
                .error
                .clone()
                .unwrap_or_else(|| "pipeline failed".to_string());
            let stage = outcome
                .stage
                .as_deref()
                .and_then(StageKey::parse)
                .unwrap_or(StageKey::Idea);
            if let Some(tracker) = jobs.lock().unwrap().get_mut(&job_id) {
                tracker.resolve_failure(stage, &reason);
            }
            warn!(%job_id, %stage, %reason, "pipeline run failed");
            let _ = tx.send(RunEvent::Progress(100));
            let _ = tx.send(RunEvent::Failed { reason });
        }
        Err(e) => {
            let reason = e.to_string();
            // No parseable stage report; the stage that was running fails
            if let Some(tracker) = jobs.lock().unwrap().get_mut(&job_id) {
                tracker.fail_running(&reason);
            }
            warn!(%job_id, %reason, "pipeline run failed");
            let _ = tx.send(RunEvent::Progress(100));
            let _ = tx.send(RunEvent::Failed { reason });
        }
    }
}
