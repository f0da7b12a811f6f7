//! Library snapshot cache
//!
//! Holds a read-only snapshot of the service's video library. A refresh
//! replaces the snapshot wholesale; there is no incremental diffing. A
//! failed refresh keeps the previous snapshot and records the error in a
//! separate field, so stale-but-good data is never erased by a failure.

use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use autovid_client::api::GenerationApi;
use autovid_client::error::{ClientError, Result};
use autovid_core::domain::library::LibraryVideo;

struct LibraryState {
    videos: Vec<LibraryVideo>,
    error: Option<String>,
    last_synced: Option<chrono::DateTime<chrono::Utc>>,
    refreshing: bool,
}

/// Session-scoped cache of the generated video library
pub struct LibrarySync {
    api: Arc<dyn GenerationApi>,
    state: Mutex<LibraryState>,
}

/// Clears the in-flight flag when a refresh ends, including when its
/// future is dropped at the await point, so an abandoned refresh cannot
/// leave the cache rejecting every later refresh as busy.
struct RefreshGuard<'a> {
    state: &'a Mutex<LibraryState>,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().unwrap().refreshing = false;
    }
}

impl LibrarySync {
    pub fn new(api: Arc<dyn GenerationApi>) -> Self {
        Self {
            api,
            state: Mutex::new(LibraryState {
                videos: Vec::new(),
                error: None,
                last_synced: None,
                refreshing: false,
            }),
        }
    }

    /// Refresh the snapshot from the service
    ///
    /// Idempotent and single-flighted: a refresh while one is in flight is
    /// rejected Busy. On success the cached set is replaced wholesale and
    /// the error field cleared; on failure the previous snapshot is
    /// retained and the error recorded. Returns the new snapshot size.
    pub async fn refresh(&self) -> Result<usize> {
        {
            let mut state = self.state.lock().unwrap();
            if state.refreshing {
                return Err(ClientError::Busy("a library refresh is already in flight"));
            }
            state.refreshing = true;
        }
        let _guard = RefreshGuard { state: &self.state };

        let result = self.api.list_videos().await;

        let mut state = self.state.lock().unwrap();
        match result {
            Ok(videos) => {
                debug!(count = videos.len(), "library snapshot replaced");
                let count = videos.len();
                state.videos = videos;
                state.error = None;
                state.last_synced = Some(chrono::Utc::now());
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "library refresh failed; keeping previous snapshot");
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Cloned snapshot of the cached videos
    pub fn videos(&self) -> Vec<LibraryVideo> {
        self.state.lock().unwrap().videos.clone()
    }

    /// Error from the most recent failed refresh, if the last refresh failed
    pub fn last_error(&self) -> Option<String> {
        self.state.lock().unwrap().error.clone()
    }

    /// When the snapshot was last successfully replaced
    pub fn last_synced_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.state.lock().unwrap().last_synced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockApi, sample_video};

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let api = MockApi::new();
        api.libraries
            .lock()
            .unwrap()
            .push_back(Ok(vec![sample_video("a.mp4")]));
        api.libraries.lock().unwrap().push_back(Err(500));
        let sync = LibrarySync::new(api.clone());

        sync.refresh().await.unwrap();
        assert_eq!(sync.videos().len(), 1);
        assert!(sync.last_error().is_none());

        let err = sync.refresh().await.unwrap_err();
        assert!(err.is_server_error());
        // Previous good data survives the failure
        assert_eq!(sync.videos().len(), 1);
        assert_eq!(sync.videos()[0].filename, "a.mp4");
        assert!(sync.last_error().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn test_successful_refresh_replaces_wholesale() {
        let api = MockApi::new();
        api.libraries
            .lock()
            .unwrap()
            .push_back(Ok(vec![sample_video("a.mp4"), sample_video("b.mp4")]));
        api.libraries
            .lock()
            .unwrap()
            .push_back(Ok(vec![sample_video("c.mp4")]));
        let sync = LibrarySync::new(api.clone());

        sync.refresh().await.unwrap();
        assert_eq!(sync.videos().len(), 2);

        // No merge: the new server-provided set fully replaces the old one
        sync.refresh().await.unwrap();
        let videos = sync.videos();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].filename, "c.mp4");
        assert!(sync.last_synced_at().is_some());
    }

    #[tokio::test]
    async fn test_refresh_clears_error_after_recovery() {
        let api = MockApi::new();
        api.libraries.lock().unwrap().push_back(Err(503));
        api.libraries
            .lock()
            .unwrap()
            .push_back(Ok(vec![sample_video("a.mp4")]));
        let sync = LibrarySync::new(api.clone());

        assert!(sync.refresh().await.is_err());
        assert!(sync.last_error().is_some());

        sync.refresh().await.unwrap();
        assert!(sync.last_error().is_none());
        assert_eq!(sync.videos().len(), 1);
    }

    #[tokio::test]
    async fn test_abandoned_refresh_does_not_wedge_cache() {
        let api = MockApi::new();
        api.libraries
            .lock()
            .unwrap()
            .push_back(Ok(vec![sample_video("a.mp4")]));
        let gate = api.hold_replies();
        let sync = Arc::new(LibrarySync::new(api.clone()));

        // A refresh is parked at the gate, then its future is dropped
        // mid-flight (the caller navigated away)
        let abandoned = {
            let sync = Arc::clone(&sync);
            tokio::spawn(async move { sync.refresh().await })
        };
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        abandoned.abort();
        let _ = abandoned.await;

        // The next refresh must run, not be rejected as busy
        gate.add_permits(1);
        assert_eq!(sync.refresh().await.unwrap(), 1);
        assert_eq!(sync.videos().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_refresh_rejected() {
        let api = MockApi::new();
        api.libraries
            .lock()
            .unwrap()
            .push_back(Ok(vec![sample_video("a.mp4")]));
        let gate = api.hold_replies();
        let sync = Arc::new(LibrarySync::new(api.clone()));

        let first = {
            let sync = Arc::clone(&sync);
            tokio::spawn(async move { sync.refresh().await })
        };
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        let second = sync.refresh().await;
        assert!(matches!(second, Err(ClientError::Busy(_))));

        gate.add_permits(1);
        assert_eq!(first.await.unwrap().unwrap(), 1);
        assert_eq!(api.call_count(), 1);
    }
}
