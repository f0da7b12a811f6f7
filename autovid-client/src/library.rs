//! Library endpoint

use crate::GeneratorClient;
use crate::error::Result;
use autovid_core::domain::library::LibraryVideo;
use autovid_core::dto::library::LibraryResponse;

impl GeneratorClient {
    /// List previously generated videos
    ///
    /// `GET /api/library/videos`. Returns the full server-side set; the
    /// session layer replaces its cached snapshot wholesale with it.
    pub async fn list_videos(&self) -> Result<Vec<LibraryVideo>> {
        let url = format!("{}/api/library/videos", self.base_url);
        let response = self.client.get(&url).send().await?;

        let library: LibraryResponse = self.handle_response(response).await?;
        Ok(library.videos)
    }
}
