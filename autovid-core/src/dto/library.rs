//! Library DTOs

use serde::Deserialize;

use crate::domain::library::LibraryVideo;

/// Response from `GET /api/library/videos`
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryResponse {
    pub videos: Vec<LibraryVideo>,
}
