//! Library domain types

use serde::{Deserialize, Serialize};

/// A previously generated video in the service library
///
/// Owned by the remote service; the client holds a read-only snapshot
/// that is replaced wholesale on each successful sync.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryVideo {
    pub filename: String,
    pub url: String,
    /// Size in bytes
    pub size: u64,
    /// Modification time as Unix epoch seconds
    pub mtime: f64,
}
