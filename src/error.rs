//! Error taxonomy for gallery operations.
//!
//! Internals build `anyhow` context chains; the public operations wrap them
//! in one of these kinds so callers can tell a failed discovery from a
//! failed download without string matching.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("discovery failed: {cause:#}")]
    DiscoveryFailed { cause: anyhow::Error },

    #[error("folder {folder:?} could not be listed: {cause:#}")]
    FolderFetchFailed {
        folder: String,
        cause: anyhow::Error,
    },

    #[error("history unavailable for {folder:?}: {cause:#}")]
    HistoryUnavailable {
        folder: String,
        cause: anyhow::Error,
    },

    #[error("documentation for {name:?} could not be loaded: {cause:#}")]
    DocFetchFailed { name: String, cause: anyhow::Error },

    #[error("configuration for {name:?} could not be downloaded: {cause:#}")]
    DownloadFetchFailed { name: String, cause: anyhow::Error },

    #[error("invalid configuration: {0:#}")]
    Config(anyhow::Error),
}

impl GalleryError {
    pub fn kind(&self) -> &'static str {
        match self {
            GalleryError::DiscoveryFailed { .. } => "discovery-failed",
            GalleryError::FolderFetchFailed { .. } => "folder-fetch-failed",
            GalleryError::HistoryUnavailable { .. } => "history-unavailable",
            GalleryError::DocFetchFailed { .. } => "doc-fetch-failed",
            GalleryError::DownloadFetchFailed { .. } => "download-fetch-failed",
            GalleryError::Config(_) => "config",
        }
    }
}
