use crate::http::FetchError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Download failed")]
    Fetch(#[from] FetchError),

    #[error("Failed to write downloaded file '{0}'")]
    FileWrite(PathBuf, #[source] std::io::Error),

    #[error("Cannot derive a file name from URL '{0}'")]
    InvalidFileName(String),

    #[error("Worker pool size must be at least 1")]
    InvalidPoolSize,

    // Covers errors joining download worker tasks
    #[error("Download worker failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
