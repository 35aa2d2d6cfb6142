use crate::download::error::DownloadError;
use crate::index::error::IndexError;
use crate::kl_data::error::KlDataError;
use crate::stations::error::StationListError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DwdError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error(transparent)]
    StationList(#[from] StationListError),

    #[error(transparent)]
    KlData(#[from] KlDataError),

    #[error("No data for station {0}")]
    StationNotFound(u32),

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to create output directory '{0}'")]
    OutDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Output path '{0}' exists but is not a directory")]
    OutDirNotADirectory(PathBuf),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
