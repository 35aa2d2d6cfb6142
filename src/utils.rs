use crate::error::DwdError;
use log::info;
use std::io;
use std::path::{Path, PathBuf};

/// Creates `path` (recursively) if missing and returns it as an absolute path.
pub async fn prepare_out_dir(path: &Path) -> Result<PathBuf, DwdError> {
    let path =
        std::path::absolute(path).map_err(|e| DwdError::OutDirCreation(path.to_path_buf(), e))?;

    match tokio::fs::metadata(&path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(DwdError::OutDirNotADirectory(path));
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating output directory: {}", path.display());
            tokio::fs::create_dir_all(&path)
                .await
                .map_err(|e| DwdError::OutDirCreation(path.clone(), e))?;
        }
        Err(e) => return Err(DwdError::OutDirCreation(path, e)),
    }
    Ok(path)
}
