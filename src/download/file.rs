use crate::download::error::DownloadError;
use crate::http::{self, FetchError};
use log::debug;
use reqwest::{Client, Url};
use std::path::{Path, PathBuf};

/// Downloads `url` and writes the body to `out_path`, truncating any existing file.
///
/// The whole body is buffered in memory before anything touches the filesystem, so a
/// failed request never leaves a partial file behind.
pub async fn download_file(
    client: &Client,
    url: &str,
    out_path: &Path,
) -> Result<(), DownloadError> {
    let body = http::get(client, url)
        .await?
        .bytes()
        .await
        .map_err(|e| FetchError::Body(url.to_string(), e))?;

    tokio::fs::write(out_path, &body)
        .await
        .map_err(|e| DownloadError::FileWrite(out_path.to_path_buf(), e))?;

    debug!("Wrote {} bytes from {} to {:?}", body.len(), url, out_path);
    Ok(())
}

/// Downloads `url` into `out_dir`, naming the file after the last URL path segment.
pub(crate) async fn download_into(
    client: &Client,
    url: &str,
    out_dir: &Path,
) -> Result<PathBuf, DownloadError> {
    let out_path = out_dir.join(file_name_from_url(url)?);
    download_file(client, url, &out_path).await?;
    Ok(out_path)
}

pub(crate) fn file_name_from_url(url: &str) -> Result<String, DownloadError> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.path_segments()?.last().map(str::to_string))
        .filter(|name| !name.is_empty())
        .ok_or_else(|| DownloadError::InvalidFileName(url.to_string()))
}
