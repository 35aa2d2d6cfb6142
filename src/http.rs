use log::warn;
use reqwest::{Client, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {0}")]
    Body(String, #[source] reqwest::Error),
}

/// Sends a GET request and turns any non-success status into [`FetchError::HttpStatus`].
pub(crate) async fn get(client: &Client, url: &str) -> Result<Response, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;

    match response.error_for_status() {
        Ok(resp) => Ok(resp),
        Err(e) => {
            warn!("HTTP error for {}: {:?}", url, e);
            Err(if let Some(status) = e.status() {
                FetchError::HttpStatus {
                    url: url.to_string(),
                    status,
                    source: e,
                }
            } else {
                FetchError::NetworkRequest(url.to_string(), e)
            })
        }
    }
}

/// Fetches the whole body of `url` into memory.
pub(crate) async fn get_bytes(client: &Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let body = get(client, url)
        .await?
        .bytes()
        .await
        .map_err(|e| FetchError::Body(url.to_string(), e))?;
    Ok(body.to_vec())
}

pub(crate) async fn get_text(client: &Client, url: &str) -> Result<String, FetchError> {
    get(client, url)
        .await?
        .text()
        .await
        .map_err(|e| FetchError::Body(url.to_string(), e))
}
