use crate::download::error::DownloadError;
use crate::download::file::download_into;
use crate::download::progress::DownloadProgress;
use log::{debug, info, warn};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Downloads every URL into `out_dir` using `n_jobs` concurrent workers.
///
/// Workers claim URLs from the shared list through an atomic cursor and push each
/// result into a channel drained by the calling task, which drives `progress`. The first
/// failure aborts the remaining workers and is returned; files written before the
/// failure are left in place but not reported.
///
/// Returns the written paths in completion order.
pub async fn download_urls(
    client: &Client,
    urls: Vec<String>,
    out_dir: &Path,
    n_jobs: usize,
    progress: &dyn DownloadProgress,
) -> Result<Vec<PathBuf>, DownloadError> {
    if n_jobs == 0 {
        return Err(DownloadError::InvalidPoolSize);
    }

    let total = urls.len();
    let worker_count = n_jobs.min(total);
    info!(
        "Downloading {} files to {:?} with {} workers",
        total, out_dir, worker_count
    );
    progress.start(total as u64);

    let work = Arc::new(urls);
    let cursor = Arc::new(AtomicUsize::new(0));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut workers = JoinSet::new();

    for worker in 0..worker_count {
        let work = Arc::clone(&work);
        let cursor = Arc::clone(&cursor);
        let tx = tx.clone();
        let client = client.clone();
        let out_dir = out_dir.to_path_buf();

        workers.spawn(async move {
            loop {
                let next = cursor.fetch_add(1, Ordering::Relaxed);
                let Some(url) = work.get(next) else {
                    break;
                };
                debug!("Worker {} downloading {}", worker, url);
                let result = download_into(&client, url, &out_dir).await;
                let failed = result.is_err();
                // Receiver gone means the batch was aborted.
                if tx.send(result).is_err() || failed {
                    break;
                }
            }
        });
    }
    drop(tx);

    let mut written = Vec::with_capacity(total);
    while let Some(result) = rx.recv().await {
        match result {
            Ok(path) => {
                progress.advance(&path);
                written.push(path);
            }
            Err(e) => {
                warn!(
                    "Aborting bulk download after {} of {} files: {}",
                    written.len(),
                    total,
                    e
                );
                workers.abort_all();
                progress.abandon();
                return Err(e);
            }
        }
    }

    while let Some(joined) = workers.join_next().await {
        joined?;
    }

    progress.finish();
    info!("Downloaded {} files to {:?}", written.len(), out_dir);
    Ok(written)
}
