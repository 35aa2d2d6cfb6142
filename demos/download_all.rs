use dwd_climate::{Dwd, DwdError};
use std::env;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), DwdError> {
    env_logger::init();

    let n_jobs = env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(dwd_climate::DEFAULT_N_JOBS);

    let dwd = Dwd::new()?;
    let index = dwd.station_index().await?;
    println!("{} stations, {} archives", index.len(), index.urls().len());

    let files = dwd
        .download_all()
        .out_dir(Path::new("data/kl"))
        .n_jobs(n_jobs)
        .call()
        .await?;
    println!("Downloaded {} archives", files.len());

    Ok(())
}
