use dwd_climate::{Dwd, DwdError};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), DwdError> {
    // Set RUST_LOG=info to see what is being fetched
    env_logger::init();

    let dwd = Dwd::new()?;
    let files = dwd
        .download_station()
        .station_id(44) // Großenkneten
        .out_dir(Path::new("data/kl"))
        .call()
        .await?;

    for file in &files {
        println!("Wrote {}", file.display());
    }

    Ok(())
}
