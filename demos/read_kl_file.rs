use dwd_climate::{Dwd, DwdError};
use std::env;

#[tokio::main]
async fn main() -> Result<(), DwdError> {
    env_logger::init();
    configure_polars_display();

    let dwd = Dwd::new()?;
    let station_id = env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(44);

    for file in dwd.download_station().station_id(station_id).call().await? {
        let records = Dwd::read_kl_file(&file).await?;
        println!("{}", file.display());
        println!("{}", records.tail(Some(5)));
    }

    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
}
