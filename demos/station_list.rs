use dwd_climate::{Dwd, DwdError};

#[tokio::main]
async fn main() -> Result<(), DwdError> {
    env_logger::init();

    let dwd = Dwd::new()?;
    let stations = dwd.stations().await?;

    println!("{} stations", stations.len());
    for station in stations.iter().filter(|s| s.region == "Bayern").take(10) {
        println!(
            "{:05} {:<30} {:>5} m  {} .. {}",
            station.id, station.name, station.elevation, station.from_date, station.to_date
        );
    }

    Ok(())
}
