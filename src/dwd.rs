//! This module provides the main entry point for the DWD daily climate (KL) archive.
//! It builds the station index, downloads station archives (one station or all of them)
//! and parses the station list and downloaded archives.

use crate::download::file::download_into;
use crate::download::pool::download_urls;
use crate::download::progress::{BarProgress, DownloadProgress};
use crate::error::DwdError;
use crate::index::builder::build_station_index;
use crate::kl_data::reader::read_kl_archive;
use crate::stations::station_list::fetch_station_list;
use crate::types::station::StationMetadata;
use crate::types::station_index::StationIndex;
use crate::utils::prepare_out_dir;
use bon::bon;
use log::info;
use polars::prelude::DataFrame;
use reqwest::{Client, Url};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Root of the DWD Climate Data Center open-data tree.
pub const DEFAULT_BASE_URL: &str = "https://opendata.dwd.de/climate_environment/CDC/";
/// Directory downloads go to when no `out_dir` is given.
pub const DEFAULT_OUT_DIR: &str = "data/kl";
/// Number of concurrent workers used by [`Dwd::download_all`] by default.
pub const DEFAULT_N_JOBS: usize = 20;

const STATION_LIST_PATH: &str = "help/KL_Tageswerte_Beschreibung_Stationen.txt";
const KL_DAILY_PATH: &str = "observations_germany/climate/daily/kl/";

/// Client for the daily KL product of the DWD open-data archive.
///
/// The station index is scraped from the `historical/` and `recent/` directory listings
/// the first time it is needed and then reused for the lifetime of this value. There
/// is no refresh: create a new `Dwd` to pick up newly published archives.
///
/// # Examples
///
/// ```no_run
/// # use dwd_climate::{Dwd, DwdError};
/// # #[tokio::main]
/// # async fn main() -> Result<(), DwdError> {
/// let dwd = Dwd::new()?;
/// let files = dwd.download_station().station_id(44).call().await?;
/// for file in files {
///     let records = Dwd::read_kl_file(&file).await?;
///     println!("{}: {:?}", file.display(), records.shape());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Dwd {
    client: Client,
    base_url: Url,
    index: OnceCell<StationIndex>,
}

#[bon]
impl Dwd {
    /// Creates a client for the public DWD server.
    pub fn new() -> Result<Self, DwdError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client rooted at a different server or mirror.
    ///
    /// `base_url` corresponds to `https://opendata.dwd.de/climate_environment/CDC/`; a
    /// missing trailing slash is added.
    pub fn with_base_url(base_url: &str) -> Result<Self, DwdError> {
        Self::with_client(Client::new(), base_url)
    }

    /// Like [`Dwd::with_base_url`], reusing an existing `reqwest::Client`.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, DwdError> {
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url)?,
            index: OnceCell::new(),
        })
    }

    /// Uses `index` instead of scraping the directory listings.
    pub fn with_station_index(mut self, index: StationIndex) -> Self {
        self.index = OnceCell::new_with(Some(index));
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the station index, building it on first use.
    ///
    /// Concurrent first calls build it once; later calls return the same value even if
    /// the listings have changed in the meantime.
    ///
    /// # Errors
    ///
    /// Returns [`DwdError::Index`] if a listing cannot be fetched or does not look like a
    /// directory listing. A failed build is not cached; the next call tries again.
    pub async fn station_index(&self) -> Result<&StationIndex, DwdError> {
        let kl_root = self.endpoint(KL_DAILY_PATH)?;
        self.index
            .get_or_try_init(|| async {
                build_station_index(&self.client, &kl_root)
                    .await
                    .map_err(DwdError::from)
            })
            .await
    }

    /// Downloads and parses the station list, in file order.
    pub async fn stations(&self) -> Result<Vec<StationMetadata>, DwdError> {
        let url = self.endpoint(STATION_LIST_PATH)?;
        Ok(fetch_station_list(&self.client, url.as_str()).await?)
    }

    /// Downloads every archive published for one station.
    ///
    /// Files are named after the remote archive and overwrite existing files.
    ///
    /// # Arguments
    ///
    /// * `.station_id(u32)`: **Required.** The DWD station id, e.g. `44` for `00044`.
    /// * `.out_dir(&Path)`: Optional. Target directory, created if missing. Defaults to `data/kl`.
    ///
    /// # Returns
    ///
    /// The absolute paths of the written files, historical archive first.
    ///
    /// # Errors
    ///
    /// Returns [`DwdError::StationNotFound`] if the index has no archives for the station;
    /// nothing is written in that case. Returns [`DwdError::Download`] if a download fails.
    #[builder]
    pub async fn download_station(
        &self,
        station_id: u32,
        out_dir: Option<&Path>,
    ) -> Result<Vec<PathBuf>, DwdError> {
        let index = self.station_index().await?;
        let files = index
            .get(station_id)
            .ok_or(DwdError::StationNotFound(station_id))?;

        let out_dir = prepare_out_dir(out_dir.unwrap_or(Path::new(DEFAULT_OUT_DIR))).await?;

        let mut written = Vec::with_capacity(files.len());
        for (category, url) in files {
            info!("Downloading {} archive of station {}", category, station_id);
            written.push(download_into(&self.client, url, &out_dir).await?);
        }
        Ok(written)
    }

    /// Downloads every archive in the index using a fixed-size worker pool.
    ///
    /// # Arguments
    ///
    /// * `.out_dir(&Path)`: Optional. Target directory, created if missing. Defaults to `data/kl`.
    /// * `.n_jobs(usize)`: Optional. Number of concurrent downloads. Defaults to `20`.
    /// * `.progress(Arc<dyn DownloadProgress>)`: Optional. Defaults to a terminal progress bar.
    ///
    /// # Errors
    ///
    /// The first failed download aborts the batch and is returned. Files finished before
    /// that stay on disk, but which ones is not reported.
    #[builder]
    pub async fn download_all(
        &self,
        out_dir: Option<&Path>,
        n_jobs: Option<usize>,
        progress: Option<Arc<dyn DownloadProgress>>,
    ) -> Result<Vec<PathBuf>, DwdError> {
        let index = self.station_index().await?;
        let out_dir = prepare_out_dir(out_dir.unwrap_or(Path::new(DEFAULT_OUT_DIR))).await?;
        let progress =
            progress.unwrap_or_else(|| Arc::new(BarProgress::new()) as Arc<dyn DownloadProgress>);

        Ok(download_urls(
            &self.client,
            index.urls(),
            &out_dir,
            n_jobs.unwrap_or(DEFAULT_N_JOBS),
            progress.as_ref(),
        )
        .await?)
    }

    /// Parses a downloaded KL archive on the blocking thread pool.
    ///
    /// See [`read_kl_archive`] for the exact parsing rules.
    pub async fn read_kl_file(path: impl AsRef<Path>) -> Result<DataFrame, DwdError> {
        let path = path.as_ref().to_path_buf();
        Ok(tokio::task::spawn_blocking(move || read_kl_archive(&path)).await??)
    }

    fn endpoint(&self, path: &str) -> Result<Url, DwdError> {
        self.base_url
            .join(path)
            .map_err(|e| DwdError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }
}

fn normalize_base_url(base_url: &str) -> Result<Url, DwdError> {
    let with_slash = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };
    let url = Url::parse(&with_slash).map_err(|e| DwdError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(DwdError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::category::Category;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const KL: &str = "/observations_germany/climate/daily/kl/";
    const HIST_11: &str = "tageswerte_KL_00011_19500101_20181231_hist.zip";
    const AKT_11: &str = "tageswerte_KL_00011_akt.zip";
    const AKT_44: &str = "tageswerte_KL_00044_akt.zip";

    fn listing(links: &[&str]) -> String {
        let anchors: String = links
            .iter()
            .map(|l| format!("<a href=\"{l}\">{l}</a>\n"))
            .collect();
        format!("<html><body><h1>Index of {KL}</h1><hr><pre><a href=\"../\">../</a>\n{anchors}</pre></body></html>")
    }

    async fn mount_listings(server: &MockServer, historical: &[&str], recent: &[&str]) {
        Mock::given(method("GET"))
            .and(path(format!("{KL}historical/")))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing(historical)))
            .expect(1)
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{KL}recent/")))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing(recent)))
            .expect(1)
            .mount(server)
            .await;
    }

    async fn mount_archives(server: &MockServer, expected_downloads: u64) {
        Mock::given(method("GET"))
            .and(path_regex(r"^/observations_germany/climate/daily/kl/(historical|recent)/tageswerte_KL_\d{5}_.+\.zip$"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04".to_vec()))
            .expect(expected_downloads)
            .mount(server)
            .await;
    }

    #[derive(Default)]
    struct CountingProgress(AtomicUsize);

    impl DownloadProgress for CountingProgress {
        fn advance(&self, _path: &Path) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let dwd = Dwd::with_base_url("http://localhost:8080/climate_environment/CDC").unwrap();
        assert_eq!(
            dwd.base_url().as_str(),
            "http://localhost:8080/climate_environment/CDC/"
        );
        assert!(matches!(
            Dwd::with_base_url("not a url"),
            Err(DwdError::InvalidBaseUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_station_index_is_built_once() {
        let server = MockServer::start().await;
        mount_listings(&server, &[HIST_11], &[AKT_44]).await;
        let dwd = Dwd::with_base_url(&server.uri()).unwrap();

        let first = dwd.station_index().await.unwrap();
        let first_snapshot = first.clone();

        // Listings change after the first build; the cached index must not.
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(listing(&["tageswerte_KL_00099_akt.zip"])),
            )
            .with_priority(1)
            .expect(0)
            .mount(&server)
            .await;

        let second = dwd.station_index().await.unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(second, &first_snapshot);
        assert!(!second.contains(99));
        assert_eq!(second.station_ids().collect::<Vec<_>>(), [11, 44]);
    }

    #[tokio::test]
    async fn test_single_historical_link_builds_expected_index() {
        let server = MockServer::start().await;
        mount_listings(&server, &[HIST_11], &[]).await;
        let dwd = Dwd::with_base_url(&server.uri()).unwrap();

        let index = dwd.station_index().await.unwrap();

        let expected: StationIndex = [(
            11,
            Category::Historical,
            format!("{}{KL}historical/{HIST_11}", server.uri()),
        )]
        .into_iter()
        .collect();
        assert_eq!(index, &expected);
    }

    #[tokio::test]
    async fn test_download_station_writes_one_file_per_category() {
        let server = MockServer::start().await;
        mount_listings(&server, &[HIST_11], &[AKT_11, AKT_44]).await;
        mount_archives(&server, 3).await;
        let dwd = Dwd::with_base_url(&server.uri()).unwrap();
        let dir = tempdir().unwrap();

        let files = dwd
            .download_station()
            .station_id(11)
            .out_dir(dir.path())
            .call()
            .await
            .unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with(HIST_11));
        assert!(files[1].ends_with(AKT_11));

        let files = dwd
            .download_station()
            .station_id(44)
            .out_dir(dir.path())
            .call()
            .await
            .unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with(AKT_44));
        assert_eq!(std::fs::read(&files[0]).unwrap(), b"PK\x03\x04");

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[tokio::test]
    async fn test_download_unknown_station_writes_nothing() {
        let index: StationIndex = [(
            11,
            Category::Recent,
            "http://127.0.0.1:9/recent/tageswerte_KL_00011_akt.zip".to_string(),
        )]
        .into_iter()
        .collect();
        let dwd = Dwd::new().unwrap().with_station_index(index);
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("kl");

        let result = dwd
            .download_station()
            .station_id(12)
            .out_dir(&out_dir)
            .call()
            .await;

        assert!(matches!(result, Err(DwdError::StationNotFound(12))));
        assert!(!out_dir.exists());
    }

    #[tokio::test]
    async fn test_download_all_with_single_worker() {
        let server = MockServer::start().await;
        mount_listings(&server, &[HIST_11], &[AKT_11, AKT_44]).await;
        mount_archives(&server, 3).await;
        let dwd = Dwd::with_base_url(&server.uri()).unwrap();
        let dir = tempdir().unwrap();
        let progress = Arc::new(CountingProgress::default());

        let files = dwd
            .download_all()
            .out_dir(dir.path())
            .n_jobs(1)
            .progress(progress.clone())
            .call()
            .await
            .unwrap();

        assert_eq!(files.len(), 3);
        assert_eq!(progress.0.load(Ordering::SeqCst), 3);
        for name in [HIST_11, AKT_11, AKT_44] {
            assert!(dir.path().join(name).exists());
        }
    }

    #[tokio::test]
    async fn test_download_all_propagates_failure() {
        let server = MockServer::start().await;
        mount_listings(&server, &[HIST_11], &[AKT_44]).await;
        Mock::given(method("GET"))
            .and(path_regex(r"\.zip$"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let dwd = Dwd::with_base_url(&server.uri()).unwrap();
        let dir = tempdir().unwrap();

        let result = dwd
            .download_all()
            .out_dir(dir.path())
            .n_jobs(2)
            .progress(Arc::new(crate::NoProgress))
            .call()
            .await;

        assert!(matches!(result, Err(DwdError::Download(_))));
    }

    #[tokio::test]
    async fn test_stations_decodes_latin1() {
        let server = MockServer::start().await;
        let mut body = b"Stations_id von_datum bis_datum Stationshoehe geoBreite geoLaenge Stationsname Bundesland\r\n----------- --------- --------- ------------- --------- --------- ----------------------------------------- ----------\r\n".to_vec();
        body.extend_from_slice(b"00044 19690101 20240101             44     52.9336    8.2370 Gro\xdfenkneten                             Niedersachsen\r\n");
        body.extend_from_slice(b"00073 19520701 20240101            340     48.6183   13.0620 Aldersbach-Kramersepp                    Bayern\r\n");
        Mock::given(method("GET"))
            .and(path("/help/KL_Tageswerte_Beschreibung_Stationen.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .expect(1)
            .mount(&server)
            .await;
        let dwd = Dwd::with_base_url(&server.uri()).unwrap();

        let stations = dwd.stations().await.unwrap();

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].id, 44);
        assert_eq!(stations[0].name, "Großenkneten");
        assert_eq!(stations[0].region, "Niedersachsen");
        assert_eq!(stations[1].name, "Aldersbach-Kramersepp");
        assert_eq!(stations[1].elevation, 340);
    }

    #[tokio::test]
    async fn test_stations_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let dwd = Dwd::with_base_url(&server.uri()).unwrap();

        assert!(matches!(
            dwd.stations().await,
            Err(DwdError::StationList(_))
        ));
    }

    #[tokio::test]
    async fn test_read_kl_file_missing_archive() {
        let dir = tempdir().unwrap();
        let result = Dwd::read_kl_file(dir.path().join("missing.zip")).await;
        assert!(matches!(result, Err(DwdError::KlData(_))));
    }
}
