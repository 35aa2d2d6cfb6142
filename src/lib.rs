//! Download and parse daily climate (KL) station data from the DWD open-data archive.
//!
//! The entry point is [`Dwd`]: it scrapes the station index, downloads archives for one
//! or all stations and parses the station list. [`read_kl_archive`] turns a downloaded
//! archive into a Polars `DataFrame`.

mod download;
mod dwd;
mod error;
mod http;
mod index;
mod kl_data;
mod stations;
mod types;
mod utils;

pub use dwd::*;
pub use error::DwdError;

pub use download::error::DownloadError;
pub use download::file::download_file;
pub use download::pool::download_urls;
pub use download::progress::{BarProgress, DownloadProgress, NoProgress};
pub use http::FetchError;
pub use index::builder::{build_station_index, parse_listing};
pub use index::error::IndexError;
pub use kl_data::error::KlDataError;
pub use kl_data::reader::{
    parse_kl_csv, read_kl_archive, DATA_FILE_PREFIX, DATE_COLUMN, END_OF_RECORD_COLUMN,
};
pub use stations::error::StationListError;
pub use stations::station_list::{fetch_station_list, parse_station_list};

pub use types::category::Category;
pub use types::station::StationMetadata;
pub use types::station_index::StationIndex;
