use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KlDataError {
    #[error("Failed to open archive '{0}'")]
    ArchiveOpen(PathBuf, #[source] std::io::Error),

    #[error("Failed to read archive '{0}'")]
    Zip(PathBuf, #[source] zip::result::ZipError),

    #[error("No data file in archive '{0}'")]
    NoDataFile(PathBuf),

    #[error("Failed to read data file '{member}' in archive '{archive}'")]
    MemberRead {
        archive: PathBuf,
        member: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parsing error processing CSV data in '{archive}'")]
    CsvReadPolars {
        archive: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Missing required column '{column}' in '{archive}'")]
    MissingColumn { archive: PathBuf, column: String },

    #[error("Failed to parse dates in column '{column}' of '{archive}'")]
    DateParse {
        archive: PathBuf,
        column: String,
        #[source]
        source: PolarsError,
    },
}
