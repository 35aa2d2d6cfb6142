use crate::http::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationListError {
    #[error("Failed to fetch station list")]
    Fetch(#[from] FetchError),

    #[error("Station list has {found} columns, expected at least {expected}")]
    ColumnLayout { expected: usize, found: usize },

    #[error("Station list line {line}: invalid {field} '{value}'")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },
}
