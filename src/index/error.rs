use crate::http::FetchError;
use crate::types::category::Category;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Failed to fetch {category} listing")]
    Listing {
        category: Category,
        #[source]
        source: FetchError,
    },

    #[error("Unexpected {category} listing at {url}: page contains no hyperlinks")]
    UnexpectedListing { url: String, category: Category },

    #[error("No station archives found in any listing under {0}")]
    NoStationArchives(String),

    #[error("Failed to resolve link '{href}' against {base}: {reason}")]
    LinkResolution {
        base: String,
        href: String,
        reason: String,
    },

    #[error("Invalid station id '{0}' in archive name")]
    InvalidStationId(String),
}
