//! Defines the archive categories the DWD publishes daily KL data under.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static HISTORICAL_ARCHIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^tageswerte_KL_(\d{5})_(\d{8})_(\d{8})_hist\.zip$")
        .expect("historical archive pattern is valid")
});
static RECENT_ARCHIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^tageswerte_KL_(\d{5})_akt\.zip$").expect("recent archive pattern is valid")
});

/// The two directories a station's daily KL archives are published in.
///
/// `Historical` holds quality-controlled data up to a fixed cutoff, `Recent` holds the
/// more current, not yet fully checked data. Ordering is `Historical < Recent`, so
/// iterating an index entry always yields the historical archive first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Archives named `tageswerte_KL_<id>_<from>_<to>_hist.zip`.
    Historical,
    /// Archives named `tageswerte_KL_<id>_akt.zip`.
    Recent,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Historical, Category::Recent];

    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            Category::Historical => "historical",
            Category::Recent => "recent",
        }
    }

    /// Anchored filename pattern; the first capture group is always the station id.
    pub(crate) fn file_pattern(&self) -> &'static Regex {
        match self {
            Category::Historical => &HISTORICAL_ARCHIVE,
            Category::Recent => &RECENT_ARCHIVE,
        }
    }
}

/// Formats a `Category` using its directory name.
///
/// # Examples
///
/// ```
/// use dwd_climate::Category;
///
/// assert_eq!(Category::Historical.to_string(), "historical");
/// assert_eq!(format!("{}", Category::Recent), "recent");
/// ```
impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}
