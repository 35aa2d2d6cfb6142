//! Builds the [`StationIndex`] by scraping the `historical/` and `recent/` directory
//! listings of the daily KL product.

use crate::http;
use crate::index::error::IndexError;
use crate::types::category::Category;
use crate::types::station_index::StationIndex;
use log::{debug, info, warn};
use reqwest::{Client, Url};
use scraper::{Html, Selector};
use std::sync::LazyLock;

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("anchor selector is valid"));

/// Fetches both category listings below `kl_root` and collects every archive link.
///
/// `kl_root` must end with a `/`, e.g.
/// `https://opendata.dwd.de/climate_environment/CDC/observations_germany/climate/daily/kl/`.
pub async fn build_station_index(
    client: &Client,
    kl_root: &Url,
) -> Result<StationIndex, IndexError> {
    let mut index = StationIndex::new();

    for category in Category::ALL {
        let listing_url = kl_root
            .join(&format!("{}/", category.path_segment()))
            .map_err(|e| IndexError::LinkResolution {
                base: kl_root.to_string(),
                href: category.path_segment().to_string(),
                reason: e.to_string(),
            })?;

        info!("Fetching {} listing from {}", category, listing_url);
        let html = http::get_text(client, listing_url.as_str())
            .await
            .map_err(|source| IndexError::Listing { category, source })?;

        let archives = parse_listing(&listing_url, &html, category)?;
        if archives.is_empty() {
            warn!(
                "{} listing at {} contains no matching archives",
                category, listing_url
            );
        }
        for (station_id, url) in archives {
            index.insert(station_id, category, url);
        }
    }

    if index.is_empty() {
        return Err(IndexError::NoStationArchives(kl_root.to_string()));
    }
    info!("Indexed KL archives for {} stations", index.len());
    Ok(index)
}

/// Extracts `(station id, absolute URL)` pairs from one listing page.
///
/// The page is parsed as HTML and the `href` of every `<a>` element is checked against
/// the category's archive name pattern; other links are skipped. A page without any
/// links at all is reported as [`IndexError::UnexpectedListing`].
pub fn parse_listing(
    listing_url: &Url,
    html: &str,
    category: Category,
) -> Result<Vec<(u32, String)>, IndexError> {
    let document = Html::parse_document(html);
    let file_re = category.file_pattern();

    let mut seen_links = 0usize;
    let mut archives = Vec::new();

    for href in document
        .select(&LINK_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
    {
        seen_links += 1;
        let href = href.trim();
        let Some(caps) = file_re.captures(href) else {
            continue;
        };

        let id_str = &caps[1];
        let station_id = id_str
            .parse::<u32>()
            .map_err(|_| IndexError::InvalidStationId(id_str.to_string()))?;

        if category == Category::Historical {
            debug!(
                "Station {} historical archive covers {} to {}",
                station_id, &caps[2], &caps[3]
            );
        }

        let url = listing_url
            .join(href)
            .map_err(|e| IndexError::LinkResolution {
                base: listing_url.to_string(),
                href: href.to_string(),
                reason: e.to_string(),
            })?;
        archives.push((station_id, url.to_string()));
    }

    if seen_links == 0 {
        return Err(IndexError::UnexpectedListing {
            url: listing_url.to_string(),
            category,
        });
    }
    Ok(archives)
}
