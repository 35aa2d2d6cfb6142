//! The station index: which archives exist for which station.

use crate::types::category::Category;
use std::collections::btree_map::{self, BTreeMap};

/// Maps a station id to the download URL of each archive category published for it.
///
/// Every entry holds at least one category. Stations and categories are kept sorted, so
/// [`StationIndex::urls`] is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationIndex {
    stations: BTreeMap<u32, BTreeMap<Category, String>>,
}

impl StationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url` as the `category` archive of `station_id`, replacing any previous URL.
    pub fn insert(&mut self, station_id: u32, category: Category, url: impl Into<String>) {
        self.stations
            .entry(station_id)
            .or_default()
            .insert(category, url.into());
    }

    /// Returns the archives known for a station, keyed by category.
    pub fn get(&self, station_id: u32) -> Option<&BTreeMap<Category, String>> {
        self.stations.get(&station_id)
    }

    pub fn contains(&self, station_id: u32) -> bool {
        self.stations.contains_key(&station_id)
    }

    /// Number of stations in the index.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn station_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.stations.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, u32, BTreeMap<Category, String>> {
        self.stations.iter()
    }

    /// Flattens every URL across all stations and categories.
    pub fn urls(&self) -> Vec<String> {
        self.stations
            .values()
            .flat_map(|files| files.values().cloned())
            .collect()
    }
}

impl FromIterator<(u32, Category, String)> for StationIndex {
    fn from_iter<I: IntoIterator<Item = (u32, Category, String)>>(iter: I) -> Self {
        let mut index = StationIndex::new();
        for (station_id, category, url) in iter {
            index.insert(station_id, category, url);
        }
        index
    }
}

impl<'a> IntoIterator for &'a StationIndex {
    type Item = (&'a u32, &'a BTreeMap<Category, String>);
    type IntoIter = btree_map::Iter<'a, u32, BTreeMap<Category, String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
