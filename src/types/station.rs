//! Defines the station metadata rows published in the DWD KL station list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of `KL_Tageswerte_Beschreibung_Stationen.txt`.
///
/// Each row describes a single weather station and the period for which daily
/// climate (KL) data is available for it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StationMetadata {
    /// The DWD station identifier, e.g. `11` for `00011`.
    pub id: u32,
    /// First day with data.
    pub from_date: NaiveDate,
    /// Last day with data.
    pub to_date: NaiveDate,
    /// Station elevation above sea level in meters.
    pub elevation: i32,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Station name, e.g. "Aach".
    pub name: String,
    /// Federal state (Bundesland) the station is located in.
    pub region: String,
}
