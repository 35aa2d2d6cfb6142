//! Reads the fixed-width station description file of the daily KL product
//! (`KL_Tageswerte_Beschreibung_Stationen.txt`).

use crate::http;
use crate::stations::error::StationListError;
use crate::types::station::StationMetadata;
use chrono::NaiveDate;
use encoding_rs::WINDOWS_1252;
use log::{info, warn};
use reqwest::Client;
use std::ops::Range;
use std::str::FromStr;

/// Column names line plus the dashed ruler below it.
const HEADER_LINES: usize = 2;
/// id, from, to, elevation, latitude, longitude, name, region
const FIELD_COUNT: usize = 8;
/// Leading single-token numeric columns; text columns follow.
const NUMERIC_FIELDS: usize = 6;
const DATE_FORMAT: &str = "%Y%m%d";

/// Downloads and parses the station list. The file is Latin-1 encoded.
pub async fn fetch_station_list(
    client: &Client,
    url: &str,
) -> Result<Vec<StationMetadata>, StationListError> {
    info!("Fetching station list from {}", url);
    let bytes = http::get_bytes(client, url).await?;
    let (text, _, had_errors) = WINDOWS_1252.decode(&bytes);
    if had_errors {
        warn!("Station list from {} contained undecodable bytes", url);
    }
    let stations = parse_station_list(&text)?;
    info!("Parsed {} stations", stations.len());
    Ok(stations)
}

/// Parses the station list text, skipping the two header lines and blank lines.
///
/// Column boundaries are inferred from the data rows: a character column belongs to a
/// field if any row has a non-whitespace character there. Runs of occupied columns
/// become fields. Within the text columns, runs split by a single blank are merged
/// back together so multi-word station names stay in one field. Fields after the
/// eighth are ignored.
pub fn parse_station_list(text: &str) -> Result<Vec<StationMetadata>, StationListError> {
    let rows: Vec<(usize, Vec<char>)> = text
        .lines()
        .enumerate()
        .skip(HEADER_LINES)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, line.trim_end().chars().collect()))
        .collect();

    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let spans = infer_column_spans(rows.iter().map(|(_, chars)| chars.as_slice()));
    if spans.len() < FIELD_COUNT {
        return Err(StationListError::ColumnLayout {
            expected: FIELD_COUNT,
            found: spans.len(),
        });
    }

    rows.iter()
        .map(|(line, chars)| parse_row(*line, chars, &spans))
        .collect()
}

fn infer_column_spans<'a>(rows: impl Iterator<Item = &'a [char]>) -> Vec<Range<usize>> {
    let mut occupied: Vec<bool> = Vec::new();
    for row in rows {
        if row.len() > occupied.len() {
            occupied.resize(row.len(), false);
        }
        for (i, c) in row.iter().enumerate() {
            if !c.is_whitespace() {
                occupied[i] = true;
            }
        }
    }

    let mut spans: Vec<Range<usize>> = Vec::new();
    let mut start = None;
    for (i, &is_occupied) in occupied.iter().enumerate() {
        match (is_occupied, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                spans.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push(s..occupied.len());
    }

    merge_word_gaps(spans)
}

fn merge_word_gaps(spans: Vec<Range<usize>>) -> Vec<Range<usize>> {
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
    for span in spans {
        let n = merged.len();
        match merged.last_mut() {
            Some(prev) if n > NUMERIC_FIELDS && span.start - prev.end == 1 => {
                prev.end = span.end;
            }
            _ => merged.push(span),
        }
    }
    merged
}

fn field(chars: &[char], span: &Range<usize>) -> String {
    let start = span.start.min(chars.len());
    let end = span.end.min(chars.len());
    chars[start..end].iter().collect::<String>().trim().to_string()
}

fn parse_number<T: FromStr>(
    line: usize,
    name: &'static str,
    value: &str,
) -> Result<T, StationListError> {
    value.parse().map_err(|_| StationListError::InvalidField {
        line,
        field: name,
        value: value.to_string(),
    })
}

fn parse_date(line: usize, name: &'static str, value: &str) -> Result<NaiveDate, StationListError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| StationListError::InvalidField {
        line,
        field: name,
        value: value.to_string(),
    })
}

fn parse_row(
    line: usize,
    chars: &[char],
    spans: &[Range<usize>],
) -> Result<StationMetadata, StationListError> {
    let values: Vec<String> = spans
        .iter()
        .take(FIELD_COUNT)
        .map(|span| field(chars, span))
        .collect();

    Ok(StationMetadata {
        id: parse_number(line, "station id", &values[0])?,
        from_date: parse_date(line, "from date", &values[1])?,
        to_date: parse_date(line, "to date", &values[2])?,
        elevation: parse_number(line, "elevation", &values[3])?,
        latitude: parse_number(line, "latitude", &values[4])?,
        longitude: parse_number(line, "longitude", &values[5])?,
        name: values[6].clone(),
        region: values[7].clone(),
    })
}
