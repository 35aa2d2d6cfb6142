//! Parses the `produkt_*` measurement file inside a downloaded KL archive.

use crate::kl_data::error::KlDataError;
use encoding_rs::WINDOWS_1252;
use log::debug;
use polars::prelude::*;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use ::zip::ZipArchive;

/// Name prefix of the one measurement file inside each archive.
pub const DATA_FILE_PREFIX: &str = "produkt_";
/// Column holding the measurement day as `YYYYMMDD`.
pub const DATE_COLUMN: &str = "MESS_DATUM";
/// End-of-record marker column present in every data file.
pub const END_OF_RECORD_COLUMN: &str = "eor";

const DATE_FORMAT: &str = "%Y%m%d";
const MISSING_VALUES: [&str; 2] = ["-999", "-999.0"];

/// Reads the measurement records of a KL archive into a `DataFrame`.
///
/// The member whose name starts with [`DATA_FILE_PREFIX`] is parsed as `;`-separated
/// text with a header row. Whitespace around separators is ignored, the `-999`
/// sentinel becomes null in every column, [`DATE_COLUMN`] is parsed into a `Date`
/// column and the [`END_OF_RECORD_COLUMN`] is dropped. Rows keep their file order.
///
/// # Errors
///
/// Returns [`KlDataError::NoDataFile`] if the archive has no `produkt_` member.
pub fn read_kl_archive(path: &Path) -> Result<DataFrame, KlDataError> {
    let file = File::open(path).map_err(|e| KlDataError::ArchiveOpen(path.to_path_buf(), e))?;
    let mut archive =
        ZipArchive::new(file).map_err(|e| KlDataError::Zip(path.to_path_buf(), e))?;

    let member = archive
        .file_names()
        .find(|name| name.starts_with(DATA_FILE_PREFIX))
        .map(str::to_string)
        .ok_or_else(|| KlDataError::NoDataFile(path.to_path_buf()))?;

    let mut raw = Vec::new();
    archive
        .by_name(&member)
        .map_err(|e| KlDataError::Zip(path.to_path_buf(), e))?
        .read_to_end(&mut raw)
        .map_err(|e| KlDataError::MemberRead {
            archive: path.to_path_buf(),
            member: member.clone(),
            source: e,
        })?;
    debug!("Read {} bytes from {} in {:?}", raw.len(), member, path);

    let (text, _, _) = WINDOWS_1252.decode(&raw);
    parse_kl_csv(&text, path)
}

/// Parses the text of a `produkt_` file. `archive` is only used for error context.
pub fn parse_kl_csv(text: &str, archive: &Path) -> Result<DataFrame, KlDataError> {
    let csv = trim_fields(text);
    let null_values = NullValues::AllColumns(MISSING_VALUES.iter().map(|v| (*v).into()).collect());

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|opts| {
            opts.with_separator(b';')
                .with_null_values(Some(null_values.clone()))
        })
        .into_reader_with_file_handle(Cursor::new(csv.into_bytes()))
        .finish()
        .map_err(|e| KlDataError::CsvReadPolars {
            archive: archive.to_path_buf(),
            source: e,
        })?;

    if df.get_column_index(DATE_COLUMN).is_none() {
        return Err(KlDataError::MissingColumn {
            archive: archive.to_path_buf(),
            column: DATE_COLUMN.to_string(),
        });
    }

    let mut df = df
        .lazy()
        .with_column(
            col(DATE_COLUMN)
                .cast(DataType::String)
                .str()
                .to_date(StrptimeOptions {
                    format: Some(DATE_FORMAT.into()),
                    ..Default::default()
                }),
        )
        .collect()
        .map_err(|e| KlDataError::DateParse {
            archive: archive.to_path_buf(),
            column: DATE_COLUMN.to_string(),
            source: e,
        })?;

    if df.get_column_index(END_OF_RECORD_COLUMN).is_some() {
        df = df
            .drop(END_OF_RECORD_COLUMN)
            .map_err(|e| KlDataError::CsvReadPolars {
                archive: archive.to_path_buf(),
                source: e,
            })?;
    }

    Ok(df)
}

/// Drops blank lines and surrounding whitespace of every `;`-separated field.
fn trim_fields(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        for (i, value) in line.split(';').enumerate() {
            if i > 0 {
                out.push(';');
            }
            out.push_str(value.trim());
        }
        out.push('\n');
    }
    out
}
