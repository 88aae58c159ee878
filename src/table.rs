// 🗄️ BIN Table - bundled CSV → in-memory lookup
// Built once at startup, read-only afterwards.

use crate::error::{Error, Result};
use crate::validator::BinCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

pub const UNKNOWN: &str = "Unknown";

// ============================================================================
// CSV ROW
// ============================================================================

/// One row as it appears in the dataset. Extra columns (Type, Category,
/// isoCode2, ...) are ignored by the reader.
#[derive(Debug, Deserialize)]
struct RawBinRow {
    #[serde(rename = "BIN", default)]
    bin: Option<String>,

    #[serde(rename = "Brand", default)]
    brand: Option<String>,

    #[serde(rename = "Issuer", default)]
    issuer: Option<String>,

    #[serde(rename = "CountryName", default)]
    country: Option<String>,
}

fn or_unknown(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => UNKNOWN.to_string(),
    }
}

// ============================================================================
// BIN RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinRecord {
    /// Exactly six digits, unique key
    pub bin: String,

    /// Brand as recorded in the dataset. Informational only, the classifier
    /// recomputes the brand from the digits.
    pub brand: String,

    /// Bank / issuer name
    pub issuer: String,

    /// Country name
    pub country: String,
}

impl BinRecord {
    pub fn new(
        bin: impl Into<String>,
        brand: impl Into<String>,
        issuer: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        BinRecord {
            bin: bin.into(),
            brand: brand.into(),
            issuer: issuer.into(),
            country: country.into(),
        }
    }

    /// None when the row has no usable 6-digit key
    fn from_row(row: RawBinRow) -> Option<Self> {
        let bin = row.bin.map(|b| b.trim().to_string())?;
        BinCode::parse(&bin)?;

        Some(BinRecord {
            bin,
            brand: or_unknown(row.brand),
            issuer: or_unknown(row.issuer),
            country: or_unknown(row.country),
        })
    }
}

// ============================================================================
// BIN TABLE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct BinTable {
    records: HashMap<String, BinRecord>,
}

impl BinTable {
    /// Build from already-constructed records (last duplicate wins)
    pub fn from_records(records: impl IntoIterator<Item = BinRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|r| (r.bin.clone(), r))
            .collect();
        BinTable { records }
    }

    pub fn get(&self, bin: &BinCode) -> Option<&BinRecord> {
        self.records.get(bin.as_str())
    }

    pub fn contains(&self, bin: &BinCode) -> bool {
        self.records.contains_key(bin.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// ARCHIVE
// ============================================================================

/// Unpack the first `.csv` entry of `archive_path` to `csv_path`.
///
/// Skipped when `csv_path` already exists or there is no archive; returns
/// whether anything was written. The CSV appears atomically (temp + rename).
pub fn ensure_extracted(csv_path: &Path, archive_path: &Path) -> Result<bool> {
    if csv_path.exists() || !archive_path.is_file() {
        return Ok(false);
    }

    let unavailable = |e: &dyn std::fmt::Display| Error::data_unavailable(archive_path, e);

    let file = File::open(archive_path).map_err(|e| unavailable(&e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| unavailable(&e))?;

    let index = (0..archive.len())
        .find(|&i| {
            archive
                .by_index(i)
                .map(|entry| entry.is_file() && entry.name().to_ascii_lowercase().ends_with(".csv"))
                .unwrap_or(false)
        })
        .ok_or_else(|| unavailable(&"archive contains no .csv entry"))?;

    if let Some(parent) = csv_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| unavailable(&e))?;
    }

    let partial = csv_path.with_extension("csv.part");
    let copied = (|| -> io::Result<u64> {
        let mut entry = archive.by_index(index).map_err(io::Error::from)?;
        let mut out = File::create(&partial)?;
        let n = io::copy(&mut entry, &mut out)?;
        out.sync_all()?;
        fs::rename(&partial, csv_path)?;
        Ok(n)
    })();

    match copied {
        Ok(bytes) => {
            tracing::info!(
                archive = %archive_path.display(),
                csv = %csv_path.display(),
                bytes,
                "BIN dataset extracted"
            );
            Ok(true)
        }
        Err(e) => {
            let _ = fs::remove_file(&partial);
            Err(unavailable(&e))
        }
    }
}

// ============================================================================
// LOADER
// ============================================================================

/// Load the BIN table from a CSV file on disk.
///
/// Fails with `DataUnavailable` if the file is missing, any row is malformed
/// CSV, or no row yields a usable record.
pub fn load(path: &Path) -> Result<BinTable> {
    if !path.is_file() {
        return Err(Error::data_unavailable(path, "file not found"));
    }

    let rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| Error::data_unavailable(path, e))?;

    let table = read_table(rdr).map_err(|e| Error::data_unavailable(path, e))?;

    tracing::info!(path = %path.display(), records = table.len(), "BIN table loaded");
    Ok(table)
}

/// Shared by `load` and in-memory readers
pub fn load_from_reader<R: Read>(reader: R) -> Result<BinTable> {
    let rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    read_table(rdr).map_err(|e| Error::data_unavailable("<reader>", e))
}

fn read_table<R: Read>(mut rdr: csv::Reader<R>) -> std::result::Result<BinTable, String> {
    let mut records = HashMap::new();
    let mut skipped = 0usize;

    for result in rdr.deserialize::<RawBinRow>() {
        let row = result.map_err(|e| format!("failed to parse row: {}", e))?;

        match BinRecord::from_row(row) {
            Some(record) => {
                records.insert(record.bin.clone(), record);
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!(skipped, "skipped rows without a usable BIN");
    }

    if records.is_empty() {
        return Err("dataset contains no usable BIN rows".to_string());
    }

    Ok(BinTable { records })
}

// ============================================================================
// TESTS
// ============================================================================
