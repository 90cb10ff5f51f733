use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use polars::prelude::*;
use serde_json::Value;

use crate::error::InsightError;
use crate::schema::{self, listing, pricing};

/// Source of one arbitrary key/value document for the "view raw data" panel.
///
/// The filter engine never touches this; it is the seam where a document
/// store (MongoDB in the original deployment) plugs in.
pub trait RawRecordSource {
    fn fetch_one(&self) -> Result<Value, InsightError>;
}

/// Raw-record source backed by a JSON file on disk.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RawRecordSource for JsonFileSource {
    fn fetch_one(&self) -> Result<Value, InsightError> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            InsightError::DataUnavailable(format!("{}: {e}", self.path.display()))
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Holds the listings dataset for one session.
///
/// The dataset is loaded once and treated as immutable afterwards; every
/// filter pass works on views derived from it.
pub struct ListingsModel {
    base_path: PathBuf,
    listings: Option<DataFrame>,
}

impl ListingsModel {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            listings: None,
        }
    }

    // ── Data loading ────────────────────────────────────────────────────────

    /// Load the listings CSV.
    ///
    /// Required columns: country, property_type, room_type, price.
    /// All columns are read as strings; the known numeric columns are then
    /// cast to Float64 non-strictly, so a cell that fails to parse becomes
    /// null instead of failing the load. All other columns are preserved as
    /// strings. Optionally rename source headers first via `rename`.
    pub fn load_listings(
        &mut self,
        filename: Option<&str>,
        rename: Option<HashMap<String, String>>,
    ) -> Result<&DataFrame, InsightError> {
        let fname = filename.unwrap_or("listings.csv");
        let raw = self.read_csv_as_strings(fname, rename)?;

        Self::require_columns(
            &raw,
            &[
                listing::COUNTRY,
                listing::PROPERTY_TYPE,
                listing::ROOM_TYPE,
                pricing::PRICE,
            ],
        )?;

        // Cast whichever known numeric columns the file actually carries.
        let present = raw.schema().clone();
        let casts: Vec<Expr> = schema::NUMERIC_COLUMNS
            .iter()
            .filter(|c| present.contains(c))
            .map(|c| {
                col(*c)
                    .str()
                    .strip_chars(lit(" \t\r\n"))
                    .cast(DataType::Float64)
            })
            .collect();

        let df = raw.lazy().with_columns(casts).collect()?;

        self.listings = Some(df);
        Ok(self.listings.as_ref().unwrap())
    }

    /// The loaded dataset, or a "not loaded" error before `load_listings`.
    pub fn listings(&self) -> Result<&DataFrame, InsightError> {
        self.listings
            .as_ref()
            .ok_or_else(|| InsightError::NotLoaded("listings".into()))
    }

    /// Fetch one raw document from a JSON file next to the dataset.
    pub fn raw_preview(&self, filename: &str) -> Result<Value, InsightError> {
        JsonFileSource::new(self.base_path.join(filename)).fetch_one()
    }

    // ── Private helpers ─────────────────────────────────────────────────────

    /// Read a CSV file with all columns as String dtype.
    /// Trims whitespace from column names and applies optional rename.
    fn read_csv_as_strings(
        &self,
        filename: &str,
        rename: Option<HashMap<String, String>>,
    ) -> Result<DataFrame, InsightError> {
        let path = self.base_path.join(filename);
        if !path.is_file() {
            return Err(InsightError::DataUnavailable(format!(
                "{}: no such file",
                path.display()
            )));
        }

        let mut df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0)) // all columns as String
            .try_into_reader_with_file_path(Some(path))?
            .finish()?;

        // Trim whitespace from column names
        let trimmed: Vec<String> = df
            .get_column_names_str()
            .iter()
            .map(|c| c.trim().to_string())
            .collect();
        df.set_column_names(trimmed.as_slice())?;

        // Apply optional column rename
        if let Some(map) = rename {
            let old: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
            let new: Vec<&str> = map.values().map(|s| s.as_str()).collect();
            df = df.lazy().rename(old, new, true).collect()?;
        }

        Ok(df)
    }

    fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), InsightError> {
        for &col_name in required {
            if df.column(col_name).is_err() {
                return Err(InsightError::MissingColumn(col_name.to_string()));
            }
        }
        Ok(())
    }
}
