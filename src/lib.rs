//! sgs
//!
//! A lightweight Rust library for retrieving Brazilian Central Bank time series
//! from the SGS (Sistema Gerenciador de Séries Temporais). Pairs with the `sgs` CLI.
//!
//! ### Features
//! - Fetch one or many series by code, optionally renaming the columns
//! - Outer-join differently sampled series on a single ascending date index
//! - Look up series metadata and search the catalogue by keyword
//! - Save tables as CSV or JSON
//!
//! ### Example
//! ```no_run
//! let table = sgs::dataframe([(12, "cdi"), (433, "ipca")], Some("2020-01-01"), None)?;
//! for (date, row) in table.rows() {
//!     println!("{date} {row:?}");
//! }
//! sgs::storage::save_csv(&table, "cdi_ipca.csv")?;
//! let meta = sgs::metadata(12)?;
//! println!("{} ({})", meta.name, meta.frequency);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! The free functions below build a default [`Client`] per call; keep a
//! `Client` around when issuing many requests.

pub mod api;
pub mod error;
pub mod models;
pub mod parse;
pub mod search;
pub mod storage;
pub mod table;

pub use api::{Client, ClientConfig};
pub use error::{Error, Result};
pub use models::{
    Codes, DateRange, Language, Observation, SearchQuery, Series, SeriesMetadata, SeriesRequest,
};
pub use table::SeriesTable;

use serde_json::{Map, Value};

/// See [`Client::dataframe`].
pub fn dataframe(
    codes: impl Into<Codes>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<SeriesTable> {
    Client::new()?.dataframe(codes, start, end)
}

/// See [`Client::series`].
pub fn series(code: impl Into<Codes>, start: Option<&str>, end: Option<&str>) -> Result<Series> {
    Client::new()?.series(code, start, end)
}

/// See [`Client::json`].
pub fn json(
    codes: impl Into<Codes>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Vec<Map<String, Value>>> {
    Client::new()?.json(codes, start, end)
}

/// See [`Client::metadata`].
pub fn metadata(code: u32) -> Result<SeriesMetadata> {
    Client::new()?.metadata(code)
}

/// See [`Client::metadata_in`].
pub fn metadata_in(code: u32, language: Language) -> Result<SeriesMetadata> {
    Client::new()?.metadata_in(code, language)
}

/// See [`Client::search`].
pub fn search(query: impl Into<SearchQuery>) -> Result<Vec<SeriesMetadata>> {
    Client::new()?.search(query)
}

/// See [`Client::search_in`].
pub fn search_in(
    query: impl Into<SearchQuery>,
    language: Language,
) -> Result<Vec<SeriesMetadata>> {
    Client::new()?.search_in(query, language)
}
