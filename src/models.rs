use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Date format the SGS API expects in query strings and returns in payloads.
pub const UPSTREAM_DATE_FORMAT: &str = "%d/%m/%Y";
/// Date format accepted from callers.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
/// Name of the date index column in table exports and JSON records.
pub const DATE_COLUMN: &str = "data";

/// Series identifiers as supplied by a caller.
///
/// Codes are kept as `i64` so that negative input can be rejected with a
/// proper error instead of failing to type-check at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Codes {
    /// One code; the column is named after the code.
    Single(i64),
    /// Several codes, each column named after its code.
    List(Vec<i64>),
    /// Code -> display name, in the given order.
    Named(Vec<(i64, String)>),
}

impl From<i64> for Codes {
    fn from(code: i64) -> Self {
        Codes::Single(code)
    }
}

impl From<Vec<i64>> for Codes {
    fn from(codes: Vec<i64>) -> Self {
        Codes::List(codes)
    }
}

impl From<&[i64]> for Codes {
    fn from(codes: &[i64]) -> Self {
        Codes::List(codes.to_vec())
    }
}

impl<const N: usize> From<[i64; N]> for Codes {
    fn from(codes: [i64; N]) -> Self {
        Codes::List(codes.to_vec())
    }
}

impl<S: Into<String>> From<Vec<(i64, S)>> for Codes {
    fn from(pairs: Vec<(i64, S)>) -> Self {
        Codes::Named(pairs.into_iter().map(|(c, n)| (c, n.into())).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[(i64, S); N]> for Codes {
    fn from(pairs: [(i64, S); N]) -> Self {
        Codes::Named(pairs.into_iter().map(|(c, n)| (c, n.into())).collect())
    }
}

impl<S: Into<String>> From<BTreeMap<i64, S>> for Codes {
    fn from(map: BTreeMap<i64, S>) -> Self {
        Codes::Named(map.into_iter().map(|(c, n)| (c, n.into())).collect())
    }
}

impl Codes {
    /// Parse a comma/semicolon separated code list, optionally paired with an
    /// equally long list of display names (as typed on the command line).
    pub fn parse_list(codes: &str, names: Option<&str>) -> Result<Self> {
        let codes = split_list(codes)
            .into_iter()
            .map(|tok| {
                tok.parse::<i64>()
                    .map_err(|_| Error::invalid(format!("series code '{tok}' is not an integer")))
            })
            .collect::<Result<Vec<_>>>()?;

        match names {
            None => Ok(Codes::List(codes)),
            Some(names) => {
                let names = split_list(names);
                if names.len() != codes.len() {
                    return Err(Error::invalid(format!(
                        "got {} codes but {} names",
                        codes.len(),
                        names.len()
                    )));
                }
                Ok(Codes::Named(codes.into_iter().zip(names).collect()))
            }
        }
    }

    /// Normalize into ordered `(code, display_name)` pairs.
    pub fn requests(&self) -> Result<Vec<SeriesRequest>> {
        let pairs: Vec<(i64, Option<&str>)> = match self {
            Codes::Single(c) => vec![(*c, None)],
            Codes::List(cs) => cs.iter().map(|c| (*c, None)).collect(),
            Codes::Named(ps) => ps.iter().map(|(c, n)| (*c, Some(n.as_str()))).collect(),
        };
        if pairs.is_empty() {
            return Err(Error::invalid("at least one series code required"));
        }

        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(pairs.len());
        for (raw, name) in pairs {
            let code = checked_code(raw)?;
            let display_name = match name {
                Some(n) if n.trim().is_empty() => {
                    return Err(Error::invalid(format!("empty display name for code {code}")));
                }
                Some(n) => n.trim().to_string(),
                None => code.to_string(),
            };
            if display_name == DATE_COLUMN {
                return Err(Error::invalid(format!(
                    "display name '{DATE_COLUMN}' is reserved for the date index"
                )));
            }
            if !seen.insert(display_name.clone()) {
                return Err(Error::invalid(format!(
                    "duplicate column name '{display_name}'"
                )));
            }
            out.push(SeriesRequest { code, display_name });
        }
        Ok(out)
    }
}

fn checked_code(raw: i64) -> Result<u32> {
    if raw <= 0 {
        return Err(Error::invalid(format!(
            "series code must be a positive integer, got {raw}"
        )));
    }
    u32::try_from(raw).map_err(|_| Error::invalid(format!("series code {raw} is out of range")))
}

fn split_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// One series to fetch, with the column name it will get.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesRequest {
    pub code: u32,
    pub display_name: String,
}

/// Optional, validated date bounds for a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(Error::InvalidDateRange { start, end });
            }
        }
        Ok(Self { start, end })
    }

    /// Build from ISO-8601 strings (`YYYY-MM-DD`; a trailing time part is ignored).
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let start = start.map(parse_iso_date).transpose()?;
        let end = end.map(parse_iso_date).transpose()?;
        Self::new(start, end)
    }

    /// Query parameters in upstream `DD/MM/YYYY` form.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(d) = self.start {
            params.push(("dataInicial", d.format(UPSTREAM_DATE_FORMAT).to_string()));
        }
        if let Some(d) = self.end {
            params.push(("dataFinal", d.format(UPSTREAM_DATE_FORMAT).to_string()));
        }
        params
    }
}

pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    let day = s.split_once('T').map(|(d, _)| d).unwrap_or(s);
    NaiveDate::parse_from_str(day, ISO_DATE_FORMAT)
        .map_err(|_| Error::invalid(format!("invalid date '{s}', expected YYYY-MM-DD")))
}

/// A single dated value. `value == None` marks a missing observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// One fetched series, observations ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub code: u32,
    pub name: String,
    pub observations: Vec<Observation>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }
}

/// Descriptive record for a series, as listed by the SGS search page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesMetadata {
    pub code: String,
    pub name: String,
    pub unit: String,
    pub frequency: String,
    pub start_date: String,
    pub end_date: String,
    pub source_name: String,
    pub special: String,
}

/// Interface language of the search page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    Pt,
    En,
}

/// What to look for on the search page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Code(u32),
    Text(String),
}

impl From<u32> for SearchQuery {
    fn from(code: u32) -> Self {
        SearchQuery::Code(code)
    }
}

impl From<&str> for SearchQuery {
    fn from(text: &str) -> Self {
        SearchQuery::Text(text.to_string())
    }
}

impl From<String> for SearchQuery {
    fn from(text: String) -> Self {
        SearchQuery::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_code_defaults_name_to_code() {
        let reqs = Codes::from(12).requests().unwrap();
        assert_eq!(
            reqs,
            vec![SeriesRequest {
                code: 12,
                display_name: "12".into()
            }]
        );
    }

    #[test]
    fn rejects_negative_zero_and_empty() {
        assert!(matches!(
            Codes::from(-1).requests(),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Codes::from(0).requests(),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Codes::List(vec![]).requests(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn date_range_formats_upstream_dates() {
        let r = DateRange::parse(Some("2020-01-31"), Some("2020-12-01")).unwrap();
        assert_eq!(
            r.to_query_params(),
            vec![
                ("dataInicial", "31/01/2020".to_string()),
                ("dataFinal", "01/12/2020".to_string())
            ]
        );
    }
}
