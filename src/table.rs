use crate::models::{DATE_COLUMN, ISO_DATE_FORMAT, Series};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// Date-indexed table with one column per series.
///
/// Rows are kept in a `BTreeMap`, so iteration is always ascending by date.
/// Every row has exactly `columns.len()` cells; `None` marks a value the
/// series does not have for that date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesTable {
    columns: Vec<String>,
    rows: BTreeMap<NaiveDate, Vec<Option<f64>>>,
}

impl SeriesTable {
    /// Full outer join on date. Column order follows the input order.
    pub fn outer_join(series: Vec<Series>) -> Self {
        let width = series.len();
        let mut rows: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
        let mut columns = Vec::with_capacity(width);

        for (col, s) in series.into_iter().enumerate() {
            for obs in s.observations {
                rows.entry(obs.date).or_insert_with(|| vec![None; width])[col] = obs.value;
            }
            columns.push(s.name);
        }

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.keys().copied()
    }

    /// Rows in ascending date order.
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, &[Option<f64>])> + '_ {
        self.rows.iter().map(|(d, v)| (*d, v.as_slice()))
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell value. Outer `None`: no such row/column; inner `None`: missing value.
    pub fn get(&self, date: NaiveDate, column: &str) -> Option<Option<f64>> {
        let idx = self.column_index(column)?;
        self.rows.get(&date).map(|r| r[idx])
    }

    /// One column as `(date, value)` pairs over the full index.
    pub fn column(&self, name: &str) -> Option<Vec<(NaiveDate, Option<f64>)>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|(d, r)| (*d, r[idx])).collect())
    }

    /// JSON records: `{"data": "YYYY-MM-DD", "<column>": number | null, ...}`.
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|(date, cells)| {
                let mut rec = Map::new();
                rec.insert(
                    DATE_COLUMN.to_string(),
                    Value::String(date.format(ISO_DATE_FORMAT).to_string()),
                );
                for (name, cell) in self.columns.iter().zip(cells) {
                    let v = cell
                        .and_then(Number::from_f64)
                        .map(Value::Number)
                        .unwrap_or(Value::Null);
                    rec.insert(name.clone(), v);
                }
                rec
            })
            .collect()
    }
}
