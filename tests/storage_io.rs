use chrono::NaiveDate;
use sgs::{Observation, Series, SeriesTable, storage};
use std::fs;

fn day(i: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Days::new(i)
}

// cdi has three consecutive days; ipca skips the second one.
fn sample() -> SeriesTable {
    let obs = |days: &[u64]| -> Vec<Observation> {
        days.iter()
            .map(|&i| Observation {
                date: day(i),
                value: Some(100.0 + i as f64),
            })
            .collect()
    };
    SeriesTable::outer_join(vec![
        Series {
            code: 12,
            name: "cdi".into(),
            observations: obs(&[0, 1, 2]),
        },
        Series {
            code: 433,
            name: "ipca".into(),
            observations: obs(&[0, 2]),
        },
    ])
}

#[test]
fn save_csv_and_json() {
    let table = sample();
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("sgs_test.csv");
    storage::save_csv(&table, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv_txt.lines();
    assert_eq!(lines.next(), Some("data,cdi,ipca"));
    assert_eq!(lines.next(), Some("2020-01-01,100,100"));
    // Missing value is an empty cell, not zero.
    assert_eq!(lines.next(), Some("2020-01-02,101,"));
    assert_eq!(csv_txt.lines().count(), 1 + table.len());

    let json_path = dir.path().join("sgs_test.json");
    storage::save_json(&table, &json_path).unwrap();
    let json_txt = fs::read_to_string(&json_path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json_txt).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), table.len());
    assert!(arr[1]["ipca"].is_null());
}

// Column names come from user input and end up in spreadsheets; a leading
// `=`/`+`/`@` must not turn into a formula.
#[test]
fn csv_headers_are_prefixed_to_avoid_formulas() {
    let table = SeriesTable::outer_join(vec![Series {
        code: 1,
        name: "=HYPERLINK(\"http://evil\")".into(),
        observations: vec![],
    }]);
    let mut buf = Vec::new();
    storage::write_csv(&table, &mut buf).unwrap();

    let mut rdr = csv::Reader::from_reader(buf.as_slice());
    let headers = rdr.headers().unwrap().clone();
    let name = headers.get(1).unwrap();
    assert!(name.starts_with('\''), "header not prefixed: {name}");
    assert!(name.contains("=HYPERLINK"), "header content changed: {name}");
}
