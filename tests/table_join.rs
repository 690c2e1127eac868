use chrono::NaiveDate;
use sgs::{Observation, Series, SeriesTable};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn series(name: &str, points: &[(NaiveDate, Option<f64>)]) -> Series {
    Series {
        code: 1,
        name: name.into(),
        observations: points
            .iter()
            .map(|&(date, value)| Observation { date, value })
            .collect(),
    }
}

#[test]
fn outer_join_keeps_dates_from_any_series() {
    // Daily-ish "x" and monthly "y": 2020-01-02 only exists in x, 2020-02-01 only in y.
    let x = series(
        "x",
        &[(d(2020, 1, 1), Some(1.0)), (d(2020, 1, 2), Some(2.0))],
    );
    let y = series(
        "y",
        &[(d(2020, 1, 1), Some(10.0)), (d(2020, 2, 1), Some(20.0))],
    );
    let t = SeriesTable::outer_join(vec![x, y]);

    assert_eq!(t.columns(), &["x".to_string(), "y".to_string()]);
    assert_eq!(
        t.dates().collect::<Vec<_>>(),
        vec![d(2020, 1, 1), d(2020, 1, 2), d(2020, 2, 1)]
    );
    assert_eq!(t.get(d(2020, 1, 2), "x"), Some(Some(2.0)));
    assert_eq!(t.get(d(2020, 1, 2), "y"), Some(None));
    assert_eq!(t.get(d(2020, 2, 1), "x"), Some(None));
    assert_eq!(t.get(d(2020, 2, 1), "y"), Some(Some(20.0)));
    assert_eq!(t.get(d(2020, 1, 1), "z"), None);
}

#[test]
fn rows_are_ascending_and_full_width() {
    let a = series("a", &[(d(2021, 5, 1), Some(5.0)), (d(2021, 1, 1), Some(1.0))]);
    let b = series("b", &[(d(2021, 3, 1), Some(3.0))]);
    let c = series("c", &[]);
    let t = SeriesTable::outer_join(vec![a, b, c]);

    let dates: Vec<_> = t.dates().collect();
    assert!(dates.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(t.len(), 3);
    assert!(t.rows().all(|(_, cells)| cells.len() == 3));
    assert!(t.column("c").unwrap().iter().all(|(_, v)| v.is_none()));
}

#[test]
fn records_use_iso_dates_and_null_for_missing() {
    let t = SeriesTable::outer_join(vec![
        series("cdi", &[(d(2020, 1, 2), Some(0.5))]),
        series("ipca", &[(d(2020, 1, 1), Some(0.21))]),
    ]);
    let recs = t.to_records();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0]["data"], "2020-01-01");
    assert!(!recs[0].contains_key("date"));
    assert_eq!(recs[0]["cdi"], serde_json::Value::Null);
    assert_eq!(recs[0]["ipca"], 0.21);
    assert_eq!(recs[1]["data"], "2020-01-02");
    assert_eq!(recs[1]["cdi"], 0.5);
    assert_eq!(recs[1]["ipca"], serde_json::Value::Null);
}
