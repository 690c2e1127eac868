//! Decoding of the SGS data endpoint payload.
//!
//! The endpoint answers with a JSON array of `{"data": "DD/MM/YYYY", "valor": "1.23"}`
//! records. Values arrive as strings (occasionally as numbers), may use a
//! decimal comma, and a handful of markers stand for "no observation".

use crate::error::{Error, Result};
use crate::models::{ISO_DATE_FORMAT, Observation, UPSTREAM_DATE_FORMAT};
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;

const MISSING_MARKERS: &[&str] = &["", "-", "--", "...", "nan", "null"];

/// Parse a full response body into observations sorted ascending by date.
///
/// Duplicate dates keep the last value seen.
pub fn parse_observations(body: &Value) -> Result<Vec<Observation>> {
    let arr = match body {
        Value::Array(arr) => arr,
        Value::Object(obj) => {
            let msg = ["error", "erro", "message", "mensagem"]
                .iter()
                .find_map(|k| obj.get(*k))
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                });
            return Err(match msg {
                Some(m) => Error::format(format!("sgs api error: {m}")),
                None => Error::format("not a top-level array"),
            });
        }
        _ => return Err(Error::format("not a top-level array")),
    };

    let mut by_date: BTreeMap<NaiveDate, Option<f64>> = BTreeMap::new();
    for (i, rec) in arr.iter().enumerate() {
        let obs = parse_record(rec).map_err(|e| match e {
            Error::UpstreamFormat(m) => Error::format(format!("record {i}: {m}")),
            other => other,
        })?;
        if by_date.insert(obs.date, obs.value).is_some() {
            log::warn!("duplicate observation for {}, keeping the last one", obs.date);
        }
    }

    Ok(by_date
        .into_iter()
        .map(|(date, value)| Observation { date, value })
        .collect())
}

/// Parse one `{data, valor}` record.
pub fn parse_record(rec: &Value) -> Result<Observation> {
    let obj = rec
        .as_object()
        .ok_or_else(|| Error::format(format!("expected an object, got {rec}")))?;
    let date = match obj.get("data") {
        Some(Value::String(s)) => parse_upstream_date(s)?,
        Some(other) => return Err(Error::format(format!("field 'data' is not a string: {other}"))),
        None => return Err(Error::format("missing field 'data'")),
    };
    let value = match obj.get("valor") {
        Some(v) => parse_value(v)?,
        None => return Err(Error::format("missing field 'valor'")),
    };
    Ok(Observation { date, value })
}

/// `DD/MM/YYYY`, with ISO `YYYY-MM-DD` tolerated.
pub fn parse_upstream_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, UPSTREAM_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(s, ISO_DATE_FORMAT))
        .map_err(|_| Error::format(format!("unparsable date '{s}'")))
}

/// Numeric value or `None` for a missing marker.
pub fn parse_value(v: &Value) -> Result<Option<f64>> {
    match v {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64().filter(|x| x.is_finite())),
        Value::String(s) => parse_value_str(s),
        other => Err(Error::format(format!("unparsable value {other}"))),
    }
}

fn parse_value_str(raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if MISSING_MARKERS
        .iter()
        .any(|m| trimmed.eq_ignore_ascii_case(m))
    {
        return Ok(None);
    }
    // Decimal comma only when there is no dot; "1.234,5" style thousands are not used upstream.
    let normalized = if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };
    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(Error::format(format!("unparsable value '{raw}'"))),
    }
}
