use crate::models::{DATE_COLUMN, ISO_DATE_FORMAT};
use crate::table::SeriesTable;
use anyhow::Result;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Neutralise spreadsheet formulas in text cells (`=`, `+`, `-`, `@`, tab, CR).
fn safe_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{s}"),
        _ => s.to_string(),
    }
}

/// Write the table as CSV to any writer: `date` column first, one column
/// per series, empty cells for missing values.
pub fn write_csv<W: Write>(table: &SeriesTable, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    let mut header = vec![DATE_COLUMN.to_string()];
    header.extend(table.columns().iter().map(|c| safe_cell(c)));
    wtr.write_record(&header)?;
    for (date, cells) in table.rows() {
        let mut rec = Vec::with_capacity(cells.len() + 1);
        rec.push(date.format(ISO_DATE_FORMAT).to_string());
        rec.extend(cells.iter().map(|c| c.map(|v| v.to_string()).unwrap_or_default()));
        wtr.write_record(&rec)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the table as CSV with header.
pub fn save_csv<P: AsRef<Path>>(table: &SeriesTable, path: P) -> Result<()> {
    write_csv(table, File::create(path)?)
}

/// Save the table as a pretty JSON array of records.
pub fn save_json<P: AsRef<Path>>(table: &SeriesTable, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(&table.to_records())?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
