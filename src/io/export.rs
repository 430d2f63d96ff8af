//! CSV and JSON export of lifecycle results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::model::types::YearRecord;

/// Column header for the per-year series export.
const HEADER: &str = "year,generation_kwh,self_consumption_kwh,export_kwh,grid_purchase_kwh,\
                      discounted_generation_kwh,discounted_self_consumption_kwh,\
                      discounted_export_kwh,discounted_grid_purchase_kwh,cost,income";

/// Exports per-year records to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_series_csv(years: &[YearRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_series_csv(years, buf)
}

/// Writes per-year records as CSV to any writer.
///
/// One header row, then one row per year. Output is deterministic for
/// identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_series_csv(years: &[YearRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in years {
        wtr.write_record(&[
            r.year.to_string(),
            format!("{:.4}", r.flows.generation),
            format!("{:.4}", r.flows.self_consumption),
            format!("{:.4}", r.flows.export),
            format!("{:.4}", r.flows.grid_purchase),
            format!("{:.4}", r.discounted.generation),
            format!("{:.4}", r.discounted.self_consumption),
            format!("{:.4}", r.discounted.export),
            format!("{:.4}", r.discounted.grid_purchase),
            format!("{:.4}", r.cost),
            format!("{:.4}", r.income),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes any serializable result as pretty-printed JSON.
///
/// # Errors
///
/// Returns an `io::Error` if serialization or writing fails.
pub fn write_json<T: Serialize>(value: &T, mut writer: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)
}
