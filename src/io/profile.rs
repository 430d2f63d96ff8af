//! Hourly consumption/generation loading from CSV.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::error::{LifecycleError, Result};
use crate::model::types::{BuildingProfiles, HourlyProfile};

/// Default header of the hourly building consumption column.
pub const CONSUMPTION_COLUMN: &str = "GRID_kWh";
/// Default header of the hourly PV generation column.
pub const GENERATION_COLUMN: &str = "PV_roofs_top_E_kWh";

/// Header names of the two columns to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileColumns {
    pub consumption: String,
    pub generation: String,
}

impl Default for ProfileColumns {
    fn default() -> Self {
        Self {
            consumption: CONSUMPTION_COLUMN.to_string(),
            generation: GENERATION_COLUMN.to_string(),
        }
    }
}

/// Loads both profiles from a CSV file with a header row.
///
/// # Errors
///
/// Returns `DataFormat` if the file cannot be opened or its content is
/// rejected by [`read_profiles`].
pub fn load_profiles(path: &Path, columns: &ProfileColumns) -> Result<BuildingProfiles> {
    let file = File::open(path).map_err(|e| {
        LifecycleError::data(format!("cannot open \"{}\": {e}", path.display()))
    })?;
    let profiles = read_profiles(BufReader::new(file), columns)
        .map_err(|e| match e {
            LifecycleError::DataFormat(msg) => {
                LifecycleError::data(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;
    debug!(
        path = %path.display(),
        hours = profiles.consumption.len(),
        "loaded hourly profiles"
    );
    Ok(profiles)
}

/// Reads both profiles from CSV with a header row.
///
/// Columns other than the two named ones are ignored. Each data row is one
/// hour; values are not otherwise checked.
///
/// # Errors
///
/// Returns `DataFormat` if a column is missing, a value is not a number, a
/// row is malformed, or there are no data rows.
pub fn read_profiles(reader: impl Read, columns: &ProfileColumns) -> Result<BuildingProfiles> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| LifecycleError::data(format!("cannot read header row: {e}")))?
        .clone();
    let cons_idx = column_index(&headers, &columns.consumption)?;
    let gen_idx = column_index(&headers, &columns.generation)?;

    let mut consumption = Vec::new();
    let mut generation = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        // Row 1 is the header.
        let row = i + 2;
        let record =
            record.map_err(|e| LifecycleError::data(format!("row {row}: {e}")))?;
        consumption.push(parse_cell(&record, cons_idx, &columns.consumption, row)?);
        generation.push(parse_cell(&record, gen_idx, &columns.generation, row)?);
    }

    if consumption.is_empty() {
        return Err(LifecycleError::data("no data rows"));
    }

    Ok(BuildingProfiles {
        consumption: HourlyProfile::new(consumption),
        generation: HourlyProfile::new(generation),
    })
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| LifecycleError::data(format!("missing column \"{name}\"")))
}

fn parse_cell(record: &csv::StringRecord, idx: usize, column: &str, row: usize) -> Result<f64> {
    let raw = record.get(idx).ok_or_else(|| {
        LifecycleError::data(format!("row {row}: missing value for \"{column}\""))
    })?;
    raw.parse::<f64>().map_err(|_| {
        LifecycleError::data(format!(
            "row {row}: \"{column}\" value \"{raw}\" is not a number"
        ))
    })
}
