//! Whole-file CSV loading for College Scorecard data.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::model::InstitutionRecord;

/// Loads every institution row from a Scorecard CSV into memory.
///
/// # Errors
///
/// A missing file or a structurally broken CSV is fatal. Malformed numeric
/// cells are not: they deserialize to `None` (see [`crate::model`]).
pub fn load_records(path: &Path) -> Result<Vec<InstitutionRecord>> {
    let file = File::open(path)
        .with_context(|| format!("College Scorecard data file not found: {}", path.display()))?;

    let records = read_records(file)?;
    info!(
        path = %path.display(),
        institutions = records.len(),
        "Scorecard data loaded"
    );
    Ok(records)
}

/// Reads institution rows from any CSV source. Used directly by tests.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<InstitutionRecord>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: InstitutionRecord = result.context("failed to read Scorecard row")?;
        records.push(record);
    }

    Ok(records)
}
