//! Delimited output: per-aggregator result tables and the causal-analysis
//! extract.
//!
//! All artifacts are write-once files created fresh each run; nothing is
//! appended or mutated afterwards.

use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analyzers::types::AnalysisResults;
use crate::prepare::{PreparedData, PreparedRecord};

/// Reduced row for causal analysis (IV/DiD methods): identifiers, outcome
/// columns, derived indicators, and the six headline field shares.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct CausalRecord {
    pub unitid: Option<u32>,
    pub instnm: Option<String>,
    pub stabbr: Option<String>,
    pub control: Option<f64>,
    pub control_label: Option<String>,
    pub md_earn_wne_p10: Option<f64>,
    pub c150_4_pooled_supp: Option<f64>,
    pub rpy_3yr_rt_supp: Option<f64>,
    pub pctpell: Option<f64>,
    pub pctfloan: Option<f64>,
    pub ugds: Option<f64>,
    pub preddeg: Option<f64>,
    pub low_earnings: Option<bool>,
    pub high_risk: Option<bool>,
    pub earnings_percentile: Option<f64>,
    pub pcip11: Option<f64>,
    pub pcip14: Option<f64>,
    pub pcip24: Option<f64>,
    pub pcip42: Option<f64>,
    pub pcip51: Option<f64>,
    pub pcip52: Option<f64>,
}

impl CausalRecord {
    fn from_prepared(r: &PreparedRecord) -> Self {
        Self {
            unitid: r.raw.unitid,
            instnm: r.raw.instnm.clone(),
            stabbr: r.raw.stabbr.clone(),
            control: r.raw.control,
            control_label: r.control_label.map(str::to_string),
            md_earn_wne_p10: r.raw.md_earn_wne_p10,
            c150_4_pooled_supp: r.raw.c150_4_pooled_supp,
            rpy_3yr_rt_supp: r.raw.rpy_3yr_rt_supp,
            pctpell: r.raw.pctpell,
            pctfloan: r.raw.pctfloan,
            ugds: r.raw.ugds,
            preddeg: r.raw.preddeg,
            low_earnings: r.low_earnings,
            high_risk: r.high_risk,
            earnings_percentile: r.earnings_percentile,
            pcip11: r.raw.pcip11,
            pcip14: r.raw.pcip14,
            pcip24: r.raw.pcip24,
            pcip42: r.raw.pcip42,
            pcip51: r.raw.pcip51,
            pcip52: r.raw.pcip52,
        }
    }
}

/// Writes serializable rows to a fresh CSV file, creating parent
/// directories as needed.
pub fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes each aggregate table produced this run under `dir`, one CSV per
/// analysis, suffixed with `timestamp`.
pub fn export_detailed_results(
    dir: &Path,
    timestamp: &str,
    results: &AnalysisResults,
) -> Result<()> {
    write_table(
        &dir.join(format!("field_risk_{timestamp}.csv")),
        &results.field_risk,
    )?;
    if let Some(gradient) = &results.completion_gradient {
        write_table(
            &dir.join(format!("completion_gradient_{timestamp}.csv")),
            gradient,
        )?;
    }
    write_table(
        &dir.join(format!("institution_effects_{timestamp}.csv")),
        &results.institution_effects,
    )?;
    write_table(
        &dir.join(format!("socioeconomic_patterns_{timestamp}.csv")),
        &results.socioeconomic_patterns,
    )?;

    info!(dir = %dir.display(), "Detailed results saved");
    Ok(())
}

/// Builds the causal-analysis rows from the prepared table.
pub fn causal_records(data: &PreparedData) -> Vec<CausalRecord> {
    data.records.iter().map(CausalRecord::from_prepared).collect()
}

/// Exports the causal-analysis extract and returns the number of rows written.
pub fn export_causal_analysis(path: &Path, data: &PreparedData) -> Result<usize> {
    let rows = causal_records(data);
    write_table(path, &rows)?;
    info!(
        path = %path.display(),
        institutions = rows.len(),
        "Causal analysis dataset exported"
    );
    Ok(rows.len())
}

/// Reloads a previously exported causal extract. Together with the export
/// this must be lossless for every included column.
pub fn load_causal_records(path: &Path) -> Result<Vec<CausalRecord>> {
    let file = File::open(path)
        .with_context(|| format!("causal extract not found: {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InstitutionRecord;
    use crate::prepare::prepare;
    use std::env;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn sample_data() -> PreparedData {
        prepare(
            (0..6)
                .map(|i| InstitutionRecord {
                    unitid: Some(100 + i),
                    instnm: Some(format!("College {i}")),
                    stabbr: Some("MA".to_string()),
                    control: Some(1.0 + (i % 3) as f64),
                    md_earn_wne_p10: Some(20_000.0 + 7_000.0 * f64::from(i)),
                    c150_4_pooled_supp: Some(0.1 + 0.12 * f64::from(i)),
                    rpy_3yr_rt_supp: Some(0.3 + 0.1 * f64::from(i)),
                    pctpell: Some(0.15 * f64::from(i)),
                    pcip11: Some(0.234_567_891), // full-precision round-trip check
                    ..Default::default()
                })
                .collect(),
        )
    }

    #[test]
    fn test_write_table_header_once() {
        let path = temp_path("underemployment_test_table.csv");
        let _ = fs::remove_file(&path);

        let data = sample_data();
        write_table(&path, &causal_records(&data)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("unitid")).count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 7); // header + 6 rows

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_causal_roundtrip_is_lossless() {
        let path = temp_path("underemployment_test_causal.csv");
        let _ = fs::remove_file(&path);

        let data = sample_data();
        let written = export_causal_analysis(&path, &data).unwrap();
        assert_eq!(written, 6);

        let reloaded = load_causal_records(&path).unwrap();
        assert_eq!(reloaded, causal_records(&data));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_causal_record_carries_derived_columns() {
        let data = sample_data();
        let rows = causal_records(&data);
        assert_eq!(rows[0].low_earnings, Some(true));
        assert_eq!(rows[0].high_risk, Some(true));
        assert_eq!(rows[5].low_earnings, Some(false));
        assert_eq!(rows[0].control_label.as_deref(), Some("Public"));
    }

    #[test]
    fn test_missing_cells_roundtrip_as_missing() {
        let path = temp_path("underemployment_test_causal_missing.csv");
        let _ = fs::remove_file(&path);

        let data = prepare(vec![InstitutionRecord {
            unitid: Some(1),
            ..Default::default()
        }]);
        export_causal_analysis(&path, &data).unwrap();

        let reloaded = load_causal_records(&path).unwrap();
        assert_eq!(reloaded[0].md_earn_wne_p10, None);
        assert_eq!(reloaded[0].high_risk, None);
        assert_eq!(reloaded[0].instnm, None);

        fs::remove_file(&path).unwrap();
    }
}
