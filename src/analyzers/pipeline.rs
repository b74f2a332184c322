//! Orchestration of the full underemployment analysis.

use tracing::{info, warn};

use crate::analyzers::completion::analyze_completion_gradient;
use crate::analyzers::fields::analyze_field_risk;
use crate::analyzers::institution::analyze_institution_type_effects;
use crate::analyzers::scarring::analyze_scarring_patterns;
use crate::analyzers::socioeconomic::analyze_socioeconomic_stratification;
use crate::analyzers::summary::generate_summary_stats;
use crate::analyzers::types::AnalysisResults;
use crate::prepare::PreparedData;

/// Tunable knobs for the pipeline.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Minimum qualifying institutions for a field-risk row.
    pub min_institutions: usize,
    /// Minimum degree share for a field to count at an institution.
    pub field_threshold: f64,
    /// Number of completion-rate quantile buckets.
    pub quartiles: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            min_institutions: 10,
            field_threshold: 0.10,
            quartiles: 4,
        }
    }
}

/// Runs every sub-analysis over the shared prepared table.
///
/// The sub-analyses are independent and read-only; one becoming
/// unavailable (scarring without its columns, a gradient that cannot form
/// its buckets) is logged and carried as `None` without failing the rest.
pub fn run_complete_analysis(data: &PreparedData, opts: &AnalysisOptions) -> AnalysisResults {
    info!("Running complete underemployment analysis pipeline");

    let completion_gradient = match analyze_completion_gradient(data, opts.quartiles) {
        Ok(buckets) => Some(buckets),
        Err(e) => {
            warn!(error = %e, "completion gradient unavailable");
            None
        }
    };

    let results = AnalysisResults {
        summary: generate_summary_stats(data),
        field_risk: analyze_field_risk(data, opts.min_institutions, opts.field_threshold),
        completion_gradient,
        institution_effects: analyze_institution_type_effects(data),
        socioeconomic_patterns: analyze_socioeconomic_stratification(data),
        scarring: analyze_scarring_patterns(data),
    };

    info!("Complete analysis finished");
    results
}
