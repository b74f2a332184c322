//! Data types produced by the analysis pipeline.

use serde::Serialize;

/// Underemployment risk metrics for one field of study.
#[derive(Debug, Serialize)]
pub struct FieldRisk {
    pub field: String,
    pub median_earnings: f64,
    /// Mean low-earnings rate across qualifying institutions, the
    /// underemployment proxy this analysis ranks by.
    pub low_earnings_rate: f64,
    pub n_institutions: usize,
}

/// One completion-rate quantile bucket.
#[derive(Debug, Serialize)]
pub struct CompletionBucket {
    pub quartile: String,
    pub median_earnings: Option<f64>,
    pub mean_earnings: Option<f64>,
    pub n_institutions: usize,
    pub mean_repayment_rate: Option<f64>,
    pub mean_pell_percentage: Option<f64>,
}

/// Outcome comparison for one institution control type.
#[derive(Debug, Serialize)]
pub struct InstitutionTypeEffect {
    pub control_label: String,
    pub median_earnings: Option<f64>,
    pub mean_earnings: Option<f64>,
    pub low_earnings_rate: Option<f64>,
    pub mean_repayment_rate: Option<f64>,
    pub mean_completion_rate: Option<f64>,
    pub mean_pell_percentage: Option<f64>,
    pub n_institutions: usize,
}

/// One fixed Pell-percentage stratum.
#[derive(Debug, Serialize)]
pub struct PellBucket {
    pub category: String,
    pub median_earnings: Option<f64>,
    pub low_earnings_rate: Option<f64>,
    pub mean_repayment_rate: Option<f64>,
    pub mean_completion_rate: Option<f64>,
    pub n_institutions: usize,
}

/// One side of the scarring comparison (flagged vs. unflagged).
#[derive(Debug, Serialize)]
pub struct ScarringGroup {
    pub label: &'static str,
    pub median_earnings: Option<f64>,
    pub mean_completion_rate: Option<f64>,
    pub mean_repayment_rate: Option<f64>,
    pub mean_pell_percentage: Option<f64>,
    pub n_institutions: usize,
}

/// Scarring pattern statistics over the whole table.
#[derive(Debug, Serialize)]
pub struct ScarringAnalysis {
    pub high_risk_count: usize,
    /// Share of institutions carrying the high-risk flag, in [0, 1].
    pub high_risk_percentage: f64,
    pub comparison: Vec<ScarringGroup>,
}

/// Dataset-wide summary statistics.
#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub total_institutions: usize,
    pub institutions_with_earnings: usize,
    pub median_earnings: Option<f64>,
    pub median_completion_rate: Option<f64>,
    pub median_pell_percentage: Option<f64>,
}

/// Complete result bundle from one pipeline run.
///
/// Sub-analyses that could not run (scarring without its columns, a
/// completion gradient with too few distinct values) are `None`; the rest
/// of the bundle is still valid output.
#[derive(Debug, Serialize)]
pub struct AnalysisResults {
    pub summary: SummaryStats,
    pub field_risk: Vec<FieldRisk>,
    pub completion_gradient: Option<Vec<CompletionBucket>>,
    pub institution_effects: Vec<InstitutionTypeEffect>,
    pub socioeconomic_patterns: Vec<PellBucket>,
    pub scarring: Option<ScarringAnalysis>,
}
