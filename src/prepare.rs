//! Data preparation: derived indicators computed once over the raw table.
//!
//! Mirrors the preparation step of the underemployment analysis: earnings
//! percentile rank, the low-earnings proxy, institution-type labels, and
//! the high-risk "scarring" indicator. Preparation is a pure function of
//! the raw rows, so running it again over the same input yields the same
//! table.

use tracing::{info, warn};

use crate::model::{InstitutionRecord, control_label};

/// Completion rate below which an institution counts toward the scarring flag.
const SCARRING_COMPLETION_THRESHOLD: f64 = 0.30;
/// Median earnings (dollars) below which an institution counts toward the flag.
const SCARRING_EARNINGS_THRESHOLD: f64 = 30_000.0;
/// 3-year repayment rate below which an institution counts toward the flag.
const SCARRING_REPAYMENT_THRESHOLD: f64 = 0.40;

/// Earnings percentile below which an institution is flagged low-earnings.
const LOW_EARNINGS_PERCENTILE: f64 = 0.25;

/// An institution row enriched with its derived indicators.
#[derive(Debug, Clone)]
pub struct PreparedRecord {
    pub raw: InstitutionRecord,
    /// Rank of this institution's earnings among all institutions with
    /// earnings data, in (0, 1]. `None` when earnings are missing.
    pub earnings_percentile: Option<f64>,
    /// Underemployment proxy: earnings percentile below 0.25.
    pub low_earnings: Option<bool>,
    pub control_label: Option<&'static str>,
    /// Scarring indicator. `None` when the dataset lacks one of the three
    /// underlying columns entirely.
    pub high_risk: Option<bool>,
}

impl PreparedRecord {
    pub fn earnings(&self) -> Option<f64> {
        self.raw.md_earn_wne_p10
    }

    pub fn completion_rate(&self) -> Option<f64> {
        self.raw.c150_4_pooled_supp
    }

    pub fn repayment_rate(&self) -> Option<f64> {
        self.raw.rpy_3yr_rt_supp
    }

    pub fn pell_percentage(&self) -> Option<f64> {
        self.raw.pctpell
    }
}

/// The prepared table. Read-only for every aggregation step.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub records: Vec<PreparedRecord>,
    /// True when completion, earnings, and repayment each have at least one
    /// present value, i.e. the high-risk column was produced.
    pub scarring_available: bool,
}

/// Enriches raw institution rows with the four derived indicators.
pub fn prepare(records: Vec<InstitutionRecord>) -> PreparedData {
    let earnings: Vec<Option<f64>> = records.iter().map(|r| r.md_earn_wne_p10).collect();
    let percentiles = percent_ranks(&earnings);

    let scarring_available = records.iter().any(|r| r.c150_4_pooled_supp.is_some())
        && records.iter().any(|r| r.md_earn_wne_p10.is_some())
        && records.iter().any(|r| r.rpy_3yr_rt_supp.is_some());

    if !scarring_available {
        warn!("scarring indicator unavailable: completion, earnings, or repayment column is empty");
    }

    let prepared: Vec<PreparedRecord> = records
        .into_iter()
        .zip(percentiles)
        .map(|(raw, pct)| {
            let high_risk = scarring_available.then(|| is_high_risk(&raw));
            PreparedRecord {
                low_earnings: pct.map(|p| p < LOW_EARNINGS_PERCENTILE),
                earnings_percentile: pct,
                control_label: control_label(raw.control),
                high_risk,
                raw,
            }
        })
        .collect();

    info!(institutions = prepared.len(), "Data prepared for underemployment analysis");

    PreparedData {
        records: prepared,
        scarring_available,
    }
}

/// A record is high-risk when any present value crosses its threshold.
/// Missing cells never trigger the flag.
fn is_high_risk(raw: &InstitutionRecord) -> bool {
    raw.c150_4_pooled_supp
        .is_some_and(|c| c < SCARRING_COMPLETION_THRESHOLD)
        || raw
            .md_earn_wne_p10
            .is_some_and(|e| e < SCARRING_EARNINGS_THRESHOLD)
        || raw
            .rpy_3yr_rt_supp
            .is_some_and(|r| r < SCARRING_REPAYMENT_THRESHOLD)
}

/// Average-rank percentile over the present values of a column.
///
/// Ties share the mean of the ranks they span; the result for each present
/// value is `avg_rank / n_present`, so the smallest value gets `1/n` and
/// the largest gets `1.0`. Missing cells stay `None`.
fn percent_ranks(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let present: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|x| (i, x)))
        .collect();

    let mut out = vec![None; values.len()];
    let n = present.len();
    if n == 0 {
        return out;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| present[a].1.total_cmp(&present[b].1));

    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && present[order[j + 1]].1 == present[order[i]].1 {
            j += 1;
        }
        // 1-based ranks i+1 ..= j+1, averaged over the tie run
        let avg_rank = (i + j + 2) as f64 / 2.0;
        for &k in &order[i..=j] {
            out[present[k].0] = Some(avg_rank / n as f64);
        }
        i = j + 1;
    }

    out
}
