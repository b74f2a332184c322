//! Earnings gradient across completion-rate quantile buckets.

use anyhow::{Result, bail};
use tracing::info;

use crate::analyzers::types::CompletionBucket;
use crate::analyzers::utility::{mean_present, median_present, quantile_sorted};
use crate::prepare::{PreparedData, PreparedRecord};

/// Analyzes earnings patterns by completion-rate quantile.
///
/// Institutions without a completion rate are filtered out, the rest are
/// partitioned into `quartiles` equal-population buckets by quantile edges
/// (right-closed intervals, first bucket takes the minimum). Tied values
/// land in the same bucket.
///
/// # Errors
///
/// Fails when `quartiles` is zero, when no row has a completion rate, or
/// when the column has too few distinct values to form that many buckets.
/// The caller decides whether that is fatal; the pipeline reports the
/// gradient as unavailable.
pub fn analyze_completion_gradient(
    data: &PreparedData,
    quartiles: usize,
) -> Result<Vec<CompletionBucket>> {
    if quartiles == 0 {
        bail!("completion gradient requires at least one bucket");
    }

    let valid: Vec<(&PreparedRecord, f64)> = data
        .records
        .iter()
        .filter_map(|r| r.completion_rate().map(|c| (r, c)))
        .collect();

    if valid.is_empty() {
        bail!("no institutions with completion rate data");
    }

    let mut sorted: Vec<f64> = valid.iter().map(|(_, c)| *c).collect();
    sorted.sort_by(f64::total_cmp);

    let edges: Vec<f64> = (0..=quartiles)
        .map(|i| quantile_sorted(&sorted, i as f64 / quartiles as f64))
        .collect();

    if edges.windows(2).any(|w| w[0] >= w[1]) {
        bail!(
            "completion rate has too few distinct values for {} quantile buckets",
            quartiles
        );
    }

    let mut groups: Vec<Vec<&PreparedRecord>> = (0..quartiles).map(|_| Vec::new()).collect();
    for (record, completion) in &valid {
        let bucket = assign_bucket(*completion, &edges);
        groups[bucket].push(*record);
    }

    let buckets = groups
        .iter()
        .enumerate()
        .map(|(i, members)| CompletionBucket {
            quartile: quartile_label(i, quartiles),
            median_earnings: median_present(members.iter().map(|r| r.earnings())),
            mean_earnings: mean_present(members.iter().map(|r| r.earnings())),
            n_institutions: members.len(),
            mean_repayment_rate: mean_present(members.iter().map(|r| r.repayment_rate())),
            mean_pell_percentage: mean_present(members.iter().map(|r| r.pell_percentage())),
        })
        .collect();

    info!(quartiles, institutions = valid.len(), "Completion gradient analysis complete");
    Ok(buckets)
}

/// First right-closed interval containing `value`. The minimum falls into
/// bucket 0 because `edges[0]` is the column minimum.
fn assign_bucket(value: f64, edges: &[f64]) -> usize {
    let last = edges.len() - 2;
    for i in 0..=last {
        if value <= edges[i + 1] {
            return i;
        }
    }
    last
}

fn quartile_label(index: usize, total: usize) -> String {
    if total == 4 {
        let name = match index {
            0 => "Lowest",
            1 => "Low-Mid",
            2 => "Mid-High",
            _ => "Highest",
        };
        format!("Q{}: {}", index + 1, name)
    } else {
        format!("Q{}", index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InstitutionRecord;
    use crate::prepare::prepare;

    fn records_with_completion(rates: &[f64]) -> PreparedData {
        prepare(
            rates
                .iter()
                .enumerate()
                .map(|(i, &c)| InstitutionRecord {
                    c150_4_pooled_supp: Some(c),
                    md_earn_wne_p10: Some(30_000.0 + 1_000.0 * i as f64),
                    ..Default::default()
                })
                .collect(),
        )
    }

    #[test]
    fn test_equal_population_buckets() {
        let rates: Vec<f64> = (0..20).map(|i| i as f64 / 20.0).collect();
        let data = records_with_completion(&rates);

        let buckets = analyze_completion_gradient(&data, 4).unwrap();
        assert_eq!(buckets.len(), 4);
        for b in &buckets {
            assert_eq!(b.n_institutions, 5);
        }
        assert_eq!(buckets[0].quartile, "Q1: Lowest");
        assert_eq!(buckets[3].quartile, "Q4: Highest");
    }

    #[test]
    fn test_gradient_orders_by_completion() {
        // earnings rise with completion, so bucket medians must too
        let rates: Vec<f64> = (0..40).map(|i| i as f64 / 40.0).collect();
        let data = records_with_completion(&rates);

        let buckets = analyze_completion_gradient(&data, 4).unwrap();
        let medians: Vec<f64> = buckets.iter().map(|b| b.median_earnings.unwrap()).collect();
        assert!(medians.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_too_few_distinct_values_is_an_error() {
        let data = records_with_completion(&[0.5, 0.5, 0.5, 0.5, 0.5, 0.6]);
        let result = analyze_completion_gradient(&data, 4);
        assert!(result.is_err());
    }

    #[test]
    fn test_rows_without_completion_are_filtered() {
        let mut records: Vec<InstitutionRecord> = (0..8)
            .map(|i| InstitutionRecord {
                c150_4_pooled_supp: Some(i as f64 / 8.0),
                ..Default::default()
            })
            .collect();
        records.push(InstitutionRecord::default());

        let buckets = analyze_completion_gradient(&prepare(records), 4).unwrap();
        let total: usize = buckets.iter().map(|b| b.n_institutions).sum();
        assert_eq!(total, 8);
    }

    #[test]
    fn test_two_buckets_use_plain_labels() {
        let rates: Vec<f64> = (0..10).map(|i| i as f64 / 10.0).collect();
        let buckets = analyze_completion_gradient(&records_with_completion(&rates), 2).unwrap();
        assert_eq!(buckets[0].quartile, "Q1");
        assert_eq!(buckets[1].quartile, "Q2");
    }

    #[test]
    fn test_zero_buckets_rejected() {
        let data = records_with_completion(&[0.1, 0.2, 0.3]);
        assert!(analyze_completion_gradient(&data, 0).is_err());
    }
}
