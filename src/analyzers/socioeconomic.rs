//! Outcome stratification by Pell-grant percentage, a socioeconomic proxy.

use tracing::info;

use crate::analyzers::types::PellBucket;
use crate::analyzers::utility::{mean_present, median_present, rate_present};
use crate::prepare::{PreparedData, PreparedRecord};

/// Fixed Pell strata. Intervals are right-open — a boundary value belongs
/// to the upper bucket — except the last, which is closed at 1.0.
static PELL_CATEGORIES: &[(&str, f64, f64)] = &[
    ("Low (<25%)", 0.0, 0.25),
    ("Moderate (25-50%)", 0.25, 0.5),
    ("High (50-75%)", 0.5, 0.75),
    ("Very High (75-100%)", 0.75, 1.0),
];

/// Analyzes outcomes across the four fixed Pell-percentage strata.
///
/// Only institutions with a Pell percentage participate; out-of-range
/// values (outside [0, 1]) are excluded rather than clamped.
pub fn analyze_socioeconomic_stratification(data: &PreparedData) -> Vec<PellBucket> {
    let mut groups: Vec<Vec<&PreparedRecord>> =
        (0..PELL_CATEGORIES.len()).map(|_| Vec::new()).collect();

    for record in &data.records {
        if let Some(i) = record.pell_percentage().and_then(bucket_index) {
            groups[i].push(record);
        }
    }

    // empty strata are omitted, never zero-filled
    let buckets: Vec<PellBucket> = PELL_CATEGORIES
        .iter()
        .zip(&groups)
        .filter(|(_, members)| !members.is_empty())
        .map(|((label, _, _), members)| PellBucket {
            category: (*label).to_string(),
            median_earnings: median_present(members.iter().map(|r| r.earnings())),
            low_earnings_rate: rate_present(members.iter().map(|r| r.low_earnings)),
            mean_repayment_rate: mean_present(members.iter().map(|r| r.repayment_rate())),
            mean_completion_rate: mean_present(members.iter().map(|r| r.completion_rate())),
            n_institutions: members.len(),
        })
        .collect();

    info!("Socioeconomic stratification analysis complete");
    buckets
}

fn bucket_index(pell: f64) -> Option<usize> {
    PELL_CATEGORIES.iter().position(|&(_, lo, hi)| {
        // last interval is closed on both ends
        pell >= lo && (pell < hi || (hi == 1.0 && pell == 1.0))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InstitutionRecord;
    use crate::prepare::prepare;

    fn school(pell: Option<f64>) -> InstitutionRecord {
        InstitutionRecord {
            pctpell: pell,
            ..Default::default()
        }
    }

    #[test]
    fn test_boundaries_fall_into_upper_bucket() {
        assert_eq!(bucket_index(0.0), Some(0));
        assert_eq!(bucket_index(0.25), Some(1));
        assert_eq!(bucket_index(0.5), Some(2));
        assert_eq!(bucket_index(0.75), Some(3));
        assert_eq!(bucket_index(1.0), Some(3));
    }

    #[test]
    fn test_out_of_range_excluded() {
        assert_eq!(bucket_index(-0.1), None);
        assert_eq!(bucket_index(1.1), None);
    }

    #[test]
    fn test_bucket_counts_and_labels() {
        let data = prepare(vec![
            school(Some(0.10)),
            school(Some(0.25)),
            school(Some(0.30)),
            school(Some(0.99)),
            school(None),
        ]);

        // the High stratum is empty and therefore omitted
        let buckets = analyze_socioeconomic_stratification(&data);
        let counts: Vec<(&str, usize)> = buckets
            .iter()
            .map(|b| (b.category.as_str(), b.n_institutions))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("Low (<25%)", 1),
                ("Moderate (25-50%)", 2),
                ("Very High (75-100%)", 1),
            ]
        );
    }

    #[test]
    fn test_no_pell_data_yields_no_buckets() {
        let data = prepare(vec![school(None), school(None)]);
        assert!(analyze_socioeconomic_stratification(&data).is_empty());
    }
}
