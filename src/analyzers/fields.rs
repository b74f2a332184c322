//! Field-of-study underemployment risk.

use tracing::info;

use crate::analyzers::types::FieldRisk;
use crate::analyzers::utility::{median_present, rate_present};
use crate::model::FIELD_MAPPING;
use crate::prepare::PreparedData;

/// Analyzes underemployment risk by field of study.
///
/// For each mapped PCIP field, the qualifying set is every institution
/// whose degree share in that field exceeds `field_threshold` and whose
/// earnings are present. Fields with fewer than `min_institutions`
/// qualifying rows are omitted, not reported as zero. Output is sorted
/// descending by low-earnings rate, highest risk first.
pub fn analyze_field_risk(
    data: &PreparedData,
    min_institutions: usize,
    field_threshold: f64,
) -> Vec<FieldRisk> {
    let mut rows = Vec::new();

    for (code, name) in FIELD_MAPPING {
        let qualifying: Vec<_> = data
            .records
            .iter()
            .filter(|r| {
                r.raw.field_share(code).is_some_and(|s| s > field_threshold)
                    && r.earnings().is_some()
            })
            .collect();

        if qualifying.len() < min_institutions {
            continue;
        }

        // qualifying rows all have earnings, so both reducers see values
        let median_earnings = median_present(qualifying.iter().map(|r| r.earnings()));
        let low_earnings_rate = rate_present(qualifying.iter().map(|r| r.low_earnings));

        if let (Some(median_earnings), Some(low_earnings_rate)) = (median_earnings, low_earnings_rate)
        {
            rows.push(FieldRisk {
                field: (*name).to_string(),
                median_earnings,
                low_earnings_rate,
                n_institutions: qualifying.len(),
            });
        }
    }

    rows.sort_by(|a, b| b.low_earnings_rate.total_cmp(&a.low_earnings_rate));

    info!(fields = rows.len(), "Field-level risk analysis complete");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InstitutionRecord;
    use crate::prepare::prepare;

    fn cs_school(earnings: f64) -> InstitutionRecord {
        InstitutionRecord {
            md_earn_wne_p10: Some(earnings),
            pcip11: Some(0.40),
            ..Default::default()
        }
    }

    fn liberal_arts_school(earnings: f64) -> InstitutionRecord {
        InstitutionRecord {
            md_earn_wne_p10: Some(earnings),
            pcip24: Some(0.40),
            ..Default::default()
        }
    }

    #[test]
    fn test_small_fields_are_omitted() {
        let mut records: Vec<_> = (0..12).map(|i| cs_school(50_000.0 + i as f64)).collect();
        // only 3 liberal arts schools, below the cutoff
        records.extend((0..3).map(|i| liberal_arts_school(25_000.0 + i as f64)));

        let out = analyze_field_risk(&prepare(records), 10, 0.10);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].field, "Computer Science");
        assert_eq!(out[0].n_institutions, 12);
    }

    #[test]
    fn test_sorted_by_risk_descending() {
        // 15 low-earning liberal arts schools vs 12 high-earning CS schools:
        // the liberal arts cluster fills the bottom earnings quartile
        let mut records: Vec<_> = (0..15)
            .map(|i| liberal_arts_school(26_000.0 + 200.0 * i as f64))
            .collect();
        records.extend((0..12).map(|i| cs_school(70_000.0 + 500.0 * i as f64)));

        let out = analyze_field_risk(&prepare(records), 10, 0.10);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].field, "Liberal Arts");
        assert_eq!(out[1].field, "Computer Science");
        assert!(out[0].low_earnings_rate > out[1].low_earnings_rate);
        assert_eq!(out[1].low_earnings_rate, 0.0);
    }

    #[test]
    fn test_share_at_threshold_does_not_qualify() {
        let records: Vec<_> = (0..12)
            .map(|i| InstitutionRecord {
                md_earn_wne_p10: Some(40_000.0 + i as f64),
                pcip11: Some(0.10), // exactly at the threshold, not above
                ..Default::default()
            })
            .collect();

        let out = analyze_field_risk(&prepare(records), 10, 0.10);
        assert!(out.is_empty());
    }

    #[test]
    fn test_missing_earnings_excluded_from_qualifying_set() {
        let mut records: Vec<_> = (0..10).map(|i| cs_school(50_000.0 + i as f64)).collect();
        records.push(InstitutionRecord {
            md_earn_wne_p10: None,
            pcip11: Some(0.40),
            ..Default::default()
        });

        let out = analyze_field_risk(&prepare(records), 10, 0.10);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].n_institutions, 10);
    }
}
