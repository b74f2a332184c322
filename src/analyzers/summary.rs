//! Dataset-wide summary statistics.

use crate::analyzers::types::SummaryStats;
use crate::analyzers::utility::median_present;
use crate::prepare::PreparedData;

pub fn generate_summary_stats(data: &PreparedData) -> SummaryStats {
    SummaryStats {
        total_institutions: data.records.len(),
        institutions_with_earnings: data
            .records
            .iter()
            .filter(|r| r.earnings().is_some())
            .count(),
        median_earnings: median_present(data.records.iter().map(|r| r.earnings())),
        median_completion_rate: median_present(data.records.iter().map(|r| r.completion_rate())),
        median_pell_percentage: median_present(data.records.iter().map(|r| r.pell_percentage())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InstitutionRecord;
    use crate::prepare::prepare;

    #[test]
    fn test_counts_and_medians() {
        let data = prepare(vec![
            InstitutionRecord {
                md_earn_wne_p10: Some(30_000.0),
                pctpell: Some(0.4),
                ..Default::default()
            },
            InstitutionRecord {
                md_earn_wne_p10: Some(50_000.0),
                pctpell: Some(0.6),
                ..Default::default()
            },
            InstitutionRecord::default(),
        ]);

        let stats = generate_summary_stats(&data);
        assert_eq!(stats.total_institutions, 3);
        assert_eq!(stats.institutions_with_earnings, 2);
        assert_eq!(stats.median_earnings, Some(40_000.0));
        assert_eq!(stats.median_pell_percentage, Some(0.5));
        assert_eq!(stats.median_completion_rate, None);
    }
}
