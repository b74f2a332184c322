//! Career-trajectory scarring patterns.

use tracing::{info, warn};

use crate::analyzers::types::{ScarringAnalysis, ScarringGroup};
use crate::analyzers::utility::{mean_present, median_present};
use crate::prepare::{PreparedData, PreparedRecord};

/// Analyzes outcomes for institutions flagged high-risk versus the rest.
///
/// Returns `None` when the high-risk indicator could not be derived (one
/// of its three source columns is empty); that is an unavailable analysis,
/// not an error, and the rest of the pipeline proceeds.
pub fn analyze_scarring_patterns(data: &PreparedData) -> Option<ScarringAnalysis> {
    if !data.scarring_available {
        warn!("high-risk indicator not available, skipping scarring analysis");
        return None;
    }

    let (flagged, unflagged): (Vec<&PreparedRecord>, Vec<&PreparedRecord>) = data
        .records
        .iter()
        .partition(|r| r.high_risk == Some(true));

    let total = data.records.len();
    let high_risk_count = flagged.len();
    let high_risk_percentage = if total == 0 {
        0.0
    } else {
        high_risk_count as f64 / total as f64
    };

    let comparison = vec![
        group_summary("Lower Risk", &unflagged),
        group_summary("Higher Risk", &flagged),
    ];

    info!(
        high_risk_count,
        high_risk_percentage, "Scarring analysis complete"
    );

    Some(ScarringAnalysis {
        high_risk_count,
        high_risk_percentage,
        comparison,
    })
}

fn group_summary(label: &'static str, members: &[&PreparedRecord]) -> ScarringGroup {
    ScarringGroup {
        label,
        median_earnings: median_present(members.iter().map(|r| r.earnings())),
        mean_completion_rate: mean_present(members.iter().map(|r| r.completion_rate())),
        mean_repayment_rate: mean_present(members.iter().map(|r| r.repayment_rate())),
        mean_pell_percentage: mean_present(members.iter().map(|r| r.pell_percentage())),
        n_institutions: members.len(),
    }
}
