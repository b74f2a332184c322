//! Outcome differences across institution control types.

use std::collections::BTreeMap;

use tracing::info;

use crate::analyzers::types::InstitutionTypeEffect;
use crate::analyzers::utility::{mean_present, median_present, rate_present};
use crate::prepare::{PreparedData, PreparedRecord};

/// Group label for records whose control code is missing or unrecognized.
const UNKNOWN_LABEL: &str = "Unknown";

/// Analyzes underemployment risk differences by institution type.
///
/// Records with an unrecognized or missing control code are grouped under
/// `Unknown` rather than dropped. Groups come back sorted by label, with
/// `Unknown` last, so repeated runs produce identical tables.
pub fn analyze_institution_type_effects(data: &PreparedData) -> Vec<InstitutionTypeEffect> {
    let mut groups: BTreeMap<&str, Vec<&PreparedRecord>> = BTreeMap::new();
    for record in &data.records {
        groups
            .entry(record.control_label.unwrap_or(UNKNOWN_LABEL))
            .or_default()
            .push(record);
    }

    // BTreeMap iteration is alphabetical; pull Unknown out so it trails
    let unknown = groups.remove(UNKNOWN_LABEL);

    let mut effects: Vec<InstitutionTypeEffect> = groups
        .into_iter()
        .map(|(label, members)| type_effect(label, &members))
        .collect();
    if let Some(members) = unknown {
        effects.push(type_effect(UNKNOWN_LABEL, &members));
    }

    info!(groups = effects.len(), "Institution type analysis complete");
    effects
}

fn type_effect(label: &str, members: &[&PreparedRecord]) -> InstitutionTypeEffect {
    InstitutionTypeEffect {
        control_label: label.to_string(),
        median_earnings: median_present(members.iter().map(|r| r.earnings())),
        mean_earnings: mean_present(members.iter().map(|r| r.earnings())),
        low_earnings_rate: rate_present(members.iter().map(|r| r.low_earnings)),
        mean_repayment_rate: mean_present(members.iter().map(|r| r.repayment_rate())),
        mean_completion_rate: mean_present(members.iter().map(|r| r.completion_rate())),
        mean_pell_percentage: mean_present(members.iter().map(|r| r.pell_percentage())),
        n_institutions: members.len(),
    }
}
