//! Plain-text report over the analysis result bundle.
//!
//! Sections render in a fixed order; a section whose analysis came back
//! empty or unavailable is skipped rather than padded with zeros. The
//! top-10 cut on field risk is a presentation constant, not part of any
//! aggregator contract.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::analyzers::types::AnalysisResults;

const RULE: &str = "================================================================================";
const THIN_RULE: &str =
    "--------------------------------------------------------------------------------";

/// Number of field-risk rows shown in the report.
const TOP_FIELDS: usize = 10;

/// Renders the full analysis report as a string.
pub fn render_report(results: &AnalysisResults) -> String {
    let mut out = Vec::new();
    out.push(RULE.to_string());
    out.push("UNDEREMPLOYMENT AND CAREER TRAJECTORIES ANALYSIS".to_string());
    out.push(RULE.to_string());
    out.push(String::new());

    render_summary(&mut out, results);
    render_field_risk(&mut out, results);
    render_completion_gradient(&mut out, results);
    render_institution_effects(&mut out, results);
    render_socioeconomic(&mut out, results);
    render_scarring(&mut out, results);
    render_key_findings(&mut out, results);

    out.join("\n")
}

/// Renders the report and writes it to `path`.
pub fn write_report(path: &Path, results: &AnalysisResults) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = render_report(results);
    fs::write(path, &text)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    info!(path = %path.display(), "Report saved");
    Ok(())
}

fn render_summary(out: &mut Vec<String>, results: &AnalysisResults) {
    let stats = &results.summary;
    out.push("SUMMARY STATISTICS".to_string());
    out.push(THIN_RULE.to_string());
    out.push(format!(
        "Total Institutions: {}",
        thousands(stats.total_institutions as i64)
    ));
    out.push(format!(
        "Institutions with Earnings Data: {}",
        thousands(stats.institutions_with_earnings as i64)
    ));
    out.push(format!("Median Earnings: {}", opt_dollars(stats.median_earnings)));
    out.push(format!(
        "Median Completion Rate: {}",
        opt_percent(stats.median_completion_rate)
    ));
    out.push(format!(
        "Median Pell Percentage: {}",
        opt_percent(stats.median_pell_percentage)
    ));
    out.push(String::new());
}

fn render_field_risk(out: &mut Vec<String>, results: &AnalysisResults) {
    if results.field_risk.is_empty() {
        return;
    }
    out.push(format!("FIELD-LEVEL UNDEREMPLOYMENT RISK (Top {TOP_FIELDS})"));
    out.push(THIN_RULE.to_string());
    out.push(format!(
        "{:<30} | {:>15} | {:>10} | {:>5}",
        "Field", "Median Earnings", "Risk", "N"
    ));
    out.push(THIN_RULE.to_string());
    for row in results.field_risk.iter().take(TOP_FIELDS) {
        out.push(format!(
            "{:<30} | {:>15} | {:>10} | {:>5}",
            row.field,
            dollars(row.median_earnings),
            percent(row.low_earnings_rate),
            row.n_institutions
        ));
    }
    out.push(String::new());
}

fn render_completion_gradient(out: &mut Vec<String>, results: &AnalysisResults) {
    let Some(gradient) = &results.completion_gradient else {
        out.push("EARNINGS BY COMPLETION RATE QUARTILE".to_string());
        out.push(THIN_RULE.to_string());
        out.push("(unavailable: completion rates could not be bucketed)".to_string());
        out.push(String::new());
        return;
    };

    out.push("EARNINGS BY COMPLETION RATE QUARTILE".to_string());
    out.push(THIN_RULE.to_string());
    out.push(format!(
        "{:<14} | {:>15} | {:>13} | {:>5} | {:>9} | {:>7}",
        "Quartile", "Median Earnings", "Mean Earnings", "N", "Repayment", "Pell"
    ));
    out.push(THIN_RULE.to_string());
    for b in gradient {
        out.push(format!(
            "{:<14} | {:>15} | {:>13} | {:>5} | {:>9} | {:>7}",
            b.quartile,
            opt_dollars(b.median_earnings),
            opt_dollars(b.mean_earnings),
            b.n_institutions,
            opt_percent(b.mean_repayment_rate),
            opt_percent(b.mean_pell_percentage)
        ));
    }
    out.push(String::new());
}

fn render_institution_effects(out: &mut Vec<String>, results: &AnalysisResults) {
    if results.institution_effects.is_empty() {
        return;
    }
    out.push("INSTITUTION TYPE EFFECTS".to_string());
    out.push(THIN_RULE.to_string());
    out.push(format!(
        "{:<20} | {:>15} | {:>8} | {:>9} | {:>10} | {:>7} | {:>5}",
        "Type", "Median Earnings", "Low-Earn", "Repayment", "Completion", "Pell", "N"
    ));
    out.push(THIN_RULE.to_string());
    for e in &results.institution_effects {
        out.push(format!(
            "{:<20} | {:>15} | {:>8} | {:>9} | {:>10} | {:>7} | {:>5}",
            e.control_label,
            opt_dollars(e.median_earnings),
            opt_percent(e.low_earnings_rate),
            opt_percent(e.mean_repayment_rate),
            opt_percent(e.mean_completion_rate),
            opt_percent(e.mean_pell_percentage),
            e.n_institutions
        ));
    }
    out.push(String::new());
}

fn render_socioeconomic(out: &mut Vec<String>, results: &AnalysisResults) {
    if results.socioeconomic_patterns.is_empty() {
        return;
    }
    out.push("SOCIOECONOMIC STRATIFICATION (by Pell %)".to_string());
    out.push(THIN_RULE.to_string());
    out.push(format!(
        "{:<22} | {:>15} | {:>8} | {:>9} | {:>10} | {:>5}",
        "Category", "Median Earnings", "Low-Earn", "Repayment", "Completion", "N"
    ));
    out.push(THIN_RULE.to_string());
    for b in &results.socioeconomic_patterns {
        out.push(format!(
            "{:<22} | {:>15} | {:>8} | {:>9} | {:>10} | {:>5}",
            b.category,
            opt_dollars(b.median_earnings),
            opt_percent(b.low_earnings_rate),
            opt_percent(b.mean_repayment_rate),
            opt_percent(b.mean_completion_rate),
            b.n_institutions
        ));
    }
    out.push(String::new());
}

fn render_scarring(out: &mut Vec<String>, results: &AnalysisResults) {
    let Some(scarring) = &results.scarring else {
        return;
    };
    out.push("CAREER TRAJECTORY SCARRING PATTERNS".to_string());
    out.push(THIN_RULE.to_string());
    out.push(format!(
        "High-Risk Institutions: {} ({})",
        thousands(scarring.high_risk_count as i64),
        percent(scarring.high_risk_percentage)
    ));
    for g in &scarring.comparison {
        out.push(format!(
            "{:<12}: median earnings {}, completion {}, repayment {}, Pell {} (n={})",
            g.label,
            opt_dollars(g.median_earnings),
            opt_percent(g.mean_completion_rate),
            opt_percent(g.mean_repayment_rate),
            opt_percent(g.mean_pell_percentage),
            g.n_institutions
        ));
    }
    out.push(String::new());
}

/// Key findings derived from whatever results exist.
fn render_key_findings(out: &mut Vec<String>, results: &AnalysisResults) {
    let mut findings = Vec::new();

    if let (Some(highest), Some(lowest)) = (results.field_risk.first(), results.field_risk.last())
        && results.field_risk.len() > 1
    {
        findings.push(format!(
            "{} shows the highest underemployment risk ({}); {} the lowest ({})",
            highest.field,
            percent(highest.low_earnings_rate),
            lowest.field,
            percent(lowest.low_earnings_rate)
        ));
        if lowest.median_earnings > 0.0 && highest.median_earnings > 0.0 {
            findings.push(format!(
                "{:.1}x median-earnings gap between {} and {}",
                lowest.median_earnings.max(highest.median_earnings)
                    / lowest.median_earnings.min(highest.median_earnings),
                lowest.field,
                highest.field
            ));
        }
    }

    if let Some(gradient) = &results.completion_gradient
        && let (Some(first), Some(last)) = (gradient.first(), gradient.last())
        && let (Some(low), Some(high)) = (first.median_earnings, last.median_earnings)
    {
        findings.push(format!(
            "Completion gradient: median earnings {} in the lowest bucket vs {} in the highest",
            dollars(low),
            dollars(high)
        ));
    }

    if let (Some(first), Some(last)) = (
        results.socioeconomic_patterns.first(),
        results.socioeconomic_patterns.last(),
    ) && results.socioeconomic_patterns.len() > 1
        && let (Some(low), Some(high)) = (first.median_earnings, last.median_earnings)
    {
        findings.push(format!(
            "Median earnings {} at {} institutions vs {} at {}",
            dollars(low),
            first.category,
            dollars(high),
            last.category
        ));
    }

    if let Some(scarring) = &results.scarring {
        findings.push(format!(
            "{} of institutions show scarring-pattern risk",
            percent(scarring.high_risk_percentage)
        ));
    }

    if findings.is_empty() {
        return;
    }

    out.push("KEY FINDINGS".to_string());
    out.push(THIN_RULE.to_string());
    for (i, finding) in findings.iter().enumerate() {
        out.push(format!("{}. {}", i + 1, finding));
    }
    out.push(String::new());
}

fn thousands(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn dollars(value: f64) -> String {
    format!("${}", thousands(value.round() as i64))
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn opt_dollars(value: Option<f64>) -> String {
    value.map(dollars).unwrap_or_else(|| "n/a".to_string())
}

fn opt_percent(value: Option<f64>) -> String {
    value.map(percent).unwrap_or_else(|| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::pipeline::{AnalysisOptions, run_complete_analysis};
    use crate::model::InstitutionRecord;
    use crate::prepare::prepare;

    fn full_results() -> AnalysisResults {
        let records: Vec<InstitutionRecord> = (0..24)
            .map(|i| InstitutionRecord {
                unitid: Some(i),
                md_earn_wne_p10: Some(22_000.0 + 2_000.0 * f64::from(i)),
                c150_4_pooled_supp: Some(f64::from(i) / 24.0),
                rpy_3yr_rt_supp: Some(0.3 + f64::from(i) / 60.0),
                pctpell: Some(f64::from(i) / 24.0),
                control: Some(1.0 + (i % 3) as f64),
                pcip24: Some(0.3),
                ..Default::default()
            })
            .collect();
        run_complete_analysis(&prepare(records), &AnalysisOptions::default())
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let text = render_report(&full_results());
        let positions: Vec<usize> = [
            "SUMMARY STATISTICS",
            "FIELD-LEVEL UNDEREMPLOYMENT RISK",
            "EARNINGS BY COMPLETION RATE QUARTILE",
            "INSTITUTION TYPE EFFECTS",
            "SOCIOECONOMIC STRATIFICATION",
            "CAREER TRAJECTORY SCARRING PATTERNS",
            "KEY FINDINGS",
        ]
        .iter()
        .map(|s| text.find(s).unwrap_or_else(|| panic!("missing section {s}")))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_partial_results_still_render() {
        let data = prepare(vec![InstitutionRecord::default()]);
        let results = run_complete_analysis(&data, &AnalysisOptions::default());
        let text = render_report(&results);
        assert!(text.contains("SUMMARY STATISTICS"));
        assert!(text.contains("Total Institutions: 1"));
        assert!(!text.contains("CAREER TRAJECTORY SCARRING PATTERNS"));
    }

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
        assert_eq!(thousands(-45_000), "-45,000");
    }

    #[test]
    fn test_formatters() {
        assert_eq!(dollars(45_000.4), "$45,000");
        assert_eq!(percent(0.125), "12.5%");
        assert_eq!(opt_dollars(None), "n/a");
        assert_eq!(opt_percent(None), "n/a");
    }

    #[test]
    fn test_write_report_creates_file() {
        let path = std::env::temp_dir().join("underemployment_test_report.txt");
        let _ = fs::remove_file(&path);

        write_report(&path, &full_results()).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(RULE));

        fs::remove_file(&path).unwrap();
    }
}
