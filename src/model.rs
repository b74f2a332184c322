//! Record types and static lookup tables for College Scorecard data.
//!
//! Scorecard CSVs mix real numbers with sentinels like `NULL` and
//! `PrivacySuppressed`, so every numeric cell deserializes leniently into
//! an `Option<f64>`: anything that does not parse becomes `None`.

use serde::{Deserialize, Deserializer};

/// PCIP field-of-study codes mapped to human-readable names.
pub static FIELD_MAPPING: &[(&str, &str)] = &[
    ("PCIP01", "Agriculture"),
    ("PCIP03", "Natural Resources"),
    ("PCIP04", "Architecture"),
    ("PCIP09", "Communication"),
    ("PCIP10", "Communications Technologies"),
    ("PCIP11", "Computer Science"),
    ("PCIP13", "Education"),
    ("PCIP14", "Engineering"),
    ("PCIP15", "Engineering Technologies"),
    ("PCIP16", "Foreign Languages"),
    ("PCIP19", "Family/Consumer Sciences"),
    ("PCIP22", "Legal Professions"),
    ("PCIP23", "English"),
    ("PCIP24", "Liberal Arts"),
    ("PCIP26", "Biological Sciences"),
    ("PCIP27", "Mathematics"),
    ("PCIP38", "Philosophy/Religion"),
    ("PCIP39", "Theology"),
    ("PCIP40", "Physical Sciences"),
    ("PCIP42", "Psychology"),
    ("PCIP43", "Security/Protective Services"),
    ("PCIP44", "Public Administration"),
    ("PCIP45", "Social Sciences"),
    ("PCIP50", "Visual/Performing Arts"),
    ("PCIP51", "Health Professions"),
    ("PCIP52", "Business/Management"),
];

/// Scorecard `CONTROL` codes mapped to institution-type labels.
pub static INSTITUTION_TYPES: &[(i64, &str)] = &[
    (1, "Public"),
    (2, "Private Nonprofit"),
    (3, "Private For-Profit"),
];

/// Decodes a raw `CONTROL` value into its static label.
///
/// Returns `None` for missing, fractional, or unrecognized codes.
pub fn control_label(control: Option<f64>) -> Option<&'static str> {
    let c = control?;
    if c.fract() != 0.0 {
        return None;
    }
    INSTITUTION_TYPES
        .iter()
        .find(|(code, _)| *code == c as i64)
        .map(|(_, label)| *label)
}

/// One row of a College Scorecard file, deserialized by header name.
///
/// Columns absent from the file become `None` fields rather than load
/// errors, so reduced extracts of the full Scorecard still load.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstitutionRecord {
    #[serde(rename = "UNITID", default, deserialize_with = "lenient_u32")]
    pub unitid: Option<u32>,
    #[serde(rename = "INSTNM", default)]
    pub instnm: Option<String>,
    #[serde(rename = "STABBR", default)]
    pub stabbr: Option<String>,

    /// Median earnings 10 years after entry, in dollars.
    #[serde(rename = "MD_EARN_WNE_P10", default, deserialize_with = "lenient_f64")]
    pub md_earn_wne_p10: Option<f64>,
    /// Completion rate within 150% of expected time, pooled/suppressed.
    #[serde(rename = "C150_4_POOLED_SUPP", default, deserialize_with = "lenient_f64")]
    pub c150_4_pooled_supp: Option<f64>,
    /// 3-year federal loan repayment rate.
    #[serde(rename = "RPY_3YR_RT_SUPP", default, deserialize_with = "lenient_f64")]
    pub rpy_3yr_rt_supp: Option<f64>,
    /// Share of students receiving Pell grants.
    #[serde(rename = "PCTPELL", default, deserialize_with = "lenient_f64")]
    pub pctpell: Option<f64>,
    /// Share of students with federal loans.
    #[serde(rename = "PCTFLOAN", default, deserialize_with = "lenient_f64")]
    pub pctfloan: Option<f64>,
    /// Total undergraduate enrollment.
    #[serde(rename = "UGDS", default, deserialize_with = "lenient_f64")]
    pub ugds: Option<f64>,
    /// Institution control code (1 public, 2 private nonprofit, 3 for-profit).
    #[serde(rename = "CONTROL", default, deserialize_with = "lenient_f64")]
    pub control: Option<f64>,
    /// Predominant degree type code.
    #[serde(rename = "PREDDEG", default, deserialize_with = "lenient_f64")]
    pub preddeg: Option<f64>,

    // Field-of-study degree shares, one per mapped PCIP code.
    #[serde(rename = "PCIP01", default, deserialize_with = "lenient_f64")]
    pub pcip01: Option<f64>,
    #[serde(rename = "PCIP03", default, deserialize_with = "lenient_f64")]
    pub pcip03: Option<f64>,
    #[serde(rename = "PCIP04", default, deserialize_with = "lenient_f64")]
    pub pcip04: Option<f64>,
    #[serde(rename = "PCIP09", default, deserialize_with = "lenient_f64")]
    pub pcip09: Option<f64>,
    #[serde(rename = "PCIP10", default, deserialize_with = "lenient_f64")]
    pub pcip10: Option<f64>,
    #[serde(rename = "PCIP11", default, deserialize_with = "lenient_f64")]
    pub pcip11: Option<f64>,
    #[serde(rename = "PCIP13", default, deserialize_with = "lenient_f64")]
    pub pcip13: Option<f64>,
    #[serde(rename = "PCIP14", default, deserialize_with = "lenient_f64")]
    pub pcip14: Option<f64>,
    #[serde(rename = "PCIP15", default, deserialize_with = "lenient_f64")]
    pub pcip15: Option<f64>,
    #[serde(rename = "PCIP16", default, deserialize_with = "lenient_f64")]
    pub pcip16: Option<f64>,
    #[serde(rename = "PCIP19", default, deserialize_with = "lenient_f64")]
    pub pcip19: Option<f64>,
    #[serde(rename = "PCIP22", default, deserialize_with = "lenient_f64")]
    pub pcip22: Option<f64>,
    #[serde(rename = "PCIP23", default, deserialize_with = "lenient_f64")]
    pub pcip23: Option<f64>,
    #[serde(rename = "PCIP24", default, deserialize_with = "lenient_f64")]
    pub pcip24: Option<f64>,
    #[serde(rename = "PCIP26", default, deserialize_with = "lenient_f64")]
    pub pcip26: Option<f64>,
    #[serde(rename = "PCIP27", default, deserialize_with = "lenient_f64")]
    pub pcip27: Option<f64>,
    #[serde(rename = "PCIP38", default, deserialize_with = "lenient_f64")]
    pub pcip38: Option<f64>,
    #[serde(rename = "PCIP39", default, deserialize_with = "lenient_f64")]
    pub pcip39: Option<f64>,
    #[serde(rename = "PCIP40", default, deserialize_with = "lenient_f64")]
    pub pcip40: Option<f64>,
    #[serde(rename = "PCIP42", default, deserialize_with = "lenient_f64")]
    pub pcip42: Option<f64>,
    #[serde(rename = "PCIP43", default, deserialize_with = "lenient_f64")]
    pub pcip43: Option<f64>,
    #[serde(rename = "PCIP44", default, deserialize_with = "lenient_f64")]
    pub pcip44: Option<f64>,
    #[serde(rename = "PCIP45", default, deserialize_with = "lenient_f64")]
    pub pcip45: Option<f64>,
    #[serde(rename = "PCIP50", default, deserialize_with = "lenient_f64")]
    pub pcip50: Option<f64>,
    #[serde(rename = "PCIP51", default, deserialize_with = "lenient_f64")]
    pub pcip51: Option<f64>,
    #[serde(rename = "PCIP52", default, deserialize_with = "lenient_f64")]
    pub pcip52: Option<f64>,
}

impl InstitutionRecord {
    /// Resolves a PCIP code to this institution's degree share in that field.
    ///
    /// Returns `None` both for a missing cell and for an unmapped code.
    pub fn field_share(&self, code: &str) -> Option<f64> {
        match code {
            "PCIP01" => self.pcip01,
            "PCIP03" => self.pcip03,
            "PCIP04" => self.pcip04,
            "PCIP09" => self.pcip09,
            "PCIP10" => self.pcip10,
            "PCIP11" => self.pcip11,
            "PCIP13" => self.pcip13,
            "PCIP14" => self.pcip14,
            "PCIP15" => self.pcip15,
            "PCIP16" => self.pcip16,
            "PCIP19" => self.pcip19,
            "PCIP22" => self.pcip22,
            "PCIP23" => self.pcip23,
            "PCIP24" => self.pcip24,
            "PCIP26" => self.pcip26,
            "PCIP27" => self.pcip27,
            "PCIP38" => self.pcip38,
            "PCIP39" => self.pcip39,
            "PCIP40" => self.pcip40,
            "PCIP42" => self.pcip42,
            "PCIP43" => self.pcip43,
            "PCIP44" => self.pcip44,
            "PCIP45" => self.pcip45,
            "PCIP50" => self.pcip50,
            "PCIP51" => self.pcip51,
            "PCIP52" => self.pcip52,
            _ => None,
        }
    }
}

/// Numeric cell parser that never fails: sentinels, blanks, and garbage
/// all become `None`. Non-finite parses (e.g. literal `NaN`) are also
/// dropped so they cannot poison aggregates.
fn lenient_f64<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    Ok(raw
        .as_deref()
        .map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite()))
}

fn lenient_u32<'de, D>(de: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    Ok(raw.as_deref().map(str::trim).and_then(|s| s.parse().ok()))
}
