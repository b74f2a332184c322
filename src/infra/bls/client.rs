use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, warn};

use crate::services::timeseries_api::{Observation, TimeSeriesApi};

/// The BLS public API caps each request at 50 series.
const SERIES_PER_REQUEST: usize = 50;
/// Pause between chunked requests to stay under the rate limit.
const CHUNK_PAUSE: Duration = Duration::from_millis(500);

/// Headline employment series, name → BLS series ID.
pub static EMPLOYMENT_SERIES: &[(&str, &str)] = &[
    ("civilian_labor_force", "LNS11300000"),
    ("employment_level", "LNS12300000"),
    ("unemployment_level", "LNS13000000"),
    ("unemployment_rate", "LNS14000000"),
    ("labor_force_participation", "LNS11300012"),
    ("employment_pop_ratio", "LNS12300012"),
];

/// Youth (16-24) employment series, name → BLS series ID.
pub static YOUTH_SERIES: &[(&str, &str)] = &[
    ("youth_labor_force", "LNS11300012"),
    ("youth_employment", "LNS12300012"),
    ("youth_unemployment_rate", "LNS14000012"),
];

#[derive(Serialize)]
struct SeriesRequest<'a> {
    seriesid: &'a [&'a str],
    startyear: String,
    endyear: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    registrationkey: Option<&'a str>,
}

/// Client for the BLS public time-series API.
///
/// An API key is optional but raises the rate limits considerably.
pub struct BlsClient {
    base_url: String,
    api_key: Option<String>,
}

impl BlsClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            base_url: "https://api.bls.gov/publicAPI/v2/timeseries/data/".to_string(),
            api_key,
        }
    }

    async fn fetch_chunk(
        &self,
        series_ids: &[&str],
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<Observation>> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let payload = SeriesRequest {
            seriesid: series_ids,
            startyear: start_year.to_string(),
            endyear: end_year.to_string(),
            registrationkey: self.api_key.as_deref(),
        };

        let response = client
            .post(&self.base_url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send BLS request: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("BLS API returned status {}: {}", status, body));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse BLS response: {}", e))?;

        if json["status"].as_str() != Some("REQUEST_SUCCEEDED") {
            warn!(
                message = %json["message"],
                "BLS API reported a non-success status"
            );
        }

        Ok(parse_series_payload(&json))
    }
}

#[async_trait]
impl TimeSeriesApi for BlsClient {
    async fn fetch_series(
        &self,
        series_ids: &[&str],
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<Observation>> {
        let mut observations = Vec::new();

        for chunk in series_ids.chunks(SERIES_PER_REQUEST) {
            match self.fetch_chunk(chunk, start_year, end_year).await {
                Ok(mut rows) => observations.append(&mut rows),
                Err(e) => {
                    // one bad chunk does not abort the rest
                    error!(error = %e, "BLS chunk fetch failed");
                }
            }
            tokio::time::sleep(CHUNK_PAUSE).await;
        }

        Ok(observations)
    }
}

/// Extracts tidy observation rows from a BLS response body.
fn parse_series_payload(json: &serde_json::Value) -> Vec<Observation> {
    let Some(series_list) = json["Results"]["series"].as_array() else {
        return Vec::new();
    };

    let mut observations = Vec::new();
    for series in series_list {
        let Some(series_id) = series["seriesID"].as_str() else {
            continue;
        };
        let Some(items) = series["data"].as_array() else {
            continue;
        };

        for item in items {
            let Some(year) = item["year"].as_str().and_then(|y| y.parse::<i32>().ok()) else {
                continue;
            };
            let period = item["period"].as_str().unwrap_or("").to_string();
            let value = item["value"]
                .as_str()
                .filter(|v| !v.is_empty())
                .and_then(|v| v.parse::<f64>().ok());

            observations.push(Observation {
                series_id: series_id.to_string(),
                year,
                date: parse_bls_date(year, &period),
                value,
                period,
            });
        }
    }

    observations
}

/// Maps a BLS year/period pair to the first day it covers.
///
/// `M01`-`M12` are calendar months, `Q1`-`Q4` quarters, anything else is
/// treated as annual. Out-of-range codes (e.g. the `M13` annual average)
/// yield `None`.
fn parse_bls_date(year: i32, period: &str) -> Option<NaiveDate> {
    if let Some(month) = period.strip_prefix('M') {
        let month: u32 = month.parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, 1)
    } else if let Some(quarter) = period.strip_prefix('Q') {
        let quarter: u32 = quarter.parse().ok()?;
        if !(1..=4).contains(&quarter) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, 1, 1)
    }
}
