//! Trait and types for interacting with a keyed time-series provider.

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

/// One tidy observation of a keyed time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub series_id: String,
    pub year: i32,
    /// Provider period code, e.g. `M01` for January or `Q2`.
    pub period: String,
    /// Missing values stay missing; they are never zero-filled.
    pub value: Option<f64>,
    /// First day of the observation's month/quarter/year, when the period
    /// code maps to a calendar date.
    pub date: Option<NaiveDate>,
}

/// Abstraction over a time-series provider (e.g. BLS).
///
/// Keyed series identifiers go in, tidy observation rows come out; the
/// analysis side never sees the provider's wire format.
#[async_trait::async_trait]
pub trait TimeSeriesApi {
    async fn fetch_series(
        &self,
        series_ids: &[&str],
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<Observation>>;
}
