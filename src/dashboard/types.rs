use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::models::{MedicalRecord, TimeWindow};

/// Caption of the single chart dataset.
pub const SERIES_CAPTION: &str = "Diseases and expenditure on them in rupees";

/// An opaque RGB color for one chart entry. Serializes as `rgb(r, g, b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Scalar spending summary of one record set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AggregateResult {
    pub total_fees: f64,
    pub total_medicines: f64,
    pub grand_total: f64,
}

/// Chart-ready per-record series. The three sequences are index-aligned
/// and always the same length as the record set they came from.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChartSeries {
    pub caption: &'static str,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<Color>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// One issued fetch. Ids increase monotonically per orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FetchRequest {
    pub id: u64,
    pub window: TimeWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Resolved,
    Failed,
}

/// The store rejected the current request.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Fetch {request_id} for {window} failed: {reason}")]
pub struct FetchFailure {
    pub request_id: u64,
    pub window: TimeWindow,
    pub reason: String,
}

/// The records, series and totals produced by one successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveData {
    pub request: FetchRequest,
    pub records: Vec<MedicalRecord>,
    pub series: ChartSeries,
    pub totals: AggregateResult,
}

/// Read-only snapshot handed to the presentation layer.
///
/// `live` is the last successfully resolved tuple; it stays populated
/// while a newer fetch is loading or after it failed, and is `None` only
/// before the first success (or after sign-out).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardView {
    pub window: TimeWindow,
    pub status: FetchStatus,
    pub loading: bool,
    pub pending: Option<FetchRequest>,
    pub failure: Option<FetchFailure>,
    pub live: Option<Arc<LiveData>>,
}

impl DashboardView {
    pub fn idle(window: TimeWindow) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    pub fn records(&self) -> &[MedicalRecord] {
        self.live.as_deref().map(|l| l.records.as_slice()).unwrap_or(&[])
    }

    pub fn totals(&self) -> AggregateResult {
        self.live.as_deref().map(|l| l.totals).unwrap_or_default()
    }
}

/// How an issued fetch ended.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Result was current and is now the live tuple.
    Applied { record_count: usize },
    /// Store failed while the request was current.
    Failed(FetchFailure),
    /// A newer request (or sign-out) superseded this one; result dropped.
    Superseded,
    /// The fetch task itself died before resolving.
    Aborted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_serializes_as_css_rgb() {
        let json = serde_json::to_string(&Color::rgb(12, 200, 7)).unwrap();
        assert_eq!(json, "\"rgb(12, 200, 7)\"");
    }

    #[test]
    fn idle_view_is_blank() {
        let view = DashboardView::idle(TimeWindow::Yearly);
        assert_eq!(view.window, TimeWindow::Yearly);
        assert_eq!(view.status, FetchStatus::Idle);
        assert!(!view.loading);
        assert!(view.records().is_empty());
        assert_eq!(view.totals(), AggregateResult::default());
    }

    #[test]
    fn view_serializes_status_in_snake_case() {
        let view = DashboardView::idle(TimeWindow::Monthly);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "idle");
        assert_eq!(json["window"], "monthly");
        assert!(json["live"].is_null());
    }
}
