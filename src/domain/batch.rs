// Per-parameter series accumulated from one batch of readings
use super::parameter::Category;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Time span covered by a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl AnalysisWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// Converted values for one catalog parameter, in reading order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSeries {
    pub id: u16,
    pub name: String,
    pub unit: String,
    pub category: Category,
    pub values: Vec<f64>,
}

impl ParameterSeries {
    pub fn has_nonzero(&self) -> bool {
        self.values.iter().any(|v| *v != 0.0)
    }
}

/// Readings for one device over one window, pivoted into per-parameter series.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingBatch {
    pub device_id: String,
    pub window: Option<AnalysisWindow>,
    pub sample_count: usize,
    /// Ordered by parameter id.
    pub series: Vec<ParameterSeries>,
}

impl ReadingBatch {
    pub fn series(&self, id: u16) -> Option<&ParameterSeries> {
        self.series.iter().find(|s| s.id == id)
    }
}
