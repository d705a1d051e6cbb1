// Diagnostic report - the engine's serializable output artifact
use super::analysis::Severity;
use super::batch::AnalysisWindow;
use super::parameter::Category;
use serde::Serialize;

/// One ranked entry of the alert list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub parameter: String,
    pub id: u16,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub unit: String,
    pub severity: Severity,
    /// False for fallback entries picked by average when nothing reached WARNING.
    pub critical: bool,
    pub score: f64,
    pub summary: String,
}

/// One line of the full parameter table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterRow {
    pub parameter: String,
    pub id: u16,
    pub category: Category,
    pub average: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    pub unit: String,
    pub samples: usize,
    pub spike_count: usize,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetadata {
    pub device_id: String,
    pub total_samples: usize,
    pub parameters_with_data: usize,
    pub diagnostic_parameters_with_data: usize,
    pub diagnostic_parameters_total: usize,
    pub window: Option<AnalysisWindow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticReport {
    pub critical_alerts: Vec<Finding>,
    pub parameters: Vec<ParameterRow>,
    pub metadata: ReportMetadata,
}

impl DiagnosticReport {
    pub fn has_warnings(&self) -> bool {
        self.critical_alerts.iter().any(|f| f.critical)
    }
}
