// Spike analysis domain models and domain threshold table
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fixed warning/critical boundary for one parameter, independent of batch statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainThreshold {
    #[serde(default)]
    pub warning: Option<f64>,
    #[serde(default)]
    pub critical: Option<f64>,
    /// Low values are the dangerous ones (fuel level, supply voltage).
    #[serde(default)]
    pub lower_is_worse: bool,
}

impl DomainThreshold {
    pub fn higher(warning: f64, critical: f64) -> Self {
        Self {
            warning: Some(warning),
            critical: Some(critical),
            lower_is_worse: false,
        }
    }

    pub fn lower(warning: f64, critical: f64) -> Self {
        Self {
            warning: Some(warning),
            critical: Some(critical),
            lower_is_worse: true,
        }
    }

    /// True when `value` is on the bad side of `limit`.
    pub fn beyond(&self, value: f64, limit: f64) -> bool {
        if self.lower_is_worse {
            value < limit
        } else {
            value > limit
        }
    }

    /// The boundary that first trips a warning: `warning` if set, else `critical`.
    pub fn alert_level(&self) -> Option<f64> {
        self.warning.or(self.critical)
    }

    pub fn is_warning(&self, value: f64) -> bool {
        self.warning.is_some_and(|w| self.beyond(value, w))
            || self.critical.is_some_and(|c| self.beyond(value, c))
    }

    pub fn is_critical(&self, value: f64) -> bool {
        self.critical.is_some_and(|c| self.beyond(value, c))
    }
}

/// Parameter name -> domain threshold. Parameters without an entry never reach WARNING.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdTable(BTreeMap<String, DomainThreshold>);

impl ThresholdTable {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, parameter: &str) -> DomainThreshold {
        self.0.get(parameter).copied().unwrap_or_default()
    }

    pub fn contains(&self, parameter: &str) -> bool {
        self.0.contains_key(parameter)
    }

    pub fn insert(&mut self, parameter: impl Into<String>, threshold: DomainThreshold) {
        self.0.insert(parameter.into(), threshold);
    }

    /// Entries in `overrides` replace same-named entries here.
    pub fn merge(&mut self, overrides: ThresholdTable) {
        self.0.extend(overrides.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert("Engine RPM", DomainThreshold::higher(4000.0, 5000.0));
        table.insert("CAN Engine RPM", DomainThreshold::higher(4000.0, 5000.0));
        table.insert("Coolant Temperature", DomainThreshold::higher(105.0, 115.0));
        table.insert("CAN Engine Temperature", DomainThreshold::higher(105.0, 115.0));
        table.insert("Engine Oil Temperature", DomainThreshold::higher(120.0, 135.0));
        table.insert("Intake Air Temperature", DomainThreshold::higher(60.0, 75.0));
        table.insert("Engine Load", DomainThreshold::higher(85.0, 95.0));
        table.insert("Throttle Position", DomainThreshold::higher(90.0, 98.0));
        table.insert("Vehicle Speed", DomainThreshold::higher(130.0, 160.0));
        table.insert("Short Fuel Trim", DomainThreshold::higher(10.0, 20.0));
        table.insert("Fuel Rate", DomainThreshold::higher(20.0, 30.0));
        table.insert("Number of DTC", DomainThreshold::higher(0.0, 3.0));
        table.insert("Fuel Level", DomainThreshold::lower(15.0, 5.0));
        table.insert("CAN Fuel Level", DomainThreshold::lower(15.0, 5.0));
        table.insert("Control Module Voltage", DomainThreshold::lower(12.5, 12.0));
        table.insert("External Voltage", DomainThreshold::lower(12.0, 11.5));
        table.insert("Battery Voltage", DomainThreshold::lower(3.6, 3.4));
        table
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Normal,
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Normal => "NORMAL",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
        };
        f.write_str(label)
    }
}

/// Summary statistics for one parameter across one batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpikeAnalysisResult {
    pub parameter: String,
    pub count: usize,
    pub average: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    pub spike_threshold: f64,
    pub spike_count: usize,
    /// Most extreme spike in the parameter's bad direction.
    pub max_spike: Option<f64>,
    pub concerning_count: usize,
    pub critical_count: usize,
    pub severity: Severity,
    pub summary: String,
}

impl SpikeAnalysisResult {
    pub fn has_nonzero_stats(&self) -> bool {
        self.average != 0.0 || self.min != 0.0 || self.max != 0.0
    }
}
