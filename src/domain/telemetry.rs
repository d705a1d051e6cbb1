// Telemetry reading and decoded value domain models
use super::parameter::Category;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

const IGNITION_ID: u32 = 239;
const ENGINE_RPM_ID: u32 = 36;
const SPEED_ID: u32 = 24;
const ODOMETER_ID: u32 = 16;

/// One sampled instant from a device. Raw values are keyed by parameter id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryReading {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub values: BTreeMap<u32, f64>,
    pub engine_on: Option<bool>,
    pub speed: Option<f64>,
    pub distance: Option<f64>,
}

impl TelemetryReading {
    pub fn new(device_id: String, timestamp: DateTime<Utc>, values: BTreeMap<u32, f64>) -> Self {
        Self {
            device_id,
            timestamp,
            values,
            engine_on: None,
            speed: None,
            distance: None,
        }
    }

    pub fn raw(&self, id: u32) -> Option<f64> {
        self.values.get(&id).copied()
    }

    /// Engine state from the pre-extracted flag, falling back to ignition, then RPM.
    pub fn engine_running(&self) -> bool {
        if let Some(on) = self.engine_on {
            return on;
        }
        if let Some(ignition) = self.raw(IGNITION_ID) {
            return ignition > 0.0;
        }
        self.raw(ENGINE_RPM_ID).is_some_and(|rpm| rpm > 0.0)
    }

    pub fn speed_kph(&self) -> Option<f64> {
        self.speed.or_else(|| self.raw(SPEED_ID))
    }

    /// Cumulative distance in metres.
    pub fn distance_m(&self) -> Option<f64> {
        self.distance.or_else(|| self.raw(ODOMETER_ID))
    }
}

/// Result of decoding one raw value. Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertedValue {
    pub id: u32,
    pub name: String,
    pub raw: f64,
    pub value: f64,
    pub unit: String,
    pub category: Option<Category>,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConvertedValue {
    pub fn is_unknown(&self) -> bool {
        self.error.is_some()
    }
}
