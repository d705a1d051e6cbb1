// Record decoder - turns raw collector payloads into telemetry readings
use crate::domain::telemetry::TelemetryReading;
use crate::error::RecordError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(alias = "imei")]
    device_id: String,
    timestamp: RawTimestamp,
    #[serde(default, alias = "values", alias = "io_elements")]
    io: BTreeMap<String, Value>,
    #[serde(default)]
    engine_on: Option<bool>,
    #[serde(default)]
    speed: Option<f64>,
    #[serde(default)]
    distance: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

impl RawTimestamp {
    fn resolve(self) -> Result<DateTime<Utc>, RecordError> {
        match self {
            RawTimestamp::Millis(ms) => DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| RecordError::Timestamp(ms.to_string())),
            RawTimestamp::Text(text) => DateTime::parse_from_rfc3339(&text)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|_| RecordError::Timestamp(text)),
        }
    }
}

/// Numeric value of one I/O element. `Ok(None)` means not reported.
fn coerce_value(id: u32, value: &Value) -> Result<Option<f64>, RecordError> {
    let invalid = || RecordError::Value {
        id,
        value: value.to_string(),
    };
    let number = match value {
        Value::Null => return Ok(None),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().ok_or_else(invalid)?,
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| invalid())?,
        Value::Array(_) | Value::Object(_) => return Err(invalid()),
    };
    if number.is_finite() {
        Ok(Some(number))
    } else {
        Err(invalid())
    }
}

pub fn decode_value(value: Value) -> Result<TelemetryReading, RecordError> {
    let raw: RawRecord = serde_json::from_value(value)?;
    let timestamp = raw.timestamp.resolve()?;

    let mut values = BTreeMap::new();
    for (key, value) in &raw.io {
        let wide: u64 = key
            .trim()
            .parse()
            .map_err(|_| RecordError::ParameterId(key.clone()))?;
        let Ok(id) = u32::try_from(wide) else {
            tracing::debug!("Dropping I/O element {} outside the parameter id range", key);
            continue;
        };
        if let Some(number) = coerce_value(id, value)? {
            values.insert(id, number);
        }
    }

    Ok(TelemetryReading {
        device_id: raw.device_id,
        timestamp,
        values,
        engine_on: raw.engine_on,
        speed: raw.speed,
        distance: raw.distance,
    })
}

pub fn decode_record(text: &str) -> Result<TelemetryReading, RecordError> {
    let value: Value = serde_json::from_str(text)?;
    decode_value(value)
}

/// Decode one record per line, skipping blank lines and logging bad records.
pub fn decode_records<'a, I>(lines: I) -> Vec<TelemetryReading>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut readings = Vec::new();
    let mut skipped = 0usize;

    for (index, line) in lines.into_iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match decode_record(line) {
            Ok(reading) => readings.push(reading),
            Err(e) => {
                skipped += 1;
                tracing::warn!("Skipping telemetry record {}: {}", index + 1, e);
            }
        }
    }

    if skipped > 0 {
        tracing::debug!("Decoded {} records, skipped {}", readings.len(), skipped);
    }
    readings
}
