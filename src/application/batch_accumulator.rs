// Batch accumulator - pivots readings into per-parameter series in one pass
use crate::domain::batch::{AnalysisWindow, ParameterSeries, ReadingBatch};
use crate::domain::catalog::Catalog;
use crate::domain::telemetry::TelemetryReading;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug)]
pub struct BatchAccumulator {
    device_id: String,
    series: BTreeMap<u16, ParameterSeries>,
    sample_count: usize,
    window: Option<AnalysisWindow>,
    unknown_ids: BTreeSet<u32>,
}

impl BatchAccumulator {
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            series: BTreeMap::new(),
            sample_count: 0,
            window: None,
            unknown_ids: BTreeSet::new(),
        }
    }

    /// Fold one reading into the per-parameter series.
    pub fn push(&mut self, reading: &TelemetryReading) {
        if reading.device_id != self.device_id {
            tracing::warn!(
                "Ignoring reading for device {} in batch for {}",
                reading.device_id,
                self.device_id
            );
            return;
        }

        self.sample_count += 1;
        self.window = Some(match self.window {
            None => AnalysisWindow::new(reading.timestamp, reading.timestamp),
            Some(w) => AnalysisWindow::new(w.start.min(reading.timestamp), w.end.max(reading.timestamp)),
        });

        let catalog = Catalog::global();
        for (&id, &raw) in &reading.values {
            let Some(def) = u16::try_from(id).ok().and_then(|id| catalog.lookup(id)) else {
                self.unknown_ids.insert(id);
                continue;
            };
            let value = def.rule.apply(raw);
            if !value.is_finite() {
                continue;
            }
            self.series
                .entry(def.id)
                .or_insert_with(|| ParameterSeries {
                    id: def.id,
                    name: def.name.to_string(),
                    unit: def.unit.to_string(),
                    category: def.category,
                    values: Vec::new(),
                })
                .values
                .push(value);
        }
    }

    pub fn unknown_ids(&self) -> &BTreeSet<u32> {
        &self.unknown_ids
    }

    pub fn finish(self) -> ReadingBatch {
        if !self.unknown_ids.is_empty() {
            tracing::debug!(
                "Batch for {} carried {} parameter ids missing from the catalog: {:?}",
                self.device_id,
                self.unknown_ids.len(),
                self.unknown_ids
            );
        }
        ReadingBatch {
            device_id: self.device_id,
            window: self.window,
            sample_count: self.sample_count,
            series: self.series.into_values().collect(),
        }
    }
}

/// Accumulate a device's readings, keeping only the most recent `max_samples`.
///
/// Readings are expected in time order; the cap drops from the front and
/// counts only readings for `device_id`.
pub fn accumulate(
    device_id: &str,
    readings: &[TelemetryReading],
    max_samples: Option<usize>,
) -> ReadingBatch {
    let own: Vec<&TelemetryReading> = readings
        .iter()
        .filter(|r| r.device_id == device_id)
        .collect();
    if own.len() < readings.len() {
        tracing::warn!(
            "Ignoring {} readings for other devices in batch for {}",
            readings.len() - own.len(),
            device_id
        );
    }
    let start = match max_samples {
        Some(cap) if own.len() > cap => own.len() - cap,
        _ => 0,
    };

    let mut accumulator = BatchAccumulator::new(device_id);
    for reading in &own[start..] {
        accumulator.push(reading);
    }
    accumulator.finish()
}
