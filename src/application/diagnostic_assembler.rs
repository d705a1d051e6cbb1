// Diagnostic assembler - ranks spike results into alerts and a full parameter table
use crate::application::spike_analyzer::analyze;
use crate::domain::analysis::{DomainThreshold, Severity, SpikeAnalysisResult, ThresholdTable};
use crate::domain::batch::{ParameterSeries, ReadingBatch};
use crate::domain::catalog::{Catalog, DTC_COUNT_ID};
use crate::domain::parameter::Category;
use crate::domain::report::{DiagnosticReport, Finding, ParameterRow, ReportMetadata};
use std::cmp::Ordering;
use std::collections::HashMap;

pub const CRITICAL_ALERT_LIMIT: usize = 3;

struct Analyzed<'a> {
    series: &'a ParameterSeries,
    threshold: DomainThreshold,
    result: SpikeAnalysisResult,
}

impl Analyzed<'_> {
    /// Distance past the alert level in the parameter's bad direction.
    fn severity_score(&self) -> Option<f64> {
        let level = self.threshold.alert_level()?;
        Some(if self.threshold.lower_is_worse {
            level - self.result.min
        } else {
            self.result.max - level
        })
    }

    fn in_table(&self) -> bool {
        self.series.has_nonzero() || self.series.id == DTC_COUNT_ID
    }

    fn finding(&self, critical: bool, score: f64) -> Finding {
        Finding {
            parameter: self.series.name.clone(),
            id: self.series.id,
            average: self.result.average,
            min: self.result.min,
            max: self.result.max,
            unit: self.series.unit.clone(),
            severity: self.result.severity,
            critical,
            score,
            summary: self.result.summary.clone(),
        }
    }

    fn row(&self) -> ParameterRow {
        ParameterRow {
            parameter: self.series.name.clone(),
            id: self.series.id,
            category: self.series.category,
            average: self.result.average,
            median: self.result.median,
            min: self.result.min,
            max: self.result.max,
            std_dev: self.result.std_dev,
            unit: self.series.unit.clone(),
            samples: self.result.count,
            spike_count: self.result.spike_count,
            severity: self.result.severity,
        }
    }
}

/// Highest score first; equal scores fall back to ascending parameter id.
fn by_score_desc(a: &(f64, &Analyzed), b: &(f64, &Analyzed)) -> Ordering {
    b.0.total_cmp(&a.0).then(a.1.series.id.cmp(&b.1.series.id))
}

/// Build the diagnostic report for one batch.
///
/// Each parameter is analyzed on its own. Parameters at WARNING are ranked by
/// how far their worst value went past the domain alert level and the top
/// three become critical alerts. When nothing reaches WARNING, the three
/// parameters with the highest averages are reported as informational
/// findings instead, so a batch with any non-zero data never yields an empty
/// alert list.
pub fn assemble(batch: &ReadingBatch, thresholds: &ThresholdTable) -> DiagnosticReport {
    let analyzed: Vec<Analyzed> = batch
        .series
        .iter()
        .filter_map(|series| {
            let threshold = thresholds.get(&series.name);
            analyze(&series.name, &series.values, &threshold).map(|result| Analyzed {
                series,
                threshold,
                result,
            })
        })
        .collect();

    let critical_alerts = rank_alerts(&analyzed);
    let parameters = build_table(&analyzed);

    let diagnostic_total = Catalog::global()
        .parameters_by_category(Category::EngineDiagnostic)
        .len();
    let diagnostic_with_data = parameters
        .iter()
        .filter(|row| row.category == Category::EngineDiagnostic)
        .count();

    tracing::debug!(
        "Assembled report for {}: {} analyzed, {} alerts, {} table rows",
        batch.device_id,
        analyzed.len(),
        critical_alerts.len(),
        parameters.len()
    );

    DiagnosticReport {
        critical_alerts,
        metadata: ReportMetadata {
            device_id: batch.device_id.clone(),
            total_samples: batch.sample_count,
            parameters_with_data: parameters.len(),
            diagnostic_parameters_with_data: diagnostic_with_data,
            diagnostic_parameters_total: diagnostic_total,
            window: batch.window,
        },
        parameters,
    }
}

fn rank_alerts(analyzed: &[Analyzed]) -> Vec<Finding> {
    let mut warnings: Vec<(f64, &Analyzed)> = analyzed
        .iter()
        .filter(|a| a.result.severity == Severity::Warning)
        .filter_map(|a| a.severity_score().map(|score| (score, a)))
        .collect();

    if !warnings.is_empty() {
        warnings.sort_by(by_score_desc);
        return warnings
            .into_iter()
            .take(CRITICAL_ALERT_LIMIT)
            .map(|(score, a)| a.finding(true, score))
            .collect();
    }

    let mut fallback: Vec<(f64, &Analyzed)> = analyzed
        .iter()
        .filter(|a| a.result.has_nonzero_stats())
        .map(|a| (a.result.average, a))
        .collect();
    fallback.sort_by(by_score_desc);
    fallback
        .into_iter()
        .take(CRITICAL_ALERT_LIMIT)
        .map(|(score, a)| a.finding(false, score))
        .collect()
}

/// Rows in catalog order: by category, then by id.
fn build_table(analyzed: &[Analyzed]) -> Vec<ParameterRow> {
    let by_id: HashMap<u16, &Analyzed> = analyzed.iter().map(|a| (a.series.id, a)).collect();
    let catalog = Catalog::global();

    Category::ALL
        .iter()
        .flat_map(|&category| catalog.parameters_by_category(category))
        .filter_map(|def| by_id.get(&def.id))
        .filter(|a| a.in_table())
        .map(|a| a.row())
        .collect()
}
