// Report rendering for terminal and JSON consumers
use crate::domain::parameter::ParameterDefinition;
use crate::domain::report::DiagnosticReport;
use std::fmt::Write;

pub fn render_json(report: &DiagnosticReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Fixed-width text rendering of a report.
pub fn render_table(report: &DiagnosticReport) -> String {
    let meta = &report.metadata;
    let mut out = String::new();

    let _ = writeln!(out, "Device: {}", meta.device_id);
    if let Some(window) = meta.window {
        let _ = writeln!(
            out,
            "Window: {} .. {}",
            window.start.to_rfc3339(),
            window.end.to_rfc3339()
        );
    }
    let _ = writeln!(
        out,
        "Samples: {}  Parameters with data: {} ({} of {} diagnostic)",
        meta.total_samples,
        meta.parameters_with_data,
        meta.diagnostic_parameters_with_data,
        meta.diagnostic_parameters_total
    );

    let heading = if report.has_warnings() {
        "Critical alerts"
    } else {
        "Notable parameters"
    };
    let _ = writeln!(out, "\n{heading}:");
    if report.critical_alerts.is_empty() {
        let _ = writeln!(out, "  (no data)");
    }
    for (rank, finding) in report.critical_alerts.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. [{}] {} max {:.2}{} - {}",
            rank + 1,
            finding.severity,
            finding.parameter,
            finding.max,
            unit_suffix(&finding.unit),
            finding.summary
        );
    }

    if !report.parameters.is_empty() {
        let _ = writeln!(
            out,
            "\n{:<30} {:>10} {:>10} {:>10} {:>7} {:>7} {:<8}",
            "Parameter", "Average", "Min", "Max", "Unit", "Spikes", "Severity"
        );
        for row in &report.parameters {
            let _ = writeln!(
                out,
                "{:<30} {:>10.2} {:>10.2} {:>10.2} {:>7} {:>7} {:<8}",
                row.parameter,
                row.average,
                row.min,
                row.max,
                row.unit,
                row.spike_count,
                row.severity.to_string()
            );
        }
    }

    out
}

pub fn render_catalog(definitions: &[ParameterDefinition]) -> String {
    let mut out = String::new();
    for def in definitions {
        let _ = writeln!(
            out,
            "{:>4}  {:<30} {:<18} {:>6}  [{}, {}]  {}",
            def.id,
            def.name,
            def.category.to_string(),
            def.unit,
            def.min,
            def.max,
            def.description
        );
    }
    out
}

fn unit_suffix(unit: &str) -> String {
    if unit.is_empty() {
        String::new()
    } else {
        format!(" {unit}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::Severity;
    use crate::domain::catalog::Catalog;
    use crate::domain::parameter::Category;
    use crate::domain::report::{Finding, ParameterRow, ReportMetadata};

    fn report() -> DiagnosticReport {
        DiagnosticReport {
            critical_alerts: vec![Finding {
                parameter: "Coolant Temperature".to_string(),
                id: 32,
                average: 93.0,
                min: 88.0,
                max: 124.0,
                unit: "°C".to_string(),
                severity: Severity::Warning,
                critical: true,
                score: 19.0,
                summary: "1 spike detected above 104.30 across 31 samples; highest spike 124.00"
                    .to_string(),
            }],
            parameters: vec![ParameterRow {
                parameter: "Coolant Temperature".to_string(),
                id: 32,
                category: Category::EngineDiagnostic,
                average: 93.0,
                median: 92.0,
                min: 88.0,
                max: 124.0,
                std_dev: 5.65,
                unit: "°C".to_string(),
                samples: 31,
                spike_count: 1,
                severity: Severity::Warning,
            }],
            metadata: ReportMetadata {
                device_id: "van-1".to_string(),
                total_samples: 31,
                parameters_with_data: 1,
                diagnostic_parameters_with_data: 1,
                diagnostic_parameters_total: 26,
                window: None,
            },
        }
    }

    #[test]
    fn test_render_table() {
        let text = render_table(&report());
        assert!(text.contains("Device: van-1"));
        assert!(text.contains("Critical alerts:"));
        assert!(text.contains("1. [WARNING] Coolant Temperature max 124.00 °C"));
        assert!(text.contains("Samples: 31"));
    }

    #[test]
    fn test_render_json_round_trips_through_value() {
        let json = render_json(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["critical_alerts"][0]["parameter"], "Coolant Temperature");
        assert_eq!(value["metadata"]["total_samples"], 31);
    }

    #[test]
    fn test_render_catalog_lists_every_definition() {
        let defs = Catalog::global().definitions();
        assert_eq!(render_catalog(defs).lines().count(), defs.len());
    }
}
