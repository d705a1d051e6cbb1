// Diagnostic service - Use case for analyzing a device's telemetry window
use crate::application::batch_accumulator::accumulate;
use crate::application::diagnostic_assembler::assemble;
use crate::application::telemetry_repository::TelemetryRepository;
use crate::domain::analysis::ThresholdTable;
use crate::domain::batch::AnalysisWindow;
use crate::domain::report::DiagnosticReport;
use crate::domain::telemetry::TelemetryReading;
use crate::infrastructure::config::AnalysisSettings;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct DiagnosticService {
    repository: Arc<dyn TelemetryRepository>,
    thresholds: ThresholdTable,
    settings: AnalysisSettings,
}

impl DiagnosticService {
    pub fn new(
        repository: Arc<dyn TelemetryRepository>,
        thresholds: ThresholdTable,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            repository,
            thresholds,
            settings,
        }
    }

    pub async fn diagnose(
        &self,
        device_id: &str,
        window: Option<AnalysisWindow>,
    ) -> anyhow::Result<DiagnosticReport> {
        let start_time = Instant::now();
        let readings = self.repository.fetch_readings(device_id, window).await?;
        let fetched = readings.len();

        let report = self.analyze_readings(device_id, readings);

        tracing::info!(
            "Diagnosed {}: {} readings fetched, {} analyzed, {} alerts in {}ms",
            device_id,
            fetched,
            report.metadata.total_samples,
            report.critical_alerts.len(),
            start_time.elapsed().as_millis()
        );
        Ok(report)
    }

    /// Run the engine over readings already in memory.
    pub fn analyze_readings(
        &self,
        device_id: &str,
        mut readings: Vec<TelemetryReading>,
    ) -> DiagnosticReport {
        if self.settings.engine_on_only {
            let before = readings.len();
            readings.retain(TelemetryReading::engine_running);
            tracing::debug!(
                "Kept {} of {} readings with engine running",
                readings.len(),
                before
            );
        }

        let batch = accumulate(device_id, &readings, self.settings.max_samples);
        assemble(&batch, &self.thresholds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::DateTime;

    struct InMemoryRepository {
        readings: Vec<TelemetryReading>,
    }

    #[async_trait]
    impl TelemetryRepository for InMemoryRepository {
        async fn list_device_ids(&self) -> anyhow::Result<Vec<String>> {
            Ok(vec!["van-1".to_string()])
        }

        async fn fetch_readings(
            &self,
            device_id: &str,
            window: Option<AnalysisWindow>,
        ) -> anyhow::Result<Vec<TelemetryReading>> {
            Ok(self
                .readings
                .iter()
                .filter(|r| r.device_id == device_id)
                .filter(|r| window.is_none_or(|w| w.contains(r.timestamp)))
                .cloned()
                .collect())
        }
    }

    fn reading(secs: i64, ignition: f64, rpm: f64, coolant: f64) -> TelemetryReading {
        TelemetryReading::new(
            "van-1".to_string(),
            DateTime::from_timestamp(secs, 0).unwrap(),
            [(239, ignition), (36, rpm), (32, coolant)].into_iter().collect(),
        )
    }

    fn service(settings: AnalysisSettings) -> DiagnosticService {
        let mut readings: Vec<_> = (0..30).map(|i| reading(i * 60, 1.0, 2200.0, 92.0)).collect();
        readings.push(reading(1800, 1.0, 2300.0, 124.0));
        readings.push(reading(1860, 0.0, 0.0, 30.0));
        DiagnosticService::new(
            Arc::new(InMemoryRepository { readings }),
            ThresholdTable::default(),
            settings,
        )
    }

    #[tokio::test]
    async fn test_diagnose_flags_overheating() {
        let report = service(AnalysisSettings::default())
            .diagnose("van-1", None)
            .await
            .unwrap();

        assert_eq!(report.metadata.total_samples, 31);
        assert_eq!(report.critical_alerts[0].parameter, "Coolant Temperature");
        assert!(report.critical_alerts[0].critical);
        assert_eq!(report.critical_alerts[0].max, 124.0);
    }

    #[tokio::test]
    async fn test_diagnose_keeps_engine_off_when_configured() {
        let settings = AnalysisSettings {
            max_samples: None,
            engine_on_only: false,
        };
        let report = service(settings).diagnose("van-1", None).await.unwrap();
        assert_eq!(report.metadata.total_samples, 32);
    }

    #[tokio::test]
    async fn test_diagnose_caps_batch() {
        let settings = AnalysisSettings {
            max_samples: Some(5),
            engine_on_only: true,
        };
        let report = service(settings).diagnose("van-1", None).await.unwrap();
        assert_eq!(report.metadata.total_samples, 5);
    }

    #[tokio::test]
    async fn test_diagnose_unknown_device_is_empty_report() {
        let report = service(AnalysisSettings::default())
            .diagnose("van-404", None)
            .await
            .unwrap();
        assert_eq!(report.metadata.total_samples, 0);
        assert!(report.critical_alerts.is_empty());
        assert!(report.parameters.is_empty());
    }
}
