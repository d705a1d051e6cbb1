// Repository trait for telemetry data access
use crate::domain::batch::AnalysisWindow;
use crate::domain::telemetry::TelemetryReading;
use async_trait::async_trait;

#[async_trait]
pub trait TelemetryRepository: Send + Sync {
    /// List all device ids with stored telemetry
    async fn list_device_ids(&self) -> anyhow::Result<Vec<String>>;

    /// Readings for one device in time order, limited to `window` when given
    async fn fetch_readings(
        &self,
        device_id: &str,
        window: Option<AnalysisWindow>,
    ) -> anyhow::Result<Vec<TelemetryReading>>;
}
