// Device service - Use case for listing devices with telemetry
use crate::application::telemetry_repository::TelemetryRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct DeviceService {
    repository: Arc<dyn TelemetryRepository>,
}

impl DeviceService {
    pub fn new(repository: Arc<dyn TelemetryRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_devices(&self) -> anyhow::Result<Vec<String>> {
        let mut ids = self.repository.list_device_ids().await?;
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::file_repository::FileRepository;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_list_devices_sorted() {
        let dir = TempDir::new().unwrap();
        for id in ["van-2", "car-9", "van-1"] {
            std::fs::write(dir.path().join(format!("{id}.jsonl")), "").unwrap();
        }
        let service = DeviceService::new(Arc::new(FileRepository::new(dir.path())));
        assert_eq!(service.list_devices().await.unwrap(), vec!["car-9", "van-1", "van-2"]);
    }
}
