// JSON-lines file repository - one `<device>.jsonl` file per device
use crate::application::record_decoder::decode_records;
use crate::application::telemetry_repository::TelemetryRepository;
use crate::domain::batch::AnalysisWindow;
use crate::domain::telemetry::TelemetryReading;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "jsonl";

#[derive(Debug, Clone)]
pub struct FileRepository {
    data_dir: PathBuf,
}

impl FileRepository {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn device_path(&self, device_id: &str) -> Result<PathBuf> {
        let valid = !device_id.is_empty()
            && device_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            anyhow::bail!("Invalid device id: {:?}", device_id);
        }
        Ok(self.data_dir.join(format!("{device_id}.{EXTENSION}")))
    }
}

#[async_trait]
impl TelemetryRepository for FileRepository {
    async fn list_device_ids(&self) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.data_dir)
            .await
            .with_context(|| format!("Failed to read data directory {}", self.data_dir.display()))?;

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }

        ids.sort();
        tracing::debug!("Found {} devices in {}", ids.len(), self.data_dir.display());
        Ok(ids)
    }

    async fn fetch_readings(
        &self,
        device_id: &str,
        window: Option<AnalysisWindow>,
    ) -> Result<Vec<TelemetryReading>> {
        let path = self.device_path(device_id)?;
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read telemetry file {}", path.display()))?;

        let mut readings: Vec<TelemetryReading> = decode_records(content.lines())
            .into_iter()
            .filter(|r| r.device_id == device_id)
            .filter(|r| window.is_none_or(|w| w.contains(r.timestamp)))
            .collect();
        readings.sort_by_key(|r| r.timestamp);

        tracing::debug!("Loaded {} readings for device {}", readings.len(), device_id);
        Ok(readings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use std::fs;
    use tempfile::TempDir;

    fn write_device(dir: &TempDir, device: &str, lines: &[&str]) {
        fs::write(dir.path().join(format!("{device}.jsonl")), lines.join("\n")).unwrap();
    }

    #[tokio::test]
    async fn test_list_device_ids() {
        let dir = TempDir::new().unwrap();
        write_device(&dir, "truck-2", &[]);
        write_device(&dir, "truck-1", &[]);
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let repo = FileRepository::new(dir.path());
        assert_eq!(repo.list_device_ids().await.unwrap(), vec!["truck-1", "truck-2"]);
    }

    #[tokio::test]
    async fn test_fetch_readings_sorts_filters_and_skips_bad_lines() {
        let dir = TempDir::new().unwrap();
        write_device(
            &dir,
            "truck-1",
            &[
                r#"{"device_id":"truck-1","timestamp":3000,"io":{"36":900}}"#,
                r#"{"device_id":"truck-1","timestamp":1000,"io":{"36":700}}"#,
                "{corrupt",
                r#"{"device_id":"truck-9","timestamp":2000,"io":{"36":800}}"#,
                r#"{"device_id":"truck-1","timestamp":9000,"io":{"36":1000}}"#,
            ],
        );
        let repo = FileRepository::new(dir.path());

        let all = repo.fetch_readings("truck-1", None).await.unwrap();
        let rpms: Vec<_> = all.iter().map(|r| r.raw(36).unwrap()).collect();
        assert_eq!(rpms, vec![700.0, 900.0, 1000.0]);

        let window = AnalysisWindow::new(
            DateTime::from_timestamp_millis(500).unwrap(),
            DateTime::from_timestamp_millis(5000).unwrap(),
        );
        let windowed = repo.fetch_readings("truck-1", Some(window)).await.unwrap();
        assert_eq!(windowed.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_readings_rejects_path_like_ids() {
        let dir = TempDir::new().unwrap();
        let repo = FileRepository::new(dir.path());
        assert!(repo.fetch_readings("../etc/passwd", None).await.is_err());
        assert!(repo.fetch_readings("missing", None).await.is_err());
    }
}
