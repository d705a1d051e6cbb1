use crate::domain::analysis::{DomainThreshold, ThresholdTable};
use crate::domain::catalog::Catalog;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = "config/diagnostics";
const ENV_PREFIX: &str = "VEHICLE_DIAG";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DiagnosticsConfig {
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub source: SourceSettings,
    /// Overrides keyed by catalog parameter name, merged over the built-in table.
    #[serde(default)]
    pub thresholds: BTreeMap<String, DomainThreshold>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnalysisSettings {
    /// Most recent samples kept per batch. `None` keeps everything.
    #[serde(default = "default_max_samples")]
    pub max_samples: Option<usize>,
    /// Drop readings taken with the engine off before analysis.
    #[serde(default = "default_engine_on_only")]
    pub engine_on_only: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            max_samples: default_max_samples(),
            engine_on_only: default_engine_on_only(),
        }
    }
}

fn default_max_samples() -> Option<usize> {
    Some(20_000)
}

fn default_engine_on_only() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SourceSettings {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Load settings from `path` (or `config/diagnostics.*` when absent), then
/// `VEHICLE_DIAG__SECTION__KEY` environment variables. The file is optional.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<DiagnosticsConfig> {
    let file = match path {
        Some(p) => config::File::from(p).required(true),
        None => config::File::with_name(DEFAULT_CONFIG).required(false),
    };

    let settings = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Built-in thresholds with configured overrides applied.
///
/// Override keys are matched to catalog names case-insensitively; keys that
/// name no catalog parameter are logged and ignored.
pub fn threshold_table(config: &DiagnosticsConfig) -> ThresholdTable {
    let catalog = Catalog::global();
    let mut overrides = ThresholdTable::empty();

    for (key, threshold) in &config.thresholds {
        let canonical = catalog
            .definitions()
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(key.trim()));
        match canonical {
            Some(def) => overrides.insert(def.name, *threshold),
            None => tracing::warn!("Ignoring threshold for unknown parameter '{}'", key),
        }
    }

    let mut table = ThresholdTable::default();
    table.merge(overrides);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults_without_file() {
        let config = DiagnosticsConfig::default();
        assert_eq!(config.analysis.max_samples, Some(20_000));
        assert!(config.analysis.engine_on_only);
        assert_eq!(config.source.data_dir, PathBuf::from("data"));
        assert_eq!(threshold_table(&config), ThresholdTable::default());
    }

    #[test]
    fn test_load_config_from_toml() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[analysis]
max_samples = 500
engine_on_only = false

[source]
data_dir = "/var/lib/telemetry"

[thresholds."Engine RPM"]
warning = 3500.0
critical = 4500.0

[thresholds."Hover Drive"]
warning = 1.0
"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.analysis.max_samples, Some(500));
        assert!(!config.analysis.engine_on_only);
        assert_eq!(config.source.data_dir, PathBuf::from("/var/lib/telemetry"));

        let table = threshold_table(&config);
        let rpm = table.get("Engine RPM");
        assert_eq!(rpm.warning, Some(3500.0));
        assert_eq!(rpm.critical, Some(4500.0));
        assert!(!rpm.lower_is_worse);
        assert!(!table.contains("Hover Drive"));
        assert_eq!(table.get("Fuel Level"), ThresholdTable::default().get("Fuel Level"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(load_config(Some(Path::new("/nonexistent/diagnostics.toml"))).is_err());
    }
}
