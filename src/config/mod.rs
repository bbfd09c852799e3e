use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::errors::{HistoryError, HistoryResult};

const DEFAULT_CONFIG_FILE: &str = "tenant_history.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Delay between two report status polls.
    pub poll_interval_ms: u64,
    /// Age after which a finished report may be generated again.
    pub stale_after_minutes: i64,
    /// Keep polling at the same interval when a status request itself fails.
    pub retry_poll_on_transport_failure: bool,
    /// chrono format string for the local report timestamp.
    pub timestamp_format: String,
    pub report_file_name: String,
    pub report_file_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone_name: Option<String>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1500,
            stale_after_minutes: 30,
            retry_poll_on_transport_failure: false,
            timestamp_format: "%Y-%m-%d %H:%M:%S".into(),
            report_file_name: "Tenant History Report".into(),
            report_file_type: "pdf".into(),
            time_zone_name: None,
        }
    }
}

impl HistoryConfig {
    /// Parses and validates a JSON document. Missing keys fall back to defaults.
    pub fn from_json_str(raw: &str) -> HistoryResult<Self> {
        let config: HistoryConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> HistoryResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(HistoryError::Validation(
                "poll_interval_ms must be greater than zero".into(),
            ));
        }
        if self.stale_after_minutes < 0 {
            return Err(HistoryError::Validation(
                "stale_after_minutes must not be negative".into(),
            ));
        }
        if self.timestamp_format.trim().is_empty() {
            return Err(HistoryError::Validation(
                "timestamp_format must not be empty".into(),
            ));
        }
        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(HistoryError::Validation(format!(
                "timestamp_format `{}` is not a valid strftime pattern",
                self.timestamp_format
            )));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn stale_after(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.stale_after_minutes)
    }
}

/// Loads [`HistoryConfig`] from a JSON file on disk.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_path(DEFAULT_CONFIG_FILE)
    }

    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> HistoryResult<HistoryConfig> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            HistoryConfig::from_json_str(&data)
        } else {
            tracing::debug!(path = %self.path.display(), "config file absent, using defaults");
            Ok(HistoryConfig::default())
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
