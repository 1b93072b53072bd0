use std::{env, fs, time::Duration};

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

/// Ten years.
const MAX_RELEVANCE_WINDOW_HOURS: i64 = 24 * 366 * 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Case-insensitive name fragment marking non-production entities.
    pub excluded_marker: String,
    pub violation_lookback_mins: u64,
    pub relevance_window_hours: i64,
    pub upstream_timeout_secs: u64,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path =
            env::var("APPD_CHECKLIST_CONFIG").unwrap_or_else(|_| "config.json".to_string());
        let file_cfg: Option<AppConfig> = fs::read_to_string(&path)
            .ok()
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .with_context(|| format!("failed to parse {path}"))?;

        let mut cfg = file_cfg.unwrap_or_default();
        cfg.apply_env_overrides();
        cfg.validate().with_context(|| format!("invalid configuration in {path}"))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.violation_lookback_mins > 0,
            "violation_lookback_mins must be positive"
        );
        self.relevance_window()?;
        Ok(())
    }

    /// How long a terminal violation stays in the checklist after it ended.
    pub fn relevance_window(&self) -> anyhow::Result<chrono::Duration> {
        ensure!(
            (1..=MAX_RELEVANCE_WINDOW_HOURS).contains(&self.relevance_window_hours),
            "relevance_window_hours must be between 1 and {MAX_RELEVANCE_WINDOW_HOURS}, got {}",
            self.relevance_window_hours
        );
        chrono::Duration::try_hours(self.relevance_window_hours)
            .context("relevance_window_hours is out of range")
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("APPD_HOST") {
            self.host = v;
        }
        if let Ok(v) = env::var("APPD_PORT") {
            self.port = v.parse().unwrap_or(self.port);
        }
        if let Ok(v) = env::var("APPD_EXCLUDED_MARKER") {
            self.excluded_marker = v;
        }
        if let Ok(v) = env::var("APPD_UPSTREAM_TIMEOUT_SECS") {
            self.upstream_timeout_secs = v.parse().unwrap_or(self.upstream_timeout_secs);
        }
        if let Ok(v) = env::var("GEMINI_API_KEY") {
            if !v.trim().is_empty() {
                self.gemini_api_key = Some(v);
            }
        }
        if let Ok(v) = env::var("GEMINI_MODEL") {
            self.gemini_model = v;
        }
        if let Ok(v) = env::var("GEMINI_BASE_URL") {
            self.gemini_base_url = v;
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn http_client(&self) -> anyhow::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.upstream_timeout())
            .build()
            .context("failed to build HTTP client")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            excluded_marker: "HML".to_string(),
            violation_lookback_mins: 10_080,
            relevance_window_hours: 24,
            upstream_timeout_secs: 30,
            gemini_api_key: None,
            gemini_model: "gemini-3.1-pro-preview".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{"port": 8081, "excluded_marker": "QA"}"#).unwrap();
        assert_eq!(cfg.port, 8081);
        assert_eq!(cfg.excluded_marker, "QA");
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.violation_lookback_mins, 10_080);
        assert_eq!(cfg.relevance_window_hours, 24);
        assert!(cfg.gemini_api_key.is_none());
    }

    #[test]
    fn relevance_window_rejects_out_of_range_hours() {
        assert_eq!(
            AppConfig::default().relevance_window().unwrap(),
            chrono::Duration::hours(24)
        );

        for hours in [0, -5, i64::MAX, i64::MIN] {
            let cfg = AppConfig {
                relevance_window_hours: hours,
                ..AppConfig::default()
            };
            let err = cfg.validate().unwrap_err();
            assert!(err.to_string().contains("relevance_window_hours"), "{hours}: {err}");
        }
    }

    #[test]
    fn zero_lookback_is_rejected() {
        let cfg: AppConfig = serde_json::from_str(r#"{"violation_lookback_mins": 0}"#).unwrap();
        assert!(cfg.validate().is_err());
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn default_timeout_is_thirty_seconds() {
        assert_eq!(AppConfig::default().upstream_timeout(), Duration::from_secs(30));
    }
}
