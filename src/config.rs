//! Runtime configuration read from the environment (and `.env`).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::refine::gemini::DEFAULT_BASE_URL;
use crate::refine::DEFAULT_TEMPERATURE;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_address: String,
    /// Base URL used when building share links.
    pub public_url: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub refine_temperature: f32,
    /// Where saved PDFs go; the simulated drive outbox is `<output_dir>/drive`.
    pub output_dir: PathBuf,
    pub typst_bin: String,
    pub upload_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            public_url: "http://localhost:8080".to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            refine_temperature: DEFAULT_TEMPERATURE,
            output_dir: PathBuf::from("./output"),
            typst_bin: "typst".to_string(),
            upload_delay: Duration::from_millis(2500),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            bind_address: get("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            public_url: get("PUBLIC_URL").unwrap_or(defaults.public_url),
            gemini_api_key: get("GEMINI_API_KEY").or_else(|| get("API_KEY")),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: get("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            refine_temperature: parse(get("REFINE_TEMPERATURE"), "REFINE_TEMPERATURE")?
                .unwrap_or(defaults.refine_temperature),
            output_dir: get("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            typst_bin: get("TYPST_BIN").unwrap_or(defaults.typst_bin),
            upload_delay: parse::<u64>(get("CLOUD_UPLOAD_DELAY_MS"), "CLOUD_UPLOAD_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.upload_delay),
        })
    }

    pub fn drive_outbox_dir(&self) -> PathBuf {
        self.output_dir.join("drive")
    }
}

fn parse<T: FromStr>(value: Option<String>, key: &'static str) -> Result<Option<T>, ConfigError> {
    value
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|_| ConfigError::Invalid { key, value })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.gemini_model, "gemini-3-flash-preview");
        assert_eq!(config.upload_delay, Duration::from_millis(2500));
        assert_eq!(config.drive_outbox_dir(), PathBuf::from("./output/drive"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("BIND_ADDRESS", "127.0.0.1:9000"),
            ("API_KEY", "legacy-key"),
            ("REFINE_TEMPERATURE", "0.2"),
            ("CLOUD_UPLOAD_DELAY_MS", "0"),
            ("OUTPUT_DIR", "/tmp/laporan"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.gemini_api_key.as_deref(), Some("legacy-key"));
        assert_eq!(config.refine_temperature, 0.2);
        assert_eq!(config.upload_delay, Duration::ZERO);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/laporan"));
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let result = AppConfig::from_lookup(lookup(&[("CLOUD_UPLOAD_DELAY_MS", "soon")]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "CLOUD_UPLOAD_DELAY_MS", .. })
        ));
    }
}
