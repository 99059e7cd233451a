//! Scan configuration.
//!
//! Resolution order: built-in defaults, then
//! `<config_dir>/scan-glass/config.json`, then `SCAN_GLASS_*` environment
//! variables. A missing config file is not an error; an unreadable or
//! malformed one is.

use crate::capture::CaptureOptions;
use crate::classify::ClassifierConfig;
use crate::error::ConfigError;
use crate::inference::{ModelConfig, OcrConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub capture: CaptureOptions,
    pub model: ModelConfig,
    pub ocr: OcrConfig,
    pub classifier: ClassifierConfig,
}

/// Full path to the user config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scan-glass")
        .join("config.json")
}

impl ScanConfig {
    /// Defaults, the user config file, then environment overrides.
    pub fn resolve() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&config_path())?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("[CONFIG] No config at {} — using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };
        let config: Self = serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;
        config.validate()?;
        log::info!("[CONFIG] Loaded {}", path.display());
        Ok(config)
    }

    /// Range checks shared by the config file and the overrides.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let quality = self.capture.quality;
        if !(0.0..=1.0).contains(&quality) {
            return Err(invalid("capture.quality", quality.to_string()));
        }
        if self.model.num_threads == 0 {
            return Err(invalid("model.numThreads", "0".to_string()));
        }
        if self.ocr.language.trim().is_empty() {
            return Err(invalid("ocr.language", self.ocr.language.clone()));
        }
        if self.ocr.timeout_secs == 0 {
            return Err(invalid("ocr.timeoutSecs", "0".to_string()));
        }
        if self.classifier.max_line_bytes == 0 {
            return Err(invalid("classifier.maxLineBytes", "0".to_string()));
        }
        Ok(())
    }

    /// Apply `SCAN_GLASS_*` overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SCAN_GLASS_QUALITY") {
            let quality: f32 = parse(&v, "SCAN_GLASS_QUALITY")?;
            if !(0.0..=1.0).contains(&quality) {
                return Err(invalid("SCAN_GLASS_QUALITY", v));
            }
            self.capture.quality = quality;
        }
        if let Some(v) = lookup("SCAN_GLASS_PERSIST") {
            self.capture.persist = parse_bool(&v, "SCAN_GLASS_PERSIST")?;
        }
        if let Some(v) = lookup("SCAN_GLASS_TESSDATA") {
            self.model.data_dir = if v.is_empty() { None } else { Some(PathBuf::from(v)) };
        }
        if let Some(v) = lookup("SCAN_GLASS_THREADS") {
            self.model.num_threads = parse_positive(&v, "SCAN_GLASS_THREADS")?;
        }
        if let Some(v) = lookup("SCAN_GLASS_OCR_LANG") {
            if v.trim().is_empty() {
                return Err(invalid("SCAN_GLASS_OCR_LANG", v));
            }
            self.ocr.language = v.trim().to_string();
        }
        if let Some(v) = lookup("SCAN_GLASS_OCR_TIMEOUT") {
            self.ocr.timeout_secs = parse_positive(&v, "SCAN_GLASS_OCR_TIMEOUT")?;
        }
        if let Some(v) = lookup("SCAN_GLASS_MAX_LINE_BYTES") {
            self.classifier.max_line_bytes = parse_positive(&v, "SCAN_GLASS_MAX_LINE_BYTES")?;
        }
        Ok(())
    }
}

fn invalid(key: &'static str, value: String) -> ConfigError {
    ConfigError::InvalidValue { key, value }
}

fn parse<T: std::str::FromStr>(value: &str, key: &'static str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| invalid(key, value.to_string()))
}

fn parse_positive<T>(value: &str, key: &'static str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let n: T = parse(value, key)?;
    if n <= T::default() {
        return Err(invalid(key, value.to_string()));
    }
    Ok(n)
}

fn parse_bool(value: &str, key: &'static str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(invalid(key, value.to_string())),
    }
}
