//! Configuration management for smokeguard
//!
//! Config stored at: ~/.config/smokeguard/config.json

use crate::cli::OutputFormat;
use crate::constants::{
    CONFIDENCE_THRESHOLD_MAX, CONFIDENCE_THRESHOLD_MIN, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_ZONE,
};
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Vision model name override (optional)
    #[serde(default)]
    pub model: Option<String>,

    /// Minimum vision-model confidence before a qualifying detection is
    /// recorded (50-99)
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Active monitoring zone name stamped onto records
    #[serde(default = "default_zone")]
    pub zone: String,

    /// OCR engine selector passed to the text recognition provider
    #[serde(default = "default_ocr_engine")]
    pub ocr_engine: u32,

    /// Enable provider-result caching
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Cache directory override
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,
}

fn default_confidence_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

fn default_zone() -> String {
    DEFAULT_ZONE.to_string()
}

fn default_ocr_engine() -> u32 {
    2
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: None,
            confidence_threshold: default_confidence_threshold(),
            zone: default_zone(),
            ocr_engine: default_ocr_engine(),
            cache_enabled: true,
            cache_dir: None,
            output_format: default_output_format(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("smokeguard");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the cache directory path
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }

        let cache_dir = dirs::cache_dir()
            .ok_or(ConfigError::NotFound)?
            .join("smokeguard");
        Ok(cache_dir)
    }

    /// Get the violation log directory path
    pub fn store_dir(&self) -> Result<PathBuf> {
        let store_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("smokeguard");
        Ok(store_dir)
    }

    /// Set the confidence threshold, rejecting values outside the
    /// operator-adjustable range
    pub fn set_confidence_threshold(&mut self, threshold: f64) -> Result<()> {
        if !(CONFIDENCE_THRESHOLD_MIN..=CONFIDENCE_THRESHOLD_MAX).contains(&threshold) {
            return Err(ConfigError::InvalidValue(format!(
                "confidence threshold must be between {:.0} and {:.0}, got {}",
                CONFIDENCE_THRESHOLD_MIN, CONFIDENCE_THRESHOLD_MAX, threshold
            ))
            .into());
        }
        self.confidence_threshold = threshold;
        Ok(())
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SmokeGuard Configuration")?;
        writeln!(f, "========================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Model:                {}",
            self.model.as_deref().unwrap_or("(default)")
        )?;
        writeln!(f, "Confidence threshold: {:.0}%", self.confidence_threshold)?;
        writeln!(f, "Zone:                 {}", self.zone)?;
        writeln!(f, "OCR engine:           {}", self.ocr_engine)?;
        writeln!(f, "Cache enabled:        {}", self.cache_enabled)?;
        writeln!(
            f,
            "Cache dir:            {}",
            self.cache_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Output format:        {}", self.output_format)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:          {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.confidence_threshold, DEFAULT_CONFIDENCE_THRESHOLD);
        assert_eq!(config.zone, DEFAULT_ZONE);
        assert_eq!(config.ocr_engine, 2);
        assert!(config.cache_enabled);
        assert!(config.model.is_none());
    }

    #[test]
    fn threshold_setter_enforces_range() {
        let mut config = Config::default();
        assert!(config.set_confidence_threshold(49.0).is_err());
        assert!(config.set_confidence_threshold(100.0).is_err());
        config.set_confidence_threshold(50.0).unwrap();
        assert_eq!(config.confidence_threshold, 50.0);
        config.set_confidence_threshold(99.0).unwrap();
        assert_eq!(config.confidence_threshold, 99.0);
    }

    #[test]
    fn json_roundtrip_preserves_fields() {
        let mut config = Config::default();
        config.model = Some("vision-x".to_string());
        config.zone = "Zone B - Bypass".to_string();
        config.confidence_threshold = 72.0;

        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.model.as_deref(), Some("vision-x"));
        assert_eq!(back.zone, "Zone B - Bypass");
        assert_eq!(back.confidence_threshold, 72.0);
    }

    #[test]
    fn empty_json_gets_all_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.confidence_threshold, DEFAULT_CONFIDENCE_THRESHOLD);
        assert_eq!(config.zone, DEFAULT_ZONE);
        assert_eq!(config.output_format, OutputFormat::Table);
    }
}
