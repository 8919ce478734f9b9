//! Load: config loading from file and environment variables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::model::ReaderConfig;
use crate::error::{GcLogError, GcLogResult};
use crate::parser::GcFormat;

pub const CONFIG_FILE_ENV: &str = "GCLOG_CONFIG_FILE";
pub const DEFAULT_CONFIG_FILE: &str = "gclog.toml";

impl ReaderConfig {
    /// Load configuration from file and environment variables
    /// Priority: Environment Variables > Config File > Defaults
    ///
    /// An explicit `path` must exist; the default path may be absent.
    pub fn load(path: Option<&Path>) -> GcLogResult<Self> {
        let mut config = match path {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path.display());
                Self::from_file(path)?
            }
            None => {
                let config_path = std::env::var(CONFIG_FILE_ENV)
                    .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
                if Path::new(&config_path).exists() {
                    tracing::info!("Loading configuration from: {}", config_path);
                    Self::from_file(Path::new(&config_path))?
                } else {
                    tracing::debug!("Config file not found at {}, using defaults", config_path);
                    Self::default()
                }
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate().map_err(GcLogError::Config)?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> GcLogResult<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> GcLogResult<Self> {
        toml::from_str(contents).map_err(|e| GcLogError::Config(e.to_string()))
    }

    /// Apply `GCLOG_*` overrides. Unparseable values are ignored.
    pub fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = var("GCLOG_FORMAT") {
            match value.parse::<GcFormat>() {
                Ok(format) => self.format = Some(format),
                Err(e) => tracing::warn!("Ignoring GCLOG_FORMAT: {}", e),
            }
        }
        if let Some(size) = var("GCLOG_DETECTION_SAMPLE_SIZE").and_then(|s| s.parse().ok()) {
            self.detection_sample_size = size;
        }
        if let Some(size) = var("GCLOG_MAX_LINE_SIZE").and_then(|s| s.parse().ok()) {
            self.max_line_size = size;
        }
    }

    /// Validate that configuration values are sane
    pub fn validate(&self) -> Result<(), String> {
        if self.detection_sample_size == 0 {
            return Err("detection_sample_size must be > 0".to_string());
        }
        if self.max_line_size == 0 {
            return Err("max_line_size must be > 0".to_string());
        }
        Ok(())
    }
}
