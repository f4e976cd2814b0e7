use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Persistent application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default CRF for new batches (0-51, lower = higher quality)
    pub default_crf: u8,
    /// Encoder executable invoked for each job
    pub ffmpeg_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_crf: 23,
            ffmpeg_path: "ffmpeg".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file, or create default if not found
    pub fn load() -> Self {
        let config_path = Self::config_path();

        if config_path.exists() {
            match Self::load_from_file(&config_path) {
                Ok(config) => {
                    info!("Loaded config from {}", config_path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config: {}. Using defaults.", e);
                }
            }
        }

        let config = Self::default();
        // Save default config for future editing
        if let Err(e) = config.save() {
            warn!("Failed to save default config: {}", e);
        }
        config
    }

    /// Save configuration to TOML file
    pub fn save(&self) -> Result<(), AppError> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, toml_string)
            .map_err(|e| AppError::Config(format!("Failed to write config file: {}", e)))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Load configuration from a specific file
    fn load_from_file(path: &PathBuf) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config file: {}", e)))?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the default configuration file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hevc2mp4")
            .join("config.toml")
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), AppError> {
        if self.default_crf > 51 {
            return Err(AppError::Config(
                "CRF must be between 0 and 51".to_string(),
            ));
        }
        if self.ffmpeg_path.trim().is_empty() {
            return Err(AppError::Config(
                "ffmpeg_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert_eq!(config.default_crf, 23);
        assert_eq!(config.ffmpeg_path, "ffmpeg");
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_out_of_range_crf() {
        let config = AppConfig {
            default_crf: 52,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_encoder_path() {
        let config = AppConfig {
            ffmpeg_path: "  ".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: AppConfig = toml::from_str("default_crf = 18").unwrap();
        assert_eq!(config.default_crf, 18);
        assert_eq!(config.ffmpeg_path, "ffmpeg");
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = AppConfig {
            default_crf: 28,
            ffmpeg_path: "/opt/ffmpeg/bin/ffmpeg".to_string(),
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.default_crf, 28);
        assert_eq!(parsed.ffmpeg_path, "/opt/ffmpeg/bin/ffmpeg");
    }
}
