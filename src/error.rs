use thiserror::Error;

/// Application-level errors outside the conversion pipeline
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("could not serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}
