pub mod resolve;
pub mod settings;

pub use settings::{DataConfig, GraphConfig, ResolutionSettings};

use std::path::PathBuf;

use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "artifact-graph.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("no artifact data configured; pass --data or set [data].path")]
    MissingDataPath,
    #[error("invalid value '{value}' for {name}")]
    InvalidValue { name: String, value: String },
    #[error("invalid scope in [resolution].scopes: {0}")]
    InvalidScope(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config at {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
