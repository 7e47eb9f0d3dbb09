use thiserror::Error;

use crate::config::ConfigError;
use crate::core::constraint::ConstraintError;
use crate::core::coordinate::CoordinateError;
use crate::core::dependency::DescriptorError;
use crate::graph::builder::IngestError;
use crate::resolver::ResolutionError;

#[derive(Debug, Error)]
pub enum ArtifactGraphError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Constraint(#[from] ConstraintError),
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ArtifactGraphError>;
