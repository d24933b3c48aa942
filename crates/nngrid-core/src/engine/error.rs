use super::config::ConfigError;
use crate::core::io::traits::SourceError;
use crate::core::models::type_map::TypeMapError;
use crate::core::models::types::TypeTableError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid grid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Atom type table error: {0}")]
    TypeTable(#[from] TypeTableError),

    #[error("Channel map error for {side} side: {source}")]
    TypeMap {
        side: &'static str,
        #[source]
        source: TypeMapError,
    },

    #[error("Failed to read structure: {0}")]
    Source(#[from] SourceError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Failure writing a grid to its destination.
#[derive(Debug, Error)]
#[error("Failed to write '{path}': {source}", path = path.display())]
pub struct OutputError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl OutputError {
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}
