//! Error types for terrain generation and export.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TerrainError>;

#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("Invalid grid dimension {size}: a height grid needs at least 2 cells per side")]
    InvalidDimension { size: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Malformed CSV at line {line}: {message}")]
    Csv { line: usize, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upload failed: {0}")]
    Upload(String),
}

impl TerrainError {
    /// True for errors caused by caller-supplied values rather than the environment.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            TerrainError::InvalidDimension { .. } | TerrainError::InvalidParameter(_)
        )
    }
}
