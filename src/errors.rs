use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerrainError {
    // Heightfield errors
    #[error("Invalid heightfield: {reason}")]
    InvalidHeightField { reason: String },

    #[error("Heightfield file not found at path: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Corrupted heightfield file: {reason}")]
    CorruptedHeightFieldFile { reason: String },

    // Config-related errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Failed to get config directory")]
    ConfigDirNotFound,

    #[error("Failed to serialize config: {0}")]
    SerializationFailed(#[from] toml::ser::Error),

    #[error("Failed to deserialize config: {0}")]
    DeserializationFailed(#[from] toml::de::Error),

    // Command-line and export errors
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Failed to export image: {0}")]
    ImageExport(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for all fallible operations
pub type TerrainResult<T> = Result<T, TerrainError>;
