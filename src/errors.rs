use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoadgenError {
    // Config-related errors
    #[error("Failed to get config directory")]
    ConfigDirNotFound,

    #[error("Invalid generation config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Failed to serialize config: {0}")]
    SerializationFailed(#[from] toml::ser::Error),

    #[error("Failed to deserialize config: {0}")]
    DeserializationFailed(#[from] toml::de::Error),

    #[error("Config file not found at path: {path}")]
    ConfigFileNotFound { path: PathBuf },

    // Input / output errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid raster: {reason}")]
    InvalidRaster { reason: String },

    #[error("Map file not found at path: {path}")]
    MapFileNotFound { path: PathBuf },

    #[error("Corrupted map file: {reason}")]
    CorruptedMapFile { reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed solver data: {reason}")]
    MalformedSolverData { reason: String },
}

/// Result type alias for all operations
pub type RoadgenResult<T> = Result<T, RoadgenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roadgen_error_display() {
        let err = RoadgenError::InvalidRaster {
            reason: "raster is empty".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid raster: raster is empty");

        let err = RoadgenError::ConfigDirNotFound;
        assert_eq!(err.to_string(), "Failed to get config directory");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: RoadgenError = io.into();
        assert!(err.to_string().contains("missing"));
    }
}
