use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GladError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Unreadable path while matching pattern: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid asset identifier: {0:?}")]
    InvalidAsset(String),

    #[error("{tool} failed ({status}):\n{output}")]
    ToolFailed {
        tool: String,
        status: String,
        output: String,
    },

    #[error("No downloaded tiles match {0}")]
    NoLocalTiles(String),

    #[error("Remote store error: {0}")]
    Remote(String),

    #[error("Statistics file not found: {}", .0.display())]
    MissingStatistics(PathBuf),

    #[error("Malformed statistics line {line}: {reason}")]
    MalformedStatistics { line: usize, reason: String },

    #[error("Earth Engine session error: {0}")]
    Session(String),

    #[error("Earth Engine session already closed")]
    SessionClosed,
}

pub type Result<T> = std::result::Result<T, GladError>;
