use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the tailwind-template-scanner crate
#[derive(Debug, Error)]
pub enum ScannerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Cannot access {}: {message}", path.display())]
    Access { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to write artifact to {path}: {message}")]
    Write { path: String, message: String },

    #[error("File watch error: {0}")]
    Watch(String),
}

pub type Result<T> = std::result::Result<T, ScannerError>;
