//! Function-specific error types

use thiserror::Error;
use ytsubs_lib::CaptionError;

pub type Result<T> = std::result::Result<T, FunctionError>;

#[derive(Debug, Error)]
pub enum FunctionError {
    #[error("Library error: {0}")]
    Library(#[from] CaptionError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
