use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SuiteError {
    #[error("Browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("JavaScript execution failed: {0}")]
    JavaScriptFailed(String),

    #[error("Waiting for {what} exceeded the {timeout_ms}ms budget")]
    TimeoutExceeded { what: String, timeout_ms: u64 },

    #[error("Keyword file {path:?} could not be read: {source}")]
    DataSourceUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SuiteError>;

// headless_chrome surfaces anyhow errors from most tab operations
impl From<anyhow::Error> for SuiteError {
    fn from(err: anyhow::Error) -> Self {
        SuiteError::JavaScriptFailed(err.to_string())
    }
}
