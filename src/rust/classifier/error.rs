use std::io;
use std::sync::Arc;

/// Errors raised while fetching model bundle files.
///
/// Sources are behind an `Arc` so one failed load can be reported to every
/// caller that was waiting on it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[source] Arc<io::Error>),
    #[error("Download error: {0}")]
    Http(#[source] Arc<reqwest::Error>),
    #[error("Hash mismatch: expected {expected}, got {actual} for {file} file")]
    HashMismatch {
        file: String,
        expected: String,
        actual: String,
    },
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        LoadError::Http(Arc::new(err))
    }
}

/// Represents the different types of errors that can occur in the bounce classifier.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClassifierError {
    /// The message passed to `classify` was missing, empty or whitespace-only
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Initialization options were malformed
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Vocabulary, labels or weights did not match the fixed architecture
    #[error("Malformed model: {0}")]
    MalformedModel(String),
    /// A bundle file could not be fetched or verified
    #[error("Load error: {0}")]
    Load(#[from] LoadError),
    /// The classifier was queried before a model was loaded
    #[error("Classifier is not initialized")]
    NotInitialized,
}

impl From<serde_json::Error> for ClassifierError {
    fn from(err: serde_json::Error) -> Self {
        ClassifierError::MalformedModel(err.to_string())
    }
}
