use std::env;
use std::path::PathBuf;
use std::time::Duration;
use serde::Deserialize;

use crate::classifier::ClassifierError;

/// Environment variable that overrides the default model location
pub const MODEL_PATH_ENV: &str = "BOUNCE_CLASSIFIER_MODEL_PATH";

/// File names inside a model bundle
pub const VOCAB_FILE: &str = "vocab.json";
pub const LABELS_FILE: &str = "labels.json";
pub const WEIGHTS_FILE: &str = "weights.bin";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Options accepted by `initialize`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InitOptions {
    /// Directory or base URL holding `vocab.json`, `labels.json` and `weights.bin`
    pub model_path: Option<String>,
    /// Expected SHA-256 of `weights.bin`, lowercase or uppercase hex
    pub weights_sha256: Option<String>,
    /// Timeout for fetching bundle files over HTTP
    pub http_timeout_secs: Option<u64>,
}

impl InitOptions {
    pub fn with_model_path(mut self, path: impl Into<String>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    pub fn with_weights_sha256(mut self, digest: impl Into<String>) -> Self {
        self.weights_sha256 = Some(digest.into());
        self
    }

    /// Parses options from JSON. Unknown keys and wrong types are configuration errors.
    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        let options: Self = serde_json::from_str(json)
            .map_err(|e| ClassifierError::Configuration(format!("Invalid options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ClassifierError> {
        if let Some(path) = &self.model_path {
            if path.trim().is_empty() {
                return Err(ClassifierError::Configuration("modelPath cannot be empty".into()));
            }
        }
        if let Some(digest) = &self.weights_sha256 {
            if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ClassifierError::Configuration(format!(
                    "weightsSha256 must be 64 hex characters, got '{}'",
                    digest
                )));
            }
        }
        if self.http_timeout_secs == Some(0) {
            return Err(ClassifierError::Configuration("httpTimeoutSecs must be positive".into()));
        }
        Ok(())
    }

    /// The configured model path, or [`default_model_path`]
    pub fn resolved_model_path(&self) -> String {
        self.model_path
            .clone()
            .unwrap_or_else(|| default_model_path().to_string_lossy().to_string())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS))
    }
}

/// Returns the default model directory path
pub fn default_model_path() -> PathBuf {
    // 1. Check environment variable
    if let Ok(path) = env::var(MODEL_PATH_ENV) {
        return PathBuf::from(path);
    }

    // 2. Use platform-specific data directory
    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("bounce-classifier").join("model");
    }

    // 3. Fallback to user's home directory
    if let Some(home_dir) = dirs::home_dir() {
        return home_dir.join(".local").join("share").join("bounce-classifier").join("model");
    }

    // 4. If all else fails, use system temp directory
    env::temp_dir().join("bounce-classifier").join("model")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let options = InitOptions::from_json(r#"{"modelPath": "/srv/model", "httpTimeoutSecs": 5}"#).unwrap();
        assert_eq!(options.model_path.as_deref(), Some("/srv/model"));
        assert_eq!(options.http_timeout(), Duration::from_secs(5));
        assert_eq!(InitOptions::from_json("{}").unwrap(), InitOptions::default());
    }

    #[test]
    fn test_malformed_options() {
        for json in [
            r#"{"modelPath": 3}"#,
            r#"{"modelpath": "/x"}"#,
            r#"{"modelPath": "   "}"#,
            r#"{"weightsSha256": "abc"}"#,
            r#"{"httpTimeoutSecs": 0}"#,
            "not json",
        ] {
            assert!(
                matches!(InitOptions::from_json(json), Err(ClassifierError::Configuration(_))),
                "{json}"
            );
        }
    }

    #[test]
    fn test_default_model_path() {
        // Test with environment variable
        env::set_var(MODEL_PATH_ENV, "/tmp/test-bounce-model");
        assert_eq!(default_model_path(), PathBuf::from("/tmp/test-bounce-model"));
        env::remove_var(MODEL_PATH_ENV);

        // Test without environment variable
        let path = default_model_path();
        assert!(path.to_str().unwrap().contains("bounce-classifier"));
    }
}
