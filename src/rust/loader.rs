use std::future::Future;
use std::path::Path;
use std::time::Duration;
use log::{error, info};
use sha2::{Digest, Sha256};

use crate::classifier::{Classifier, ClassifierError, LoadError};
use crate::config::{InitOptions, LABELS_FILE, VOCAB_FILE, WEIGHTS_FILE};

/// Where a model bundle lives and how long a fetch may take
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSource {
    pub location: String,
    pub timeout: Duration,
}

impl ModelSource {
    pub fn from_options(options: &InitOptions) -> Self {
        Self {
            location: options.resolved_model_path(),
            timeout: options.http_timeout(),
        }
    }

    pub fn is_remote(&self) -> bool {
        self.location.starts_with("http://") || self.location.starts_with("https://")
    }
}

/// Fetches the raw bytes of one bundle file.
///
/// The classifier core only depends on this capability; whether the bytes come
/// from disk, the network or memory is up to the implementation.
pub trait ModelLoader: Send + Sync {
    fn load_bytes(
        &self,
        source: &ModelSource,
        file: &str,
    ) -> impl Future<Output = Result<Vec<u8>, LoadError>> + Send;
}

/// Reads bundle files from a local directory
#[derive(Debug, Clone, Default)]
pub struct FileLoader;

impl ModelLoader for FileLoader {
    async fn load_bytes(&self, source: &ModelSource, file: &str) -> Result<Vec<u8>, LoadError> {
        let path = Path::new(&source.location).join(file);
        info!("Reading {:?}", path);
        let bytes = tokio::fs::read(&path).await?;
        info!("Read {} bytes", bytes.len());
        Ok(bytes)
    }
}

/// Downloads bundle files relative to a base URL
#[derive(Debug, Clone, Default)]
pub struct HttpLoader {
    client: reqwest::Client,
}

impl HttpLoader {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ModelLoader for HttpLoader {
    async fn load_bytes(&self, source: &ModelSource, file: &str) -> Result<Vec<u8>, LoadError> {
        let url = format!("{}/{}", source.location.trim_end_matches('/'), file);
        info!("Downloading {}", url);
        let response = self
            .client
            .get(&url)
            .timeout(source.timeout)
            .send()
            .await?
            .error_for_status()?;
        info!("Download response status: {}", response.status());
        let bytes = response.bytes().await?;
        info!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}

/// Picks [`HttpLoader`] for `http(s)://` locations and [`FileLoader`] otherwise
#[derive(Debug, Clone, Default)]
pub struct AutoLoader {
    file: FileLoader,
    http: HttpLoader,
}

impl ModelLoader for AutoLoader {
    async fn load_bytes(&self, source: &ModelSource, file: &str) -> Result<Vec<u8>, LoadError> {
        if source.is_remote() {
            self.http.load_bytes(source, file).await
        } else {
            self.file.load_bytes(source, file).await
        }
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn verify_sha256(bytes: &[u8], expected: &str, file: &str) -> Result<(), LoadError> {
    let actual = sha256_hex(bytes);
    info!("Calculated hash: {}", actual);
    info!("Expected hash:   {}", expected);
    if !actual.eq_ignore_ascii_case(expected) {
        error!("{} hash mismatch: expected {}, got {}", file, expected, actual);
        return Err(LoadError::HashMismatch {
            file: file.to_string(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

/// Fetches the three bundle files and assembles a [`Classifier`].
pub async fn load_classifier<L: ModelLoader>(
    loader: &L,
    options: &InitOptions,
) -> Result<Classifier, ClassifierError> {
    options.validate()?;
    let source = ModelSource::from_options(options);
    info!("Loading model bundle from {}", source.location);

    let (vocab, labels, weights) = tokio::try_join!(
        loader.load_bytes(&source, VOCAB_FILE),
        loader.load_bytes(&source, LABELS_FILE),
        loader.load_bytes(&source, WEIGHTS_FILE),
    )?;

    if let Some(expected) = &options.weights_sha256 {
        verify_sha256(&weights, expected, WEIGHTS_FILE)?;
    }

    Classifier::builder()
        .with_source(source.location)
        .with_vocabulary_json(&vocab)?
        .with_labels_json(&labels)?
        .with_weights_bytes(weights)
        .build()
}
