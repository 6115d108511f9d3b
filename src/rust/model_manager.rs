use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use log::{error, info};

use crate::classifier::{ClassificationResult, Classifier, ClassifierError};
use crate::config::InitOptions;
use crate::loader::{load_classifier, ModelLoader};

struct Loaded {
    options: InitOptions,
    classifier: Arc<Classifier>,
}

struct Failure {
    /// Value of `attempts` once this load had finished
    attempt: u64,
    options: InitOptions,
    error: ClassifierError,
}

/// Owns the loaded model and its lifecycle.
///
/// Loading goes through `init_lock`, so concurrent `initialize` calls wait for
/// the first one and then reuse its result instead of loading again. A failed
/// load publishes nothing and hands its error to every caller that was already
/// waiting; only calls made after the failure load again. Classification only
/// takes a read lock long enough to clone the `Arc`.
pub struct ModelManager<L: ModelLoader> {
    loader: L,
    state: RwLock<Option<Loaded>>,
    last_options: Mutex<InitOptions>,
    init_lock: tokio::sync::Mutex<()>,
    attempts: AtomicU64,
    last_failure: Mutex<Option<Failure>>,
}

impl<L: ModelLoader> ModelManager<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            state: RwLock::new(None),
            last_options: Mutex::new(InitOptions::default()),
            init_lock: tokio::sync::Mutex::new(()),
            attempts: AtomicU64::new(0),
            last_failure: Mutex::new(None),
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// The loaded classifier, if any
    pub fn classifier(&self) -> Option<Arc<Classifier>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|loaded| Arc::clone(&loaded.classifier))
    }

    fn loaded_for(&self, options: &InitOptions) -> Option<Arc<Classifier>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .as_ref()
            .filter(|loaded| same_bundle(&loaded.options, options))
            .map(|loaded| Arc::clone(&loaded.classifier))
    }

    /// Error of a load for the same bundle that finished after `seen`
    fn failed_since(&self, seen: u64, options: &InitOptions) -> Option<ClassifierError> {
        let failure = self.last_failure.lock().unwrap_or_else(PoisonError::into_inner);
        failure
            .as_ref()
            .filter(|f| f.attempt > seen && same_bundle(&f.options, options))
            .map(|f| f.error.clone())
    }

    /// Loads the model bundle described by `options`.
    ///
    /// Returns immediately when the same bundle is already loaded. A different
    /// bundle replaces the current one only once it has loaded completely.
    pub async fn initialize(&self, options: InitOptions) -> Result<Arc<Classifier>, ClassifierError> {
        options.validate()?;
        *self.last_options.lock().unwrap_or_else(PoisonError::into_inner) = options.clone();

        if let Some(classifier) = self.loaded_for(&options) {
            return Ok(classifier);
        }

        let seen = self.attempts.load(Ordering::SeqCst);
        let _lock = self.init_lock.lock().await;

        // Another caller may have finished the same load while we waited
        if let Some(classifier) = self.loaded_for(&options) {
            info!("Model already initialized by a concurrent caller");
            return Ok(classifier);
        }
        if let Some(e) = self.failed_since(seen, &options) {
            info!("Concurrent model initialization failed, not retrying");
            return Err(e);
        }

        let result = load_classifier(&self.loader, &options).await;
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;

        match result {
            Ok(classifier) => {
                *self.last_failure.lock().unwrap_or_else(PoisonError::into_inner) = None;
                let classifier = Arc::new(classifier);
                *self.state.write().unwrap_or_else(PoisonError::into_inner) = Some(Loaded {
                    options,
                    classifier: Arc::clone(&classifier),
                });
                info!("Model initialized");
                Ok(classifier)
            }
            Err(e) => {
                error!("Failed to initialize model: {}", e);
                *self.last_failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(Failure {
                    attempt,
                    options,
                    error: e.clone(),
                });
                Err(e)
            }
        }
    }

    /// Returns the loaded classifier, initializing with the last used options
    /// (or defaults) when there is none.
    pub async fn ensure_initialized(&self) -> Result<Arc<Classifier>, ClassifierError> {
        if let Some(classifier) = self.classifier() {
            return Ok(classifier);
        }
        let options = self.last_options.lock().unwrap_or_else(PoisonError::into_inner).clone();
        self.initialize(options).await
    }

    pub async fn classify(&self, message: &str) -> Result<ClassificationResult, ClassifierError> {
        self.ensure_initialized().await?.classify(message)
    }

    pub async fn classify_value(&self, value: &serde_json::Value) -> Result<ClassificationResult, ClassifierError> {
        self.ensure_initialized().await?.classify_value(value)
    }

    pub async fn classify_batch<S: AsRef<str>>(
        &self,
        messages: &[S],
    ) -> Result<Vec<Result<ClassificationResult, ClassifierError>>, ClassifierError> {
        Ok(self.ensure_initialized().await?.classify_batch(messages))
    }

    /// Labels in class-index order
    pub fn get_labels(&self) -> Result<Vec<String>, ClassifierError> {
        self.classifier()
            .map(|c| c.labels().as_slice().to_vec())
            .ok_or(ClassifierError::NotInitialized)
    }

    pub fn is_ready(&self) -> bool {
        self.state.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Drops the loaded model. The next classification loads it again.
    pub fn reset(&self) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = None;
        info!("Model state reset");
    }
}

fn same_bundle(a: &InitOptions, b: &InitOptions) -> bool {
    a.resolved_model_path() == b.resolved_model_path()
        && a.weights_sha256.as_deref().map(str::to_ascii_lowercase)
            == b.weights_sha256.as_deref().map(str::to_ascii_lowercase)
}
