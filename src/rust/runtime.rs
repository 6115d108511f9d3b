//! Process-wide default classifier for callers that do not want to own a
//! [`ModelManager`]. Every function forwards to one lazily created instance
//! backed by [`AutoLoader`].

use lazy_static::lazy_static;

use crate::classifier::{ClassificationResult, ClassifierError};
use crate::config::InitOptions;
use crate::loader::AutoLoader;
use crate::model_manager::ModelManager;

lazy_static! {
    static ref DEFAULT_MANAGER: ModelManager<AutoLoader> = ModelManager::new(AutoLoader::default());
}

/// The shared instance behind the free functions of this module
pub fn default_manager() -> &'static ModelManager<AutoLoader> {
    &DEFAULT_MANAGER
}

pub async fn initialize(options: InitOptions) -> Result<(), ClassifierError> {
    DEFAULT_MANAGER.initialize(options).await.map(|_| ())
}

/// Classifies with the shared instance, loading the model first if needed
pub async fn classify(message: &str) -> Result<ClassificationResult, ClassifierError> {
    DEFAULT_MANAGER.classify(message).await
}

pub fn get_labels() -> Result<Vec<String>, ClassifierError> {
    DEFAULT_MANAGER.get_labels()
}

pub fn is_ready() -> bool {
    DEFAULT_MANAGER.is_ready()
}

pub fn reset() {
    DEFAULT_MANAGER.reset()
}
