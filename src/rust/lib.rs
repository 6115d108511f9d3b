//! Classifies SMTP bounce messages into 16 categories and recommends an action.
//!
//! A small network (embedding, average pooling, two dense layers, softmax) is
//! evaluated straight from the raw weights file. When it is unsure, a fixed
//! cascade of text patterns and SMTP status codes decides instead.
//!
//! # Basic Usage
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use bounce_classifier::{FileLoader, InitOptions, ModelManager};
//!
//! let manager = ModelManager::new(FileLoader);
//! manager
//!     .initialize(InitOptions::default().with_model_path("/srv/bounce-model"))
//!     .await?;
//!
//! let result = manager.classify("550 5.1.1 <bob@example.com>: User unknown").await?;
//! println!("{} -> {}", result.label, result.action);
//! # Ok(())
//! # }
//! ```
//!
//! # Rules without a model
//!
//! The rule helpers are plain functions and need no initialization:
//!
//! ```rust
//! use bounce_classifier::{extract_smtp_codes, extract_retry_timing, get_code_based_fallback};
//!
//! let codes = extract_smtp_codes("550 5.1.1 User unknown");
//! assert_eq!(codes.main_code.as_deref(), Some("550"));
//! assert_eq!(codes.extended_code.as_deref(), Some("5.1.1"));
//! assert_eq!(extract_retry_timing("Retry in 5 minutes"), Some(300));
//! assert_eq!(get_code_based_fallback("550 No such user here"), Some("user_unknown"));
//! ```
//!
//! # Thread Safety
//!
//! [`Classifier`] is immutable and `Send + Sync`. [`ModelManager`] hands out
//! `Arc<Classifier>` snapshots, so a `reset` or reload never disturbs a
//! classification that is already running.

pub mod classifier;
pub mod config;
pub mod loader;
pub mod model_manager;
pub mod rules;
pub mod runtime;

pub use classifier::{
    expected_weight_count, forward, ClassificationResult, Classifier, ClassifierBuilder,
    ClassifierError, ClassifierInfo, Decision, LabelSet, LoadError, Scores, TokenSequence,
    Vocabulary, WeightTensors, CONFIDENCE_THRESHOLD, MAX_INPUT_CHARS, NUM_LABELS,
    SEQUENCE_LENGTH,
};
pub use config::{default_model_path, InitOptions};
pub use loader::{load_classifier, AutoLoader, FileLoader, HttpLoader, ModelLoader, ModelSource};
pub use model_manager::ModelManager;
pub use rules::{
    extract_retry_timing, extract_smtp_codes, get_action, get_code_based_fallback,
    get_text_based_fallback, identify_blocklist, Action, BlocklistEntry, BlocklistKind,
    BlocklistMatch, SmtpCodes, ACTION_MAP, BLOCKLIST_SIGNATURES, KNOWN_LABELS, SMTP_CODE_MAP,
    SMTP_MAIN_CODE_MAP,
};

pub fn init_logger() {
    env_logger::init();
}
