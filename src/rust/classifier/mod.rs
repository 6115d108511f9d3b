mod error;
mod embedding;
mod model;
mod labels;
mod tokenizer;
mod weights;
pub mod builder;
#[allow(clippy::module_inception)]
mod classifier;
mod utils;

pub use error::{ClassifierError, LoadError};
pub use model::{forward, Scores};
pub use labels::LabelSet;
pub use tokenizer::{TokenSequence, Vocabulary};
pub use weights::{expected_weight_count, WeightTensors, FIXED_WEIGHT_COUNT};
pub use builder::ClassifierBuilder;
pub use classifier::{
    ClassificationResult, Classifier, Decision, CONFIDENCE_THRESHOLD, MAX_INPUT_CHARS,
};

/// Number of token positions the network reads
pub const SEQUENCE_LENGTH: usize = 100;
/// Width of the embedding vectors
pub const EMBEDDING_DIM: usize = 64;
/// Width of the hidden dense layer
pub const HIDDEN_UNITS: usize = 64;
/// Number of output classes
pub const NUM_LABELS: usize = 16;
/// Token id used for padding
pub const PAD_ID: u32 = 0;
/// Token id for words outside the vocabulary
pub const OOV_ID: u32 = 1;

/// Information about a loaded classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Where the model bundle was loaded from
    pub source: String,
    /// Number of vocabulary entries, reserved ids included
    pub vocab_size: usize,
    /// Labels in class-index order
    pub labels: Vec<String>,
}
