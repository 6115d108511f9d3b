use log::info;

use super::classifier::Classifier;
use super::error::ClassifierError;
use super::labels::LabelSet;
use super::tokenizer::Vocabulary;
use super::weights::WeightTensors;

#[derive(Debug)]
enum RawWeights {
    Floats(Vec<f32>),
    Bytes(Vec<u8>),
}

/// A builder for assembling a [`Classifier`] from the three parts of a model bundle.
///
/// Weights are only parsed in [`build`](Self::build), because their expected
/// size depends on the vocabulary.
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    source: Option<String>,
    vocabulary: Option<Vocabulary>,
    labels: Option<LabelSet>,
    weights: Option<RawWeights>,
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Records where the bundle came from, reported by [`Classifier::info`]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    /// Parses a vocabulary file: a JSON array of words, index = token id
    pub fn with_vocabulary_json(self, bytes: &[u8]) -> Result<Self, ClassifierError> {
        let vocabulary = Vocabulary::from_json(bytes)?;
        info!("Vocabulary loaded with {} entries", vocabulary.len());
        Ok(self.with_vocabulary(vocabulary))
    }

    pub fn with_labels(mut self, labels: LabelSet) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Parses a labels file: a JSON object mapping `"0"`..`"15"` to label names
    pub fn with_labels_json(self, bytes: &[u8]) -> Result<Self, ClassifierError> {
        let labels = LabelSet::from_json(bytes)?;
        Ok(self.with_labels(labels))
    }

    /// Sets the flat weight buffer
    pub fn with_weights(mut self, weights: Vec<f32>) -> Self {
        self.weights = Some(RawWeights::Floats(weights));
        self
    }

    /// Sets the weights as the raw little-endian bytes of the weights file
    pub fn with_weights_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.weights = Some(RawWeights::Bytes(bytes));
        self
    }

    /// Builds and returns the final Classifier instance
    ///
    /// # Errors
    /// `MalformedModel` when a part is missing or the weights do not fit the vocabulary.
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        let vocabulary = self
            .vocabulary
            .ok_or_else(|| ClassifierError::MalformedModel("Vocabulary must be set".into()))?;
        let labels = self
            .labels
            .ok_or_else(|| ClassifierError::MalformedModel("Labels must be set".into()))?;
        let weights = match self.weights {
            Some(RawWeights::Floats(floats)) => WeightTensors::parse(floats, vocabulary.len())?,
            Some(RawWeights::Bytes(bytes)) => WeightTensors::from_le_bytes(&bytes, vocabulary.len())?,
            None => return Err(ClassifierError::MalformedModel("Weights must be set".into())),
        };

        let source = self.source.unwrap_or_else(|| "memory".to_string());
        info!("Classifier built from {} (vocabulary {}, {} labels)", source, vocabulary.len(), labels.as_slice().len());

        Ok(Classifier {
            source,
            vocabulary,
            labels,
            weights,
        })
    }
}
