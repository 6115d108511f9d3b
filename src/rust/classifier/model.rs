use ndarray::Array1;
use serde::Serialize;

use super::embedding::pooled_embedding;
use super::tokenizer::TokenSequence;
use super::utils::{argmax, softmax};
use super::weights::WeightTensors;
use super::NUM_LABELS;

/// Per-label probabilities in class-index order
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Scores([f32; NUM_LABELS]);

impl Scores {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Winning class index and its probability. Ties resolve to the lowest index.
    pub fn best(&self) -> (usize, f32) {
        argmax(&self.0)
    }
}

/// Runs the network over one token sequence.
///
/// embedding lookup → average pooling → dense 64 (ReLU) → dense 16 → softmax
pub fn forward(tokens: &TokenSequence, weights: &WeightTensors) -> Scores {
    let pooled = pooled_embedding(tokens, weights);

    let hidden = (pooled.dot(&weights.dense1_kernel()) + &weights.dense1_bias())
        .mapv_into(|v| v.max(0.0));
    let logits: Array1<f32> = hidden.dot(&weights.dense2_kernel()) + &weights.dense2_bias();

    let probs = softmax(&logits);
    let mut scores = [0.0; NUM_LABELS];
    for (dst, &p) in scores.iter_mut().zip(probs.iter()) {
        *dst = p;
    }
    Scores(scores)
}
