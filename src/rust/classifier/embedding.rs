use ndarray::Array1;

use super::tokenizer::TokenSequence;
use super::weights::WeightTensors;
use super::{EMBEDDING_DIM, OOV_ID, SEQUENCE_LENGTH};

/// Average-pools the embedding rows of a token sequence.
///
/// All [`SEQUENCE_LENGTH`] positions contribute, padding included, and the sum
/// is divided by the constant sequence length rather than the word count.
///
/// Ids beyond the embedding matrix are read as the OOV row.
pub(crate) fn pooled_embedding(tokens: &TokenSequence, weights: &WeightTensors) -> Array1<f32> {
    let embedding = weights.embedding();
    let rows = embedding.nrows();
    let mut acc = Array1::<f32>::zeros(EMBEDDING_DIM);

    for &id in tokens.ids() {
        let row = if (id as usize) < rows { id as usize } else { OOV_ID as usize };
        acc += &embedding.row(row);
    }

    acc / SEQUENCE_LENGTH as f32
}
