use ndarray::{ArrayView1, ArrayView2};

use super::error::ClassifierError;
use super::{EMBEDDING_DIM, HIDDEN_UNITS, NUM_LABELS};

const DENSE1_KERNEL_LEN: usize = EMBEDDING_DIM * HIDDEN_UNITS;
const DENSE1_BIAS_LEN: usize = HIDDEN_UNITS;
const DENSE2_KERNEL_LEN: usize = HIDDEN_UNITS * NUM_LABELS;
const DENSE2_BIAS_LEN: usize = NUM_LABELS;

/// Float count of everything that precedes the embedding matrix
pub const FIXED_WEIGHT_COUNT: usize =
    DENSE1_KERNEL_LEN + DENSE1_BIAS_LEN + DENSE2_KERNEL_LEN + DENSE2_BIAS_LEN;

/// Number of floats a weights buffer must hold for the given vocabulary size
pub fn expected_weight_count(vocab_size: usize) -> usize {
    FIXED_WEIGHT_COUNT + vocab_size * EMBEDDING_DIM
}

/// The five tensors of the network, kept in the flat buffer they were parsed from.
///
/// Layout, in order: dense1 kernel `[64, 64]`, dense1 bias `[64]`,
/// dense2 kernel `[64, 16]`, dense2 bias `[16]`, embedding `[vocab_size, 64]`.
/// Kernels are input-major, so `kernel[input * outputs + output]`.
#[derive(Debug, Clone)]
pub struct WeightTensors {
    buffer: Vec<f32>,
    vocab_size: usize,
}

impl WeightTensors {
    pub fn parse(buffer: Vec<f32>, vocab_size: usize) -> Result<Self, ClassifierError> {
        let expected = expected_weight_count(vocab_size);
        if buffer.len() != expected {
            return Err(ClassifierError::MalformedModel(format!(
                "Weight buffer holds {} floats, expected {} for a vocabulary of {}",
                buffer.len(),
                expected,
                vocab_size
            )));
        }
        if let Some(i) = buffer.iter().position(|v| !v.is_finite()) {
            return Err(ClassifierError::MalformedModel(format!(
                "Weight {} is not a finite number ({})",
                i, buffer[i]
            )));
        }
        Ok(Self { buffer, vocab_size })
    }

    /// Decodes raw little-endian `f32` bytes and parses them
    pub fn from_le_bytes(bytes: &[u8], vocab_size: usize) -> Result<Self, ClassifierError> {
        if bytes.len() % 4 != 0 {
            return Err(ClassifierError::MalformedModel(format!(
                "Weights file length {} is not a multiple of 4 bytes",
                bytes.len()
            )));
        }
        let floats = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Self::parse(floats, vocab_size)
    }

    fn section(&self, offset: usize, len: usize) -> &[f32] {
        &self.buffer[offset..offset + len]
    }

    pub fn dense1_kernel(&self) -> ArrayView2<'_, f32> {
        ArrayView2::from_shape((EMBEDDING_DIM, HIDDEN_UNITS), self.section(0, DENSE1_KERNEL_LEN))
            .expect("dense1 kernel shape is fixed at parse time")
    }

    pub fn dense1_bias(&self) -> ArrayView1<'_, f32> {
        ArrayView1::from(self.section(DENSE1_KERNEL_LEN, DENSE1_BIAS_LEN))
    }

    pub fn dense2_kernel(&self) -> ArrayView2<'_, f32> {
        ArrayView2::from_shape(
            (HIDDEN_UNITS, NUM_LABELS),
            self.section(DENSE1_KERNEL_LEN + DENSE1_BIAS_LEN, DENSE2_KERNEL_LEN),
        )
        .expect("dense2 kernel shape is fixed at parse time")
    }

    pub fn dense2_bias(&self) -> ArrayView1<'_, f32> {
        ArrayView1::from(self.section(FIXED_WEIGHT_COUNT - DENSE2_BIAS_LEN, DENSE2_BIAS_LEN))
    }

    pub fn embedding(&self) -> ArrayView2<'_, f32> {
        ArrayView2::from_shape(
            (self.vocab_size, EMBEDDING_DIM),
            &self.buffer[FIXED_WEIGHT_COUNT..],
        )
        .expect("embedding shape is fixed at parse time")
    }
}
