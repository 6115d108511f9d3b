use ndarray::Array1;

/// Numerically stable softmax: the maximum logit is subtracted before exponentiation.
pub(crate) fn softmax(logits: &Array1<f32>) -> Array1<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exp = logits.mapv(|z| (z - max).exp());
    let sum = exp.sum();
    exp / sum
}

/// Index and value of the largest element. Ties go to the lowest index.
pub(crate) fn argmax(values: &[f32]) -> (usize, f32) {
    let mut best = (0, f32::NEG_INFINITY);
    for (i, &v) in values.iter().enumerate() {
        if v > best.1 {
            best = (i, v);
        }
    }
    best
}
