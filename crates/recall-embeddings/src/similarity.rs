//! Vector similarity and validation helpers.

use recall_core::errors::EmbeddingError;

/// Cosine similarity of two vectors, in [-1, 1].
///
/// Fails with `DimensionMismatch` when lengths differ and with
/// `ZeroMagnitude` when either vector has zero norm. Accumulates in f64.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(EmbeddingError::ZeroMagnitude);
    }

    let cos = dot / (norm_a.sqrt() * norm_b.sqrt());
    Ok(cos.clamp(-1.0, 1.0) as f32)
}

/// Clamp a score into [0, 1]. NaN maps to 0.
pub fn clamp_unit(score: f32) -> f32 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// Whether `vector` is a non-empty, finite vector of the expected dimension.
pub fn is_valid(vector: &[f32], dimensions: usize) -> bool {
    !vector.is_empty() && vector.len() == dimensions && vector.iter().all(|x| x.is_finite())
}

/// L2-normalize in place. A zero vector is left untouched.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}
