use crate::error::EvaluatorError;

/// Cosine similarity between two embedding vectors, mapped to [0,1].
///
/// Raw cosine lives in [-1,1]; callers treating similarity as a
/// confidence dimension need [0,1], so the result is shifted and scaled.
/// A zero-norm vector has no direction and yields an error (the caller
/// maps it to an absent factor).
pub fn cosine_similarity(left: &[f32], right: &[f32]) -> Result<f64, EvaluatorError> {
    if left.len() != right.len() {
        return Err(EvaluatorError::DimensionMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_left = 0.0f64;
    let mut norm_right = 0.0f64;
    for (l, r) in left.iter().zip(right.iter()) {
        dot += f64::from(*l) * f64::from(*r);
        norm_left += f64::from(*l) * f64::from(*l);
        norm_right += f64::from(*r) * f64::from(*r);
    }

    if norm_left == 0.0 || norm_right == 0.0 {
        return Err(EvaluatorError::ZeroNorm);
    }

    let cosine = dot / (norm_left.sqrt() * norm_right.sqrt());
    Ok(((cosine + 1.0) / 2.0).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_score_one() {
        let v = [0.5f32, 0.25, 0.1];
        let sim = cosine_similarity(&v, &v).unwrap();
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn opposite_vectors_score_zero() {
        let a = [1.0f32, 0.0];
        let b = [-1.0f32, 0.0];
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!(sim.abs() < 1e-9);
    }

    #[test]
    fn orthogonal_vectors_score_half() {
        let a = [1.0f32, 0.0];
        let b = [0.0f32, 1.0];
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((sim - 0.5).abs() < 1e-9);
    }

    #[test]
    fn mismatched_dimensions_error() {
        let a = [1.0f32, 0.0];
        let b = [1.0f32];
        assert!(cosine_similarity(&a, &b).is_err());
    }

    #[test]
    fn zero_norm_errors() {
        let a = [0.0f32, 0.0];
        let b = [1.0f32, 0.0];
        assert!(cosine_similarity(&a, &b).is_err());
    }
}
