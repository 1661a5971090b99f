use crate::error::{KMeansError, Result};
use crate::memory::Primitive;

/// Validates an explicit `k × ncols` centroid matrix and hands it over as the
/// initial centroid set.
pub(crate) fn seed<T: Primitive>(centroids: &[T], k: usize, ncols: usize) -> Result<Vec<T>> {
    if centroids.len() != k * ncols {
        return Err(KMeansError::ShapeMismatch {
            nrows: k,
            ncols,
            expected: k * ncols,
            actual: centroids.len(),
        });
    }
    Ok(centroids.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_shape() {
        let m = vec![0.0f64, 1.0, 2.0, 3.0];
        assert_eq!(seed(&m, 2, 2).unwrap(), m);
    }

    #[test]
    fn rejects_wrong_shape() {
        let m = vec![0.0f64; 5];
        assert!(matches!(seed(&m, 2, 2), Err(KMeansError::ShapeMismatch { .. })));
    }
}
