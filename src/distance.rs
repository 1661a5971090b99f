use crate::memory::Primitive;

/// Squared Euclidean distance between two equally sized slices.
#[inline(always)]
pub(crate) fn squared_euclidean<T: Primitive>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip(b.iter())
        .map(|(&av, &bv)| av - bv)
        .map(|v| v * v)
        .sum()
}

/// Scans all `k` centroids (row-major, `ncols` wide) and returns the index of
/// the nearest one plus its squared distance. Ties break towards the lowest
/// centroid index; predict and transform-argmin share this rule.
#[inline(always)]
pub(crate) fn nearest_centroid<T: Primitive>(row: &[T], centroids: &[T], ncols: usize) -> (usize, T) {
    let mut best_idx = 0;
    let mut best_dist = T::infinity();
    for (idx, centroid) in centroids.chunks_exact(ncols).enumerate() {
        let dist = squared_euclidean(row, centroid);
        if dist < best_dist {
            best_idx = idx;
            best_dist = dist;
        }
    }
    (best_idx, best_dist)
}
