use crate::memory::Primitive;

/// Terminal state of the refine loop. Both variants yield a usable model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The inertia drop fell below the configured tolerance.
    Converged,
    /// The iteration cap was reached first. Not an error, but callers may
    /// want to refit with a higher `max_iter` or looser `tol`.
    MaxIterReached,
}

/// The fitted model state, frozen at convergence or at the iteration cap.
///
/// ## Fields
/// - **centroids**: Final cluster centers [row-major] = [<centroid0>,<centroid1>,...]
/// - **inertia**: Sum of squared distances from every row to its assigned centroid
/// - **n_iter**: Number of Lloyd iterations that were run
/// - **stop_reason**: Why the refine loop ended
/// - **centroid_frequency**: Amount of rows assigned to each centroid in the
///   final assignment pass; a zero entry records a degenerate (empty) cluster
#[derive(Clone, Debug)]
pub struct KMeansModel<T: Primitive> {
    pub n_clusters: usize,
    pub ncols: usize,
    pub centroids: Vec<T>,
    pub inertia: T,
    pub n_iter: usize,
    pub stop_reason: StopReason,
    pub centroid_frequency: Vec<usize>,
}

impl<T: Primitive> KMeansModel<T> {
    pub fn converged(&self) -> bool {
        self.stop_reason == StopReason::Converged
    }

    /// The `j`-th centroid as a feature slice.
    pub fn centroid(&self, j: usize) -> &[T] {
        &self.centroids[j * self.ncols..(j + 1) * self.ncols]
    }
}
