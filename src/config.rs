use crate::memory::Primitive;

/// Callback invoked once seeding finished, with the initial `k × ncols`
/// centroid matrix.
pub type InitDoneCallbackFn<'a, T> = &'a dyn Fn(&[T]);
/// Callback invoked after each Lloyd iteration.
/// ## Arguments
/// - **iteration**: Number of the iteration that just finished
/// - **prev_inertia**: Inertia before the iteration
/// - **inertia**: Inertia measured during the iteration
pub type IterationDoneCallbackFn<'a, T> = &'a dyn Fn(usize, T, T);

/// How the initial centroid set is produced.
#[derive(Clone, Debug)]
pub enum Init<T: Primitive> {
    /// k-means|| — distributed oversampled seeding, reduced to `k` centroids
    /// by a local weighted clustering pass.
    ScalableKMeans,
    /// An explicit `k × ncols` centroid matrix [row-major].
    Precomputed(Vec<T>),
}

/// Configuration of a single fit call.
///
/// Built through [`KMeansConfigBuilder`]; every option has a default, so
/// `KMeansConfig::build().n_clusters(5).build()` is a complete configuration.
pub struct KMeansConfig<'a, T: Primitive> {
    /// Number of clusters to search for.
    pub(crate) n_clusters: usize,
    /// Centroid initialization method.
    pub(crate) init: Init<T>,
    /// Hard cap on the number of Lloyd iterations.
    pub(crate) max_iter: usize,
    /// Convergence threshold on the drop in inertia between two consecutive
    /// iterations.
    pub(crate) tol: T,
    /// Seed for all randomness of the fit. Fixing it (together with the
    /// partitioning) makes the fit deterministic.
    pub(crate) random_state: u64,
    /// Escalates per-iteration progress from `debug` to `info` level logs.
    pub(crate) verbose: bool,
    /// k-means|| expected samples per round; defaults to `2 * n_clusters`.
    pub(crate) oversampling_factor: Option<T>,
    /// k-means|| sampling rounds; defaults to `clamp(ceil(ln nrows), 1, 8)`.
    pub(crate) seeding_rounds: Option<usize>,
    pub(crate) init_done: InitDoneCallbackFn<'a, T>,
    pub(crate) iteration_done: IterationDoneCallbackFn<'a, T>,
}

impl<'a, T: Primitive> Default for KMeansConfig<'a, T> {
    fn default() -> Self {
        Self {
            n_clusters: 8,
            init: Init::ScalableKMeans,
            max_iter: 300,
            tol: T::from(1e-4).unwrap(),
            random_state: 0,
            verbose: false,
            oversampling_factor: None,
            seeding_rounds: None,
            init_done: &|_| {},
            iteration_done: &|_, _, _| {},
        }
    }
}

impl<'a, T: Primitive> KMeansConfig<'a, T> {
    /// Use the [`KMeansConfigBuilder`] to build a [`KMeansConfig`] instance.
    pub fn build() -> KMeansConfigBuilder<'a, T> {
        KMeansConfigBuilder { config: KMeansConfig::default() }
    }

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }
}

impl<'a, T: Primitive> std::fmt::Debug for KMeansConfig<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KMeansConfig")
            .field("n_clusters", &self.n_clusters)
            .field("max_iter", &self.max_iter)
            .field("tol", &self.tol)
            .field("random_state", &self.random_state)
            .finish()
    }
}

pub struct KMeansConfigBuilder<'a, T: Primitive> {
    config: KMeansConfig<'a, T>,
}

impl<'a, T: Primitive> KMeansConfigBuilder<'a, T> {
    /// Set the number of clusters to search for.
    pub fn n_clusters(mut self, n_clusters: usize) -> Self {
        self.config.n_clusters = n_clusters; self
    }
    /// Set the centroid initialization method.
    /// ## Default
    /// [`Init::ScalableKMeans`]
    pub fn init(mut self, init: Init<T>) -> Self {
        self.config.init = init; self
    }
    /// Set the maximum number of Lloyd iterations.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.config.max_iter = max_iter; self
    }
    /// Set the convergence tolerance: the fit stops once the inertia drop
    /// between two consecutive iterations falls below this threshold.
    pub fn tol(mut self, tol: T) -> Self {
        self.config.tol = tol; self
    }
    /// Set the seed for all randomness of the fit. Use a fixed value for
    /// deterministically repeatable results.
    pub fn random_state(mut self, random_state: u64) -> Self {
        self.config.random_state = random_state; self
    }
    /// Log per-iteration progress at `info` instead of `debug` level.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose; self
    }
    /// Override the k-means|| oversampling factor (expected number of
    /// candidates sampled per round across all partitions).
    pub fn oversampling_factor(mut self, factor: T) -> Self {
        self.config.oversampling_factor = Some(factor); self
    }
    /// Override the number of k-means|| sampling rounds.
    pub fn seeding_rounds(mut self, rounds: usize) -> Self {
        self.config.seeding_rounds = Some(rounds); self
    }
    /// Set the callback that is called after seeding, before iteration starts.
    pub fn init_done(mut self, init_done: InitDoneCallbackFn<'a, T>) -> Self {
        self.config.init_done = init_done; self
    }
    /// Set the callback that is called after each Lloyd iteration.
    pub fn iteration_done(mut self, iteration_done: IterationDoneCallbackFn<'a, T>) -> Self {
        self.config.iteration_done = iteration_done; self
    }
    /// Return the internally built configuration structure.
    pub fn build(self) -> KMeansConfig<'a, T> {
        self.config
    }
}
