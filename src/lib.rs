//! # kmeans-dist - API documentation
//!
//! kmeans-dist is a distributed k-means clustering engine: the input matrix
//! lives as a set of row-contiguous partitions spread over a pool of workers,
//! centroids are computed cooperatively, and predictions / distance matrices
//! come back partitioned as well.
//!
//! ## Design target
//! The target is clustering at a scale where a single sequential pass over
//! the data is already too expensive. The API surface is therefore rather
//! plain: samples are flat row-major vectors instead of a matrix crate's
//! types, and all heavy work runs as one task per partition on a dedicated
//! worker pool with explicit barriers between iterations.
//!
//! ## Seeding
//! Initial centroids come from k-means|| (scalable k-means): a bounded number
//! of oversampled, distributed sampling rounds followed by a local weighted
//! clustering pass that reduces the candidate pool to exactly `k` seeds.
//! An explicit centroid matrix can be passed instead via
//! [`Init::Precomputed`].
//!
//! ## Supported primitive types
//! - [`f32`]
//! - [`f64`]
//!
//! ## Example
//! ```rust
//! use kmeans_dist::*;
//!
//! let (nrows, ncols, k) = (1000, 8, 4);
//!
//! // Generate some random data
//! let mut rows = vec![0.0f64; nrows * ncols];
//! rows.iter_mut().for_each(|v| *v = rand::random());
//!
//! // Spin up four local workers and partition the matrix over them
//! let cluster = LocalCluster::new(4).unwrap();
//! let data = Dataset::from_rows(&cluster, rows, nrows, ncols, None).unwrap();
//!
//! // Fit with k-means|| seeding, then predict labels for the same data
//! let config = KMeansConfig::build().n_clusters(k).random_state(42).build();
//! let kmeans = KMeans::new(&cluster);
//! let model = kmeans.fit(&data, &config).unwrap();
//! let labels = kmeans.predict(&model, &data).unwrap();
//!
//! println!("Centroids: {:?}", model.centroids);
//! println!("Inertia: {}", model.inertia);
//! assert_eq!(labels.total_rows(), nrows);
//! ```
//!
//! ## Example (using the status event callbacks)
//! ```rust
//! use kmeans_dist::*;
//!
//! let mut rows = vec![0.0f64; 500 * 4];
//! rows.iter_mut().for_each(|v| *v = rand::random());
//!
//! let cluster = LocalCluster::new(2).unwrap();
//! let data = Dataset::from_rows(&cluster, rows, 500, 4, None).unwrap();
//!
//! let config = KMeansConfig::build()
//!     .n_clusters(3)
//!     .init_done(&|_| println!("Seeding completed."))
//!     .iteration_done(&|nr, old, new|
//!         println!("Iteration {} - Inertia: {:.2} -> {:.2}", nr, old, new))
//!     .build();
//!
//! let model = KMeans::new(&cluster).fit(&data, &config).unwrap();
//! println!("Finished after {} iterations", model.n_iter);
//! ```
//!
//! ## Short API-Overview / Description
//! A [`LocalCluster`] owns the worker pool; a [`Dataset`] is materialized
//! over it with an optional requested partition count. [`KMeans`] is the
//! entry point for the three operations: `fit` runs seeding plus the
//! synchronous Lloyd refine loop and returns an immutable [`KMeansModel`];
//! `predict` and `transform` are read-only against that model and may run
//! concurrently. Output partition counts follow a documented reconciliation
//! rule: a requested partition count below the worker count wins, otherwise
//! results come back with one partition per worker.

#[macro_use]
mod helpers;
mod cluster;
mod config;
mod convergence;
mod dataset;
mod distance;
mod error;
mod inits;
mod lloyd;
mod memory;
mod model;
mod predict;
mod repartition;

pub use cluster::LocalCluster;
pub use config::{Init, InitDoneCallbackFn, IterationDoneCallbackFn, KMeansConfig, KMeansConfigBuilder};
pub use dataset::{Dataset, Labels, Partition};
pub use error::{KMeansError, Result};
pub use memory::Primitive;
pub use model::{KMeansModel, StopReason};

/// Entrypoint of this crate's API-Surface.
///
/// Borrows a [`LocalCluster`] and drives the three distributed operations
/// against it. The struct itself is stateless; fitted state lives in the
/// returned [`KMeansModel`], so one `KMeans` handle can serve any number of
/// fits and predictions.
pub struct KMeans<'a> {
    cluster: &'a LocalCluster,
}

impl<'a> KMeans<'a> {
    pub fn new(cluster: &'a LocalCluster) -> Self {
        Self { cluster }
    }

    /// Fits a k-means model on a partitioned dataset.
    ///
    /// Runs the configured seeding, then barrier-synchronized Lloyd
    /// iterations until the drop in inertia falls below `tol` or `max_iter`
    /// is reached. Both outcomes return a usable model; check
    /// [`KMeansModel::converged`] to distinguish them.
    ///
    /// ## Errors
    /// Configuration errors (`n_clusters` of zero, more clusters than rows,
    /// a malformed precomputed centroid matrix) are surfaced immediately.
    /// A worker-side failure aborts the whole fit with
    /// [`KMeansError::PartitionFailure`].
    pub fn fit<T: Primitive>(&self, data: &Dataset<T>, config: &KMeansConfig<'_, T>) -> Result<KMeansModel<T>> {
        lloyd::fit(self.cluster, data, config)
    }

    /// Predicts the nearest-centroid label for every row of `data`.
    ///
    /// The result keeps the dataset's global row order but is partitioned
    /// according to the reconciliation rule, not necessarily like the input.
    pub fn predict<T: Primitive>(&self, model: &KMeansModel<T>, data: &Dataset<T>) -> Result<Labels> {
        predict::predict(self.cluster, model, data)
    }

    /// Computes the full squared-distance matrix (`rows × n_clusters`) of
    /// `data` against the model's centroids. The arg-min of each row equals
    /// the label [`KMeans::predict`] returns for that row.
    pub fn transform<T: Primitive>(&self, model: &KMeansModel<T>, data: &Dataset<T>) -> Result<Dataset<T>> {
        predict::transform(self.cluster, model, data)
    }
}
