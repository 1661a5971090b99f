//! The synchronous refine loop: broadcast the centroid snapshot, accumulate
//! per-partition sufficient statistics, reduce globally, update centroids,
//! check convergence.

use crate::cluster::LocalCluster;
use crate::config::{Init, KMeansConfig};
use crate::convergence::ConvergenceCheck;
use crate::dataset::Dataset;
use crate::distance::nearest_centroid;
use crate::error::{KMeansError, Result};
use crate::inits;
use crate::memory::Primitive;
use crate::model::{KMeansModel, StopReason};

/// Per-centroid accumulators: sum of assigned rows and assignment count,
/// plus the local inertia contribution. Owned by the computing partition
/// until the barrier, then folded by the coordinator in partition order.
pub(crate) struct SufficientStats<T: Primitive> {
    pub sums: Vec<T>,
    pub counts: Vec<usize>,
    pub inertia: T,
}

impl<T: Primitive> SufficientStats<T> {
    fn zeroed(k: usize, ncols: usize) -> Self {
        Self { sums: vec![T::zero(); k * ncols], counts: vec![0usize; k], inertia: T::zero() }
    }

    fn merge(&mut self, other: SufficientStats<T>) {
        for (sum, partial) in self.sums.iter_mut().zip(other.sums) {
            *sum += partial;
        }
        for (count, partial) in self.counts.iter_mut().zip(other.counts) {
            *count += partial;
        }
        self.inertia += other.inertia;
    }
}

/// One barrier-synchronized assignment round: every partition scans its rows
/// against the (read-only) centroid snapshot, the coordinator folds the
/// per-partition statistics in partition-index order. The fixed fold order
/// makes the reduction deterministic for a fixed partitioning.
pub(crate) fn assign_reduce<T: Primitive>(
    cluster: &LocalCluster,
    data: &Dataset<T>,
    centroids: &[T],
    k: usize,
) -> Result<SufficientStats<T>> {
    let ncols = data.ncols();
    let partials = cluster.run_partitioned(data.partitions(), |part| {
        let mut stats = SufficientStats::zeroed(k, ncols);
        for row in part.iter_rows() {
            let (idx, dist) = nearest_centroid(row, centroids, ncols);
            if !dist.is_finite() {
                return Err(KMeansError::PartitionFailure {
                    index: part.index(),
                    reason: "non-finite distance while accumulating statistics".into(),
                });
            }
            stats.counts[idx] += 1;
            stats.inertia += dist;
            let target = &mut stats.sums[idx * ncols..(idx + 1) * ncols];
            for (sum, &value) in target.iter_mut().zip(row.iter()) {
                *sum += value;
            }
        }
        Ok(stats)
    })?;

    let mut total = SufficientStats::zeroed(k, ncols);
    for partial in partials {
        total.merge(partial);
    }
    Ok(total)
}

/// New centroid = sum / count. A centroid that ended the iteration with zero
/// assigned rows keeps its previous position; dropping it would break the
/// 1-to-1 label mapping downstream.
fn apply_update<T: Primitive>(centroids: &mut [T], stats: &SufficientStats<T>, ncols: usize) {
    for (j, count) in stats.counts.iter().enumerate() {
        if *count == 0 {
            tracing::warn!(centroid = j, "cluster ended iteration empty; keeping previous centroid");
            continue;
        }
        let count = T::from(*count).unwrap();
        for d in 0..ncols {
            centroids[j * ncols + d] = stats.sums[j * ncols + d] / count;
        }
    }
}

/// Runs the full fit: seeding, barrier-synchronized Lloyd iterations until
/// the inertia drop falls below `tol` or `max_iter` is reached, and a final
/// assignment pass that freezes inertia and per-centroid frequencies against
/// the final centroids.
///
/// The centroid snapshot is only replaced after a complete reduction, so an
/// aborted iteration (partition failure) leaves the previous snapshot as the
/// last valid state and simply drops all in-flight statistics.
pub(crate) fn fit<T: Primitive>(
    cluster: &LocalCluster,
    data: &Dataset<T>,
    config: &KMeansConfig<'_, T>,
) -> Result<KMeansModel<T>> {
    let k = config.n_clusters;
    if k == 0 {
        return Err(KMeansError::InvalidClusterCount);
    }
    if k > data.nrows() {
        return Err(KMeansError::TooManyClusters { n_clusters: k, nrows: data.nrows() });
    }
    let ncols = data.ncols();

    let mut centroids = match &config.init {
        Init::ScalableKMeans => inits::scalable::seed(cluster, data, config)?,
        Init::Precomputed(matrix) => inits::precomputed::seed(matrix, k, ncols)?,
    };
    (config.init_done)(&centroids);

    let mut check = ConvergenceCheck::new(config.tol);
    let mut prev_inertia = T::infinity();
    let mut stop_reason = StopReason::MaxIterReached;
    let mut n_iter = config.max_iter;

    for iteration in 1..=config.max_iter {
        let stats = assign_reduce(cluster, data, &centroids, k)?;
        apply_update(&mut centroids, &stats, ncols);

        (config.iteration_done)(iteration, prev_inertia, stats.inertia);
        if config.verbose {
            tracing::info!(iteration, inertia = %stats.inertia, "lloyd iteration finished");
        } else {
            tracing::debug!(iteration, inertia = %stats.inertia, "lloyd iteration finished");
        }

        let done = check.converged(stats.inertia);
        prev_inertia = stats.inertia;
        if done {
            stop_reason = StopReason::Converged;
            n_iter = iteration;
            break;
        }
    }

    let final_stats = assign_reduce(cluster, data, &centroids, k)?;
    Ok(KMeansModel {
        n_clusters: k,
        ncols,
        centroids,
        inertia: final_stats.inertia,
        n_iter,
        stop_reason,
        centroid_frequency: final_stats.counts,
    })
}
