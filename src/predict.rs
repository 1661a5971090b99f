//! Read-only operations against a fitted centroid set. Both are
//! embarrassingly parallel across partitions: no barrier beyond collecting
//! the per-partition outputs, no synchronization on the centroid matrix.

use crate::cluster::LocalCluster;
use crate::dataset::{Dataset, Labels};
use crate::distance::{nearest_centroid, squared_euclidean};
use crate::error::{KMeansError, Result};
use crate::memory::Primitive;
use crate::model::KMeansModel;
use crate::repartition;

fn check_dims<T: Primitive>(model: &KMeansModel<T>, data: &Dataset<T>) -> Result<()> {
    if model.ncols != data.ncols() {
        return Err(KMeansError::DimensionMismatch { expected: model.ncols, actual: data.ncols() });
    }
    Ok(())
}

/// Nearest-centroid label for every row, regrouped into the reconciled
/// output partitioning.
pub(crate) fn predict<T: Primitive>(
    cluster: &LocalCluster,
    model: &KMeansModel<T>,
    data: &Dataset<T>,
) -> Result<Labels> {
    check_dims(model, data)?;
    let ncols = data.ncols();
    let centroids = model.centroids.as_slice();

    let per_part = cluster.run_partitioned(data.partitions(), |part| {
        let mut labels = Vec::with_capacity(part.row_count());
        for row in part.iter_rows() {
            let (idx, dist) = nearest_centroid(row, centroids, ncols);
            if !dist.is_finite() {
                return Err(KMeansError::PartitionFailure {
                    index: part.index(),
                    reason: "non-finite distance during prediction".into(),
                });
            }
            labels.push(idx);
        }
        Ok(labels)
    })?;

    let plan = repartition::plan(data.n_partitions(), data.requested_parts(), cluster.n_workers());
    Ok(Labels::new(plan.regroup(per_part)))
}

/// Full squared-distance row (length `n_clusters`) for every input row.
/// The arg-min over a row equals the label predict computes for it; both
/// share the nearest-centroid scan's tie rule (lowest index wins).
pub(crate) fn transform<T: Primitive>(
    cluster: &LocalCluster,
    model: &KMeansModel<T>,
    data: &Dataset<T>,
) -> Result<Dataset<T>> {
    check_dims(model, data)?;
    let ncols = data.ncols();
    let k = model.n_clusters;
    let centroids = model.centroids.as_slice();

    let per_part = cluster.run_partitioned(data.partitions(), |part| {
        let mut distances = Vec::with_capacity(part.row_count() * k);
        for row in part.iter_rows() {
            for centroid in centroids.chunks_exact(ncols) {
                let dist = squared_euclidean(row, centroid);
                if !dist.is_finite() {
                    return Err(KMeansError::PartitionFailure {
                        index: part.index(),
                        reason: "non-finite distance during transform".into(),
                    });
                }
                distances.push(dist);
            }
        }
        Ok(distances)
    })?;

    let plan = repartition::plan(data.n_partitions(), data.requested_parts(), cluster.n_workers());
    Ok(Dataset::from_partition_chunks(cluster, plan.regroup(per_part), k))
}
