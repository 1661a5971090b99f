use crate::cluster::LocalCluster;
use crate::error::{KMeansError, Result};
use crate::helpers;
use crate::memory::Primitive;

/// A contiguous, worker-resident range of dataset rows [row-major].
///
/// Partitions are immutable once the dataset is materialized; iteration tasks
/// only ever read them.
#[derive(Clone, Debug)]
pub struct Partition<T: Primitive> {
    index: usize,
    worker: usize,
    ncols: usize,
    rows: Vec<T>,
}

impl<T: Primitive> Partition<T> {
    pub(crate) fn new(index: usize, worker: usize, ncols: usize, rows: Vec<T>) -> Self {
        debug_assert_eq!(rows.len() % ncols, 0);
        Self { index, worker, ncols, rows }
    }

    /// Index of this partition within the global dataset ordering.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The worker this partition is resident on.
    pub fn worker(&self) -> usize {
        self.worker
    }

    pub fn row_count(&self) -> usize {
        self.rows.len() / self.ncols
    }

    pub fn row(&self, i: usize) -> &[T] {
        &self.rows[i * self.ncols..(i + 1) * self.ncols]
    }

    /// Iterates the partition's rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        self.rows.chunks_exact(self.ncols)
    }
}

/// The distributed representation of an input matrix: a named collection of
/// row-contiguous partitions whose concatenation, in partition-index order,
/// reproduces the original row order.
///
/// ## Partitioning contract
/// - `n_parts` omitted: one partition per available worker.
/// - `n_parts` larger than the worker count: multiple partitions co-located
///   per worker (placement is `index % n_workers`).
/// - `n_parts` smaller than the worker count: some workers hold no partition.
///
/// Row-to-partition assignment is a balanced contiguous split and therefore
/// deterministic for a fixed input and partition count.
#[derive(Clone, Debug)]
pub struct Dataset<T: Primitive> {
    partitions: Vec<Partition<T>>,
    nrows: usize,
    ncols: usize,
    requested_parts: Option<usize>,
}

impl<T: Primitive> Dataset<T> {
    /// Materializes a dataset from a flat row-major buffer.
    ///
    /// ## Arguments
    /// - **rows**: `nrows * ncols` values [row-major]
    /// - **n_parts**: requested partition count; defaults to one partition
    ///   per worker of `cluster`
    pub fn from_rows(
        cluster: &LocalCluster,
        rows: Vec<T>,
        nrows: usize,
        ncols: usize,
        n_parts: Option<usize>,
    ) -> Result<Self> {
        if ncols == 0 || rows.len() != nrows * ncols {
            return Err(KMeansError::ShapeMismatch {
                nrows,
                ncols,
                expected: nrows * ncols,
                actual: rows.len(),
            });
        }
        if n_parts == Some(0) {
            return Err(KMeansError::InvalidPartitionCount);
        }
        let parts = n_parts.unwrap_or_else(|| cluster.n_workers());

        let mut partitions = Vec::with_capacity(parts);
        let mut rest = rows;
        for (index, count) in helpers::balanced_counts(nrows, parts).into_iter().enumerate() {
            let chunk = rest.split_off(count * ncols);
            let own = std::mem::replace(&mut rest, chunk);
            partitions.push(Partition::new(index, index % cluster.n_workers(), ncols, own));
        }

        Ok(Self { partitions, nrows, ncols, requested_parts: n_parts })
    }

    /// Builds a dataset from pre-partitioned chunks (used for transform
    /// output, where `ncols == n_clusters`).
    pub(crate) fn from_partition_chunks(cluster: &LocalCluster, chunks: Vec<Vec<T>>, ncols: usize) -> Self {
        let nrows = chunks.iter().map(|c| c.len() / ncols).sum();
        let partitions = chunks
            .into_iter()
            .enumerate()
            .map(|(index, rows)| Partition::new(index, index % cluster.n_workers(), ncols, rows))
            .collect();
        Self { partitions, nrows, ncols, requested_parts: None }
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn n_partitions(&self) -> usize {
        self.partitions.len()
    }

    /// The partition count the caller asked for at materialization, if any.
    /// Output reconciliation keys off this value.
    pub fn requested_parts(&self) -> Option<usize> {
        self.requested_parts
    }

    pub fn partitions(&self) -> &[Partition<T>] {
        &self.partitions
    }

    /// Looks a row up by its global index, walking the partition offsets.
    pub(crate) fn global_row(&self, mut i: usize) -> &[T] {
        for part in &self.partitions {
            if i < part.row_count() {
                return part.row(i);
            }
            i -= part.row_count();
        }
        unreachable!("global row index out of range");
    }

    /// Reassembles the full matrix in global row order.
    pub fn to_rows(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.nrows * self.ncols);
        for part in &self.partitions {
            out.extend_from_slice(&part.rows);
        }
        out
    }
}

/// A partitioned label result: one cluster index per input row, in the same
/// global row order as the dataset it was predicted from. The partitioning
/// follows the reconciler's decision, not necessarily the input partitioning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Labels {
    partitions: Vec<Vec<usize>>,
}

impl Labels {
    pub(crate) fn new(partitions: Vec<Vec<usize>>) -> Self {
        Self { partitions }
    }

    pub fn n_partitions(&self) -> usize {
        self.partitions.len()
    }

    pub fn total_rows(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    pub fn partition(&self, i: usize) -> &[usize] {
        &self.partitions[i]
    }

    /// Flattens the labels into global row order.
    pub fn to_vec(&self) -> Vec<usize> {
        self.partitions.iter().flatten().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize, ncols: usize) -> Vec<f64> {
        (0..n * ncols).map(|v| v as f64).collect()
    }

    #[test]
    fn default_partitioning_is_one_per_worker() {
        let cluster = LocalCluster::new(3).unwrap();
        let data = Dataset::from_rows(&cluster, rows(10, 2), 10, 2, None).unwrap();
        assert_eq!(data.n_partitions(), 3);
        assert_eq!(data.requested_parts(), None);
        let counts: Vec<usize> = data.partitions().iter().map(|p| p.row_count()).collect();
        assert_eq!(counts, vec![4, 3, 3]);
    }

    #[test]
    fn more_partitions_than_workers_colocate() {
        let cluster = LocalCluster::new(2).unwrap();
        let data = Dataset::from_rows(&cluster, rows(8, 1), 8, 1, Some(6)).unwrap();
        assert_eq!(data.n_partitions(), 6);
        let workers: Vec<usize> = data.partitions().iter().map(|p| p.worker()).collect();
        assert_eq!(workers, vec![0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn fewer_partitions_than_workers_leave_workers_idle() {
        let cluster = LocalCluster::new(4).unwrap();
        let data = Dataset::from_rows(&cluster, rows(8, 1), 8, 1, Some(2)).unwrap();
        assert_eq!(data.n_partitions(), 2);
        assert!(data.partitions().iter().all(|p| p.worker() < 2));
    }

    #[test]
    fn concatenation_reproduces_row_order() {
        let cluster = LocalCluster::new(3).unwrap();
        let original = rows(11, 3);
        let data = Dataset::from_rows(&cluster, original.clone(), 11, 3, Some(5)).unwrap();
        assert_eq!(data.to_rows(), original);
        assert_eq!(data.partitions().iter().map(|p| p.row_count()).sum::<usize>(), 11);
        // global row lookup agrees with the flat buffer
        for i in 0..11 {
            assert_eq!(data.global_row(i), &original[i * 3..(i + 1) * 3]);
        }
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let cluster = LocalCluster::new(2).unwrap();
        let res = Dataset::from_rows(&cluster, rows(4, 2), 5, 2, None);
        assert!(matches!(res, Err(KMeansError::ShapeMismatch { .. })));
        let res = Dataset::from_rows(&cluster, rows(4, 2), 4, 2, Some(0));
        assert!(matches!(res, Err(KMeansError::InvalidPartitionCount)));
    }
}
