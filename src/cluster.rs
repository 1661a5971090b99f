use crate::dataset::Partition;
use crate::error::{KMeansError, Result};
use crate::memory::Primitive;
use rayon::prelude::*;

/// A fixed-size set of local workers, driven by a single coordinator role
/// (the calling thread).
///
/// Each worker is one thread of a dedicated rayon pool. Work is submitted as
/// one logical task per partition; [`LocalCluster::run_partitioned`] is the
/// barrier primitive of the engine: it returns only once every partition task
/// has finished, with the per-partition results in partition-index order.
/// The coordinator then folds them in that fixed order, which keeps global
/// reductions deterministic regardless of thread scheduling.
///
/// A failing partition task aborts the whole call: one of the partition
/// errors is propagated and all other results of the round are discarded.
/// Nothing is retried here.
pub struct LocalCluster {
    n_workers: usize,
    pool: rayon::ThreadPool,
}

impl LocalCluster {
    /// Spins up a cluster of `n_workers` worker threads.
    pub fn new(n_workers: usize) -> Result<Self> {
        if n_workers == 0 {
            return Err(KMeansError::WorkerPool("n_workers must be positive".into()));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n_workers)
            .build()
            .map_err(|e| KMeansError::WorkerPool(e.to_string()))?;
        Ok(Self { n_workers, pool })
    }

    /// Number of active workers. Partition placement and output-partition
    /// reconciliation are both derived from this.
    pub fn n_workers(&self) -> usize {
        self.n_workers
    }

    /// Runs `task` once per partition and collects the results in
    /// partition-index order (hard barrier). The task must not mutate shared
    /// state; anything it reads (e.g. the current centroid snapshot) is
    /// borrowed immutably for the whole round.
    pub(crate) fn run_partitioned<T, R, F>(&self, parts: &[Partition<T>], task: F) -> Result<Vec<R>>
    where
        T: Primitive,
        R: Send,
        F: Fn(&Partition<T>) -> Result<R> + Send + Sync,
    {
        self.pool.install(|| parts.par_iter().map(&task).collect())
    }
}

impl std::fmt::Debug for LocalCluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalCluster").field("n_workers", &self.n_workers).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    #[test]
    fn results_keep_partition_order() {
        let cluster = LocalCluster::new(4).unwrap();
        let rows: Vec<f64> = (0..32).map(|v| v as f64).collect();
        let data = Dataset::from_rows(&cluster, rows, 32, 1, Some(8)).unwrap();

        let firsts = cluster
            .run_partitioned(data.partitions(), |part| Ok(part.row(0)[0]))
            .unwrap();
        assert_eq!(firsts, vec![0.0, 4.0, 8.0, 12.0, 16.0, 20.0, 24.0, 28.0]);
    }

    #[test]
    fn partition_error_aborts_the_round() {
        let cluster = LocalCluster::new(2).unwrap();
        let rows: Vec<f64> = vec![0.0; 12];
        let data = Dataset::from_rows(&cluster, rows, 12, 1, Some(4)).unwrap();

        let res: Result<Vec<()>> = cluster.run_partitioned(data.partitions(), |part| {
            if part.index() == 2 {
                Err(KMeansError::PartitionFailure { index: part.index(), reason: "boom".into() })
            } else {
                Ok(())
            }
        });
        match res {
            Err(KMeansError::PartitionFailure { index, .. }) => assert_eq!(index, 2),
            other => panic!("expected partition failure, got {:?}", other.is_ok()),
        }
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(LocalCluster::new(0).is_err());
    }
}
