//! k-means|| seeding.
//!
//! Produces well-separated initial centroids without a full sequential
//! k-means++ pass over the distributed data. Oversampled candidates are drawn
//! in a fixed number of barrier-synchronized rounds, weighted by the number
//! of rows they attract, and reduced to exactly `k` centroids on the
//! coordinator with a weighted k-means++ pass plus a few weighted Lloyd
//! refinements. The candidate pool is bounded (roughly
//! `rounds * oversampling_factor`), so the reduction stays cheap.

use crate::cluster::LocalCluster;
use crate::config::KMeansConfig;
use crate::dataset::Dataset;
use crate::distance::nearest_centroid;
use crate::error::{KMeansError, Result};
use crate::helpers;
use crate::memory::Primitive;
use rand::distributions::WeightedIndex;
use rand::prelude::*;

/// Lloyd refinements run on the candidate pool after weighted k-means++.
const REDUCTION_REFINEMENTS: usize = 5;

pub(crate) fn default_rounds(nrows: usize) -> usize {
    ((nrows as f64).ln().ceil() as usize).clamp(1, 8)
}

/// Runs the distributed seeding and returns a `k × ncols` centroid matrix.
pub(crate) fn seed<T: Primitive>(
    cluster: &LocalCluster,
    data: &Dataset<T>,
    config: &KMeansConfig<'_, T>,
) -> Result<Vec<T>> {
    let k = config.n_clusters;
    let ncols = data.ncols();
    let random_state = config.random_state;
    let mut rng = StdRng::seed_from_u64(random_state);

    let oversampling = match config.oversampling_factor {
        Some(factor) => factor,
        None => T::from(2 * k).unwrap(),
    };
    let rounds = config.seeding_rounds.unwrap_or_else(|| default_rounds(data.nrows()));

    // First candidate: one row chosen uniformly at random.
    let first = rng.gen_range(0..data.nrows());
    let mut candidates: Vec<T> = data.global_row(first).to_vec();

    for round in 0..rounds {
        // Pass 1: reduce the global sampling cost (sum of squared distances
        // to the nearest current candidate). Hard barrier.
        let cand_ref = candidates.as_slice();
        let local_costs = cluster.run_partitioned(data.partitions(), |part| {
            let mut total = T::zero();
            for row in part.iter_rows() {
                let (_, dist) = nearest_centroid(row, cand_ref, ncols);
                if !dist.is_finite() {
                    return Err(KMeansError::PartitionFailure {
                        index: part.index(),
                        reason: "non-finite feature value encountered during seeding".into(),
                    });
                }
                total += dist;
            }
            Ok(total)
        })?;
        let total_cost: T = local_costs.into_iter().sum();
        if total_cost <= T::zero() {
            // Every row coincides with a candidate already.
            break;
        }

        // Pass 2: each partition samples rows with probability proportional
        // to `oversampling * dist² / total_cost`, using an RNG seeded from
        // (random_state, round, partition) so the draw does not depend on
        // thread scheduling. Hard barrier.
        let sampled = cluster.run_partitioned(data.partitions(), |part| {
            let mut rnd = StdRng::seed_from_u64(helpers::task_seed(random_state, round, part.index()));
            let mut picked = Vec::new();
            for row in part.iter_rows() {
                let (_, dist) = nearest_centroid(row, cand_ref, ncols);
                let p = oversampling * dist / total_cost;
                if rnd.gen_range(T::zero()..T::one()) < p {
                    picked.extend_from_slice(row);
                }
            }
            Ok(picked)
        })?;
        for chunk in sampled {
            candidates.extend(chunk);
        }
        tracing::debug!(
            round,
            candidates = candidates.len() / ncols,
            "k-means|| sampling round finished"
        );
    }

    // Weight every candidate by the number of rows it is nearest to,
    // reduced across partitions in partition order.
    let n_candidates = candidates.len() / ncols;
    let cand_ref = candidates.as_slice();
    let local_weights = cluster.run_partitioned(data.partitions(), |part| {
        let mut weights = vec![0u64; n_candidates];
        for row in part.iter_rows() {
            let (idx, _) = nearest_centroid(row, cand_ref, ncols);
            weights[idx] += 1;
        }
        Ok(weights)
    })?;
    let mut weights = vec![0u64; n_candidates];
    for local in local_weights {
        for (total, partial) in weights.iter_mut().zip(local) {
            *total += partial;
        }
    }

    Ok(reduce_candidates(&candidates, &weights, ncols, k, &mut rng))
}

/// Weighted k-means++ over the candidate pool, followed by a few weighted
/// Lloyd refinements. Runs on the coordinator; the pool size is bounded.
///
/// A pool with at most `k` candidates is cycle-duplicated to exactly `k`
/// seeds; downstream iteration tolerates the resulting degenerate clusters.
fn reduce_candidates<T: Primitive>(
    candidates: &[T],
    weights: &[u64],
    ncols: usize,
    k: usize,
    rng: &mut StdRng,
) -> Vec<T> {
    let n = candidates.len() / ncols;
    if n <= k {
        let mut out = Vec::with_capacity(k * ncols);
        for i in 0..k {
            let src = i % n;
            out.extend_from_slice(&candidates[src * ncols..(src + 1) * ncols]);
        }
        return out;
    }

    let mut centroids = Vec::with_capacity(k * ncols);
    let first = match WeightedIndex::new(weights) {
        Ok(dist) => dist.sample(rng),
        Err(_) => rng.gen_range(0..n),
    };
    centroids.extend_from_slice(&candidates[first * ncols..(first + 1) * ncols]);

    for _ in 1..k {
        // Draw the next seed proportional to weight * dist² to the nearest
        // already-chosen seed.
        let scores: Vec<T> = candidates
            .chunks_exact(ncols)
            .zip(weights.iter())
            .map(|(cand, &w)| {
                let (_, dist) = nearest_centroid(cand, &centroids, ncols);
                T::from(w).unwrap() * dist
            })
            .collect();
        let chosen = match WeightedIndex::new(&scores) {
            Ok(dist) => dist.sample(rng),
            // All remaining candidates coincide with chosen seeds.
            Err(_) => rng.gen_range(0..n),
        };
        centroids.extend_from_slice(&candidates[chosen * ncols..(chosen + 1) * ncols]);
    }

    for _ in 0..REDUCTION_REFINEMENTS {
        centroids = weighted_lloyd_step(candidates, weights, &centroids, ncols, k);
    }
    centroids
}

/// One weighted Lloyd step over the candidate pool. Centroids that attract no
/// weight keep their previous position.
fn weighted_lloyd_step<T: Primitive>(
    candidates: &[T],
    weights: &[u64],
    centroids: &[T],
    ncols: usize,
    k: usize,
) -> Vec<T> {
    let mut sums = vec![T::zero(); k * ncols];
    let mut total_weights = vec![0u64; k];
    for (cand, &w) in candidates.chunks_exact(ncols).zip(weights.iter()) {
        let (idx, _) = nearest_centroid(cand, centroids, ncols);
        total_weights[idx] += w;
        let target = &mut sums[idx * ncols..(idx + 1) * ncols];
        for (sum, &value) in target.iter_mut().zip(cand.iter()) {
            *sum = *sum + T::from(w).unwrap() * value;
        }
    }

    let mut updated = centroids.to_vec();
    for j in 0..k {
        if total_weights[j] == 0 {
            continue;
        }
        let weight = T::from(total_weights[j]).unwrap();
        for d in 0..ncols {
            updated[j * ncols + d] = sums[j * ncols + d] / weight;
        }
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::squared_euclidean;

    /// Three tight, well separated blobs in 2d, 30 rows each.
    fn blob_rows() -> Vec<f64> {
        let centers = [[0.0, 0.0], [50.0, 0.0], [0.0, 50.0]];
        let mut rng = StdRng::seed_from_u64(7);
        let mut rows = Vec::new();
        for center in &centers {
            for _ in 0..30 {
                rows.push(center[0] + rng.gen_range(-0.01..0.01));
                rows.push(center[1] + rng.gen_range(-0.01..0.01));
            }
        }
        rows
    }

    fn seed_once(random_state: u64) -> Vec<f64> {
        let cluster = LocalCluster::new(3).unwrap();
        let data = Dataset::from_rows(&cluster, blob_rows(), 90, 2, None).unwrap();
        let config = KMeansConfig::build().n_clusters(3).random_state(random_state).build();
        seed(&cluster, &data, &config).unwrap()
    }

    #[test]
    fn covers_every_blob() {
        let centroids = seed_once(42);
        assert_eq!(centroids.len(), 3 * 2);
        let centers = [[0.0, 0.0], [50.0, 0.0], [0.0, 50.0]];
        // every blob center must be hit by exactly one seed
        for center in &centers {
            let hits = centroids
                .chunks_exact(2)
                .filter(|seed| squared_euclidean(seed, center) < 1.0)
                .count();
            assert_eq!(hits, 1);
        }
    }

    #[test]
    fn deterministic_for_fixed_random_state() {
        assert_eq!(seed_once(1234), seed_once(1234));
    }

    #[test]
    fn tolerates_fewer_candidates_than_k() {
        // 4 identical rows: after the first candidate the sampling cost is
        // zero, so the pool stays at a single candidate and gets duplicated.
        let cluster = LocalCluster::new(2).unwrap();
        let data = Dataset::from_rows(&cluster, vec![1.0f64; 8], 4, 2, None).unwrap();
        let config = KMeansConfig::build().n_clusters(3).random_state(5).build();
        let centroids = seed(&cluster, &data, &config).unwrap();
        assert_eq!(centroids, vec![1.0; 6]);
    }

    #[test]
    fn default_rounds_scale_with_log_nrows() {
        assert_eq!(default_rounds(1), 1);
        assert_eq!(default_rounds(100), 5);
        assert_eq!(default_rounds(100_000), 8);
    }
}
