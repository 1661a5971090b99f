//! Test-only collaborators: synthetic blob generation and scoring against
//! ground truth. Neither is part of the engine itself.

use rand::prelude::*;
use rand_distr::Normal;

pub struct Blobs {
    pub rows: Vec<f64>,
    pub labels: Vec<usize>,
}

/// Generates `nrows` rows around `n_clusters` well-separated centers.
///
/// Center `c` sits at 100·shell on one axis (one-hot layout, next shell once
/// the axes are exhausted), so pairwise center distances are at least 100 —
/// far beyond any reasonable `cluster_std`. Rows cycle through the clusters,
/// which keeps every partition populated with every cluster.
pub fn make_blobs(nrows: usize, ncols: usize, n_clusters: usize, cluster_std: f64, seed: u64) -> Blobs {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, cluster_std).unwrap();

    let mut centers = vec![0.0f64; n_clusters * ncols];
    for c in 0..n_clusters {
        let axis = c % ncols;
        let shell = (c / ncols + 1) as f64;
        centers[c * ncols + axis] = 100.0 * shell;
    }

    let mut rows = Vec::with_capacity(nrows * ncols);
    let mut labels = Vec::with_capacity(nrows);
    for i in 0..nrows {
        let c = i % n_clusters;
        labels.push(c);
        for j in 0..ncols {
            rows.push(centers[c * ncols + j] + noise.sample(&mut rng));
        }
    }
    Blobs { rows, labels }
}

/// Adjusted Rand index between two labelings. 1.0 iff the labelings describe
/// the same partition of the rows (up to label permutation); two constant
/// labelings also score 1.0, matching the scikit-learn convention.
pub fn adjusted_rand_score(a: &[usize], b: &[usize]) -> f64 {
    assert_eq!(a.len(), b.len());
    let n = a.len();
    let ka = a.iter().max().map_or(0, |m| m + 1);
    let kb = b.iter().max().map_or(0, |m| m + 1);

    let mut contingency = vec![0u64; ka * kb];
    let mut sum_a = vec![0u64; ka];
    let mut sum_b = vec![0u64; kb];
    for (&ai, &bi) in a.iter().zip(b.iter()) {
        contingency[ai * kb + bi] += 1;
        sum_a[ai] += 1;
        sum_b[bi] += 1;
    }

    let comb2 = |x: u64| {
        let x = x as f64;
        x * (x - 1.0) / 2.0
    };
    let index: f64 = contingency.iter().map(|&c| comb2(c)).sum();
    let pairs_a: f64 = sum_a.iter().map(|&c| comb2(c)).sum();
    let pairs_b: f64 = sum_b.iter().map(|&c| comb2(c)).sum();
    let total = comb2(n as u64);

    let expected = pairs_a * pairs_b / total;
    let max_index = 0.5 * (pairs_a + pairs_b);
    if (max_index - expected).abs() < f64::EPSILON {
        return 1.0;
    }
    (index - expected) / (max_index - expected)
}

#[allow(dead_code)]
pub fn argmin(row: &[f64]) -> usize {
    row.iter()
        .enumerate()
        .min_by(|(_, x), (_, y)| x.partial_cmp(y).unwrap())
        .map(|(i, _)| i)
        .unwrap()
}
