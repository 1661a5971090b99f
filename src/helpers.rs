/// Splits `total` rows into `parts` contiguous chunk sizes, as balanced as
/// possible. The remainder is spread over the leading chunks, so sizes differ
/// by at most one. `parts > total` yields trailing empty chunks.
pub(crate) fn balanced_counts(total: usize, parts: usize) -> Vec<usize> {
    let base = total / parts;
    let remainder = total % parts;
    (0..parts).map(|i| base + usize::from(i < remainder)).collect()
}

/// Derives the RNG seed for one partition-local task.
///
/// Every sampling round uses a fresh seed per partition, derived only from
/// `(random_state, round, partition)`. Results are therefore independent of
/// which worker thread picks the task up, and of scheduling order.
pub(crate) fn task_seed(random_state: u64, round: usize, partition: usize) -> u64 {
    // splitmix64 finalizer over the packed coordinates
    let mut z = random_state
        .wrapping_add((round as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .wrapping_add((partition as u64 + 1).wrapping_mul(0xBF58_476D_1CE4_E5B9));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
macro_rules! assert_approx_eq {
    ($left: expr, $right: expr, $tol: expr) => ({
        match ($left, $right, $tol) {
            (left_val, right_val, tol_val) => {
                let delta = (left_val - right_val).abs();
                if !(delta < tol_val) {
                    panic!(
                        "assertion failed: `(left ≈ right)` \
                        (left: `{}`, right: `{}`) \
                        with ∆={:1.1e} (allowed ∆={:e})",
                        left_val, right_val, delta, tol_val
                    )
                }
            }
        }
    });
    ($left: expr, $right: expr) => (assert_approx_eq!(($left), ($right), 1e-15))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    /// Asserts that two labelings describe the same clustering, allowing the
    /// cluster indices themselves to be permuted. Panics with the offending
    /// row index and the mapping collected so far.
    pub fn assert_same_clustering(should: &[usize], actual: &[usize]) {
        assert_eq!(should.len(), actual.len());
        let mut idmap: HashMap<usize, usize> = HashMap::new();
        let mut idrevmap: HashMap<usize, usize> = HashMap::new();
        for idx in 0..should.len() {
            let (should_id, actual_id) = (should[idx], actual[idx]);
            if !idmap.contains_key(&should_id) {
                assert_eq!(idrevmap.contains_key(&actual_id), false);
                idmap.insert(should_id, actual_id);
                idrevmap.insert(actual_id, should_id);
            }
            if idmap[&should_id] != actual_id {
                panic!(
                    "Cluster assignments differ at idx {}.\nMapping(should -> actual): {:?}\nActual: {:?}\nShould: {:?}",
                    idx, idmap, actual, should
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn balanced_counts() {
        for total in 0..40 {
            for parts in 1..8 {
                let counts = super::balanced_counts(total, parts);
                assert_eq!(counts.len(), parts);
                assert_eq!(counts.iter().sum::<usize>(), total);
                let (min, max) = (counts.iter().min().unwrap(), counts.iter().max().unwrap());
                assert!(max - min <= 1);
            }
        }
    }

    #[test]
    fn task_seed_distinct_per_coordinate() {
        let a = super::task_seed(10, 0, 0);
        let b = super::task_seed(10, 0, 1);
        let c = super::task_seed(10, 1, 0);
        let d = super::task_seed(11, 0, 0);
        assert!(a != b && a != c && a != d && b != c);
        // and stable for identical coordinates
        assert_eq!(a, super::task_seed(10, 0, 0));
    }
}
