/// The reconciler's decision for one output: how many partitions the result
/// gets, and which input partition lands in which output partition.
///
/// The grouping only ever merges neighbouring input partitions, so the global
/// row order of the result matches the input. Callers that requested fewer
/// partitions than there are workers must account for the grouped output when
/// matching result rows back to input rows; this is intentional behavior,
/// not an accident of scheduling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RepartitionPlan {
    /// Maps input partition index to output partition index. Monotone.
    map: Vec<usize>,
    n_out: usize,
}

/// Decides the output partition count for a distributed result.
///
/// Requested `n_parts` below the active worker count wins; everything else
/// (no request, or a request at/above the worker count) lands on one output
/// partition per active worker. The plan never splits an input partition, so
/// the output count is additionally capped at the input partition count.
pub(crate) fn plan(n_input_parts: usize, requested: Option<usize>, n_workers: usize) -> RepartitionPlan {
    let n_out = match requested {
        Some(parts) if parts < n_workers => parts,
        _ => n_workers,
    }
    .min(n_input_parts);

    let map = (0..n_input_parts).map(|i| i * n_out / n_input_parts).collect();
    RepartitionPlan { map, n_out }
}

impl RepartitionPlan {
    pub fn n_out(&self) -> usize {
        self.n_out
    }

    /// Concatenates per-input-partition chunks into the planned output
    /// partitions, preserving order.
    pub fn regroup<U>(&self, chunks: Vec<Vec<U>>) -> Vec<Vec<U>> {
        debug_assert_eq!(chunks.len(), self.map.len());
        let mut out: Vec<Vec<U>> = (0..self.n_out).map(|_| Vec::new()).collect();
        for (chunk, &target) in chunks.into_iter().zip(self.map.iter()) {
            out[target].extend(chunk);
        }
        out
    }
}
