//! Greedy LPT load balancing.
//!
//! Classical Longest-Processing-Time heuristic for minimizing parallel
//! makespan: sort blocks by descending load, then repeatedly hand the next
//! block to the least-loaded bin. The maximum bin load is guaranteed to stay
//! within `4/3 - 1/(3k)` of the optimum for `k` bins.
//!
//! Determinism is part of the contract: load ties are broken by ascending
//! sequence index, bin-load ties by lowest bin index. The same input always
//! produces the same bins.

use hamplan_core::{Bin, Block, BlockGroup};
use thiserror::Error;

/// Errors shared by the balancers and the diagonal splitter.
#[derive(Debug, Error)]
pub enum BalanceError {
    /// The number of bins must be at least one
    #[error("Invalid thread count: n_bins must be >= 1")]
    InvalidThreadCount,

    /// The potential operator passed to the diagonal splitter is not diagonal
    #[error("Entry ({row}, {col}) off the diagonal; potential operator must be diagonal")]
    NotDiagonal { row: usize, col: usize },
}

/// Assign per-block loads to `n_bins` bins with greedy LPT.
///
/// Returns the 0-based bin index for each block, positionally. This is the
/// kernel [`balance`] builds on; it is exposed for callers that only have
/// load counts (e.g. plan previews).
pub fn lpt_assignment(loads: &[u64], n_bins: usize) -> Result<Vec<usize>, BalanceError> {
    if n_bins == 0 {
        return Err(BalanceError::InvalidThreadCount);
    }

    let mut order: Vec<usize> = (0..loads.len()).collect();
    order.sort_by_key(|&i| (std::cmp::Reverse(loads[i]), i));

    let mut bin_loads = vec![0u64; n_bins];
    let mut assignment = vec![0usize; loads.len()];
    for i in order {
        // argmin over running loads; min_by_key keeps the first (lowest
        // index) of equal loads, which is exactly the tie rule we need.
        let bin = (0..n_bins)
            .min_by_key(|&b| bin_loads[b])
            .unwrap_or_else(|| unreachable!("n_bins >= 1"));
        assignment[i] = bin;
        bin_loads[bin] += loads[i];
    }
    Ok(assignment)
}

/// Distribute a block group across `n_bins` bins with greedy LPT.
///
/// Excess bins stay legitimately empty when `n_bins` exceeds the number of
/// blocks; an empty group yields all-empty bins. The total load across bins
/// always equals the group's total nnz - no block is split, dropped or
/// double-counted.
pub fn balance(group: &BlockGroup, n_bins: usize) -> Result<Vec<Bin>, BalanceError> {
    let assignment = lpt_assignment(&group.loads(), n_bins)?;

    let mut contents: Vec<Vec<Block>> = vec![Vec::new(); n_bins];
    for (block, &bin) in group.iter().zip(assignment.iter()) {
        contents[bin].push(block.clone());
    }
    Ok(contents
        .into_iter()
        .enumerate()
        .map(|(index, blocks)| Bin::new(index, blocks))
        .collect())
}
