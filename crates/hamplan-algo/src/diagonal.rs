//! Column-disjoint splitting of the potential (diagonal) operator.
//!
//! The potential part of the Hamiltonian is dense along its diagonal, so the
//! split is by index count rather than nnz: `[0, n)` is divided into `n_bins`
//! contiguous ranges as evenly as possible and each output operator keeps the
//! diagonal entries whose column falls in its range. The outputs touch
//! pairwise disjoint columns, which is what permits lock-free concurrent
//! application in the engine's disjoint-column execution mode.

use std::ops::Range;

use hamplan_core::SparseOperator;

use crate::balance::BalanceError;

/// Split `[0, n)` into `n_bins` near-even contiguous ranges.
///
/// The first `n % n_bins` ranges are one index longer. Ranges may be empty
/// when `n_bins > n`.
pub fn column_ranges(n: usize, n_bins: usize) -> Result<Vec<Range<usize>>, BalanceError> {
    if n_bins == 0 {
        return Err(BalanceError::InvalidThreadCount);
    }
    let base = n / n_bins;
    let longer = n % n_bins;
    let mut ranges = Vec::with_capacity(n_bins);
    let mut start = 0;
    for k in 0..n_bins {
        let len = base + usize::from(k < longer);
        ranges.push(start..start + len);
        start += len;
    }
    Ok(ranges)
}

/// Partition a diagonal operator into `n_bins` column-disjoint operators.
///
/// Fails fast with [`BalanceError::NotDiagonal`] if any stored entry sits off
/// the diagonal, and with [`BalanceError::InvalidThreadCount`] for
/// `n_bins == 0`. The union of the outputs' column sets is exactly `[0, n)`.
pub fn split_diagonal(
    diag: &SparseOperator,
    n_bins: usize,
) -> Result<Vec<SparseOperator>, BalanceError> {
    let ranges = column_ranges(diag.dim(), n_bins)?;
    for (i, j, _) in diag.iter() {
        if i != j {
            return Err(BalanceError::NotDiagonal { row: i, col: j });
        }
    }
    Ok(ranges
        .into_iter()
        .map(|range| diag.filter(|_, j| range.contains(&j)))
        .collect())
}
