//! Block extraction from a coupling operator.
//!
//! The coupling part of the Hamiltonian is upper-triangular and consists of
//! rectangular blocks sitting on the diagonal. Block sizes come from external
//! metadata (an ordered sequence of row counts, zeros discarded). Alternating
//! blocks are separated into two categories "A" and "B"; within each category
//! the block row ranges are disjoint, so each category forms a block-diagonal
//! operator and any partition of its blocks into bins is row-disjoint.

use hamplan_core::{Block, BlockGroup, CoreError, SparseOperator};
use num_complex::Complex64;
use thiserror::Error;

/// Errors from block extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Block sizes do not sum to the operator dimension
    #[error("Block sizes sum to {actual}, operator dimension is {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The coupling operator must only hold entries at or above the diagonal
    #[error("Entry ({row}, {col}) below the diagonal; coupling operator must be upper-triangular")]
    NotUpperTriangular { row: usize, col: usize },

    /// Invariant violation while assembling a block group
    #[error(transparent)]
    Group(#[from] CoreError),
}

/// Split a coupling operator into the two alternating block groups "A" / "B".
///
/// `block_sizes` gives the number of rows in each consecutive block; zero
/// entries are discarded. The remaining sizes must sum to `m.dim()`. Block `k`
/// (0-based, after discarding zeros) holds every stored entry whose row falls
/// in the block's cumulative row range; even `k` goes to group "A", odd `k` to
/// group "B". Blocks with no entries are preserved - they occupy their
/// sequence position and contribute zero load to later balancing. A block's
/// column extent spans its stored columns; for a block with no entries it
/// falls back to the block's row range.
pub fn split_coupling(
    m: &SparseOperator,
    block_sizes: &[usize],
) -> Result<(BlockGroup, BlockGroup), ExtractError> {
    let n = m.dim();
    let sizes: Vec<usize> = block_sizes.iter().copied().filter(|&s| s != 0).collect();
    let total: usize = sizes.iter().sum();
    if total != n {
        return Err(ExtractError::DimensionMismatch {
            expected: n,
            actual: total,
        });
    }

    // Row offsets per block, then one triplet bucket per block.
    let mut offsets = Vec::with_capacity(sizes.len() + 1);
    let mut acc = 0;
    for &size in &sizes {
        offsets.push(acc);
        acc += size;
    }
    offsets.push(n);

    let mut buckets: Vec<Vec<(usize, usize, Complex64)>> = vec![Vec::new(); sizes.len()];
    let mut k = 0;
    for (i, j, v) in m.iter() {
        if j < i {
            return Err(ExtractError::NotUpperTriangular { row: i, col: j });
        }
        // CSR iteration is row-sorted, so the block index only advances.
        while i >= offsets[k + 1] {
            k += 1;
        }
        buckets[k].push((i, j, v));
    }

    let mut group_a = Vec::new();
    let mut group_b = Vec::new();
    for (seq, entries) in buckets.iter().enumerate() {
        let rows = offsets[seq]..offsets[seq + 1];
        let cols = column_extent(entries).unwrap_or_else(|| rows.clone());
        let matrix = SparseOperator::from_triplets(n, entries)?;
        let block = Block::new(matrix, seq, rows, cols);
        if seq % 2 == 0 {
            group_a.push(block);
        } else {
            group_b.push(block);
        }
    }

    Ok((
        BlockGroup::new("A", n, group_a)?,
        BlockGroup::new("B", n, group_b)?,
    ))
}

/// Split a coupling operator into two block-diagonal operators.
///
/// Whole-matrix variant of [`split_coupling`]: each returned operator is the
/// sum of one category's blocks, with only the upper-left quadrant of each
/// block populated.
pub fn split_coupling_operators(
    m: &SparseOperator,
    block_sizes: &[usize],
) -> Result<(SparseOperator, SparseOperator), ExtractError> {
    let (group_a, group_b) = split_coupling(m, block_sizes)?;
    Ok((sum_group(&group_a), sum_group(&group_b)))
}

fn sum_group(group: &BlockGroup) -> SparseOperator {
    let mut acc = SparseOperator::empty(group.dim());
    for block in group.iter() {
        // Dimensions validated at group construction, so add cannot fail.
        acc = acc
            .add(block.matrix())
            .unwrap_or_else(|_| unreachable!("group blocks share the group dimension"));
    }
    acc
}

fn column_extent(entries: &[(usize, usize, Complex64)]) -> Option<std::ops::Range<usize>> {
    let min = entries.iter().map(|&(_, j, _)| j).min()?;
    let max = entries.iter().map(|&(_, j, _)| j).max()?;
    Some(min..max + 1)
}
