//! Builders for synthetic block groups used across the test suites.

use hamplan_core::{Block, BlockGroup, SparseOperator};
use num_complex::Complex64;

/// Build a block group whose members have exactly the given nnz counts.
///
/// Each block gets an equal slice of rows; entries are laid out row-major
/// within the block's row slice, so every block holds exactly the requested
/// number of distinct stored positions.
pub fn group_with_loads(loads: &[u64]) -> BlockGroup {
    let n_blocks = loads.len();
    if n_blocks == 0 {
        return BlockGroup::new("synthetic", 0, Vec::new())
            .unwrap_or_else(|_| unreachable!("empty group is trivially valid"));
    }
    let max_load = loads.iter().copied().max().unwrap_or(0);
    // rows_per_block * dim entries fit per block; b * r^2 >= r^2 >= max_load
    let rows_per_block = (max_load as f64).sqrt().ceil() as usize + 1;
    let dim = n_blocks * rows_per_block;

    let blocks = loads
        .iter()
        .enumerate()
        .map(|(seq, &load)| {
            let start = seq * rows_per_block;
            let rows = start..start + rows_per_block;
            let entries: Vec<_> = (0..load as usize)
                .map(|t| {
                    let row = start + t % rows_per_block;
                    let col = t / rows_per_block;
                    (row, col, Complex64::new(1.0, 0.0))
                })
                .collect();
            let matrix = SparseOperator::from_triplets(dim, &entries)
                .unwrap_or_else(|_| unreachable!("entries stay inside the block's rows"));
            Block::new(matrix, seq, rows.clone(), rows)
        })
        .collect();

    BlockGroup::new("synthetic", dim, blocks)
        .unwrap_or_else(|_| unreachable!("block row slices are disjoint by construction"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_loads() {
        let group = group_with_loads(&[10, 0, 137]);
        assert_eq!(group.loads(), vec![10, 0, 137]);
        assert_eq!(group.total_nnz(), 147);
    }
}
