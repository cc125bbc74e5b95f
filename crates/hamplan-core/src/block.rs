//! Blocks, block groups and bins.
//!
//! A coupling operator decomposes into rectangular blocks sitting on the
//! diagonal. A [`Block`] is the atomic unit of work assignment; a
//! [`BlockGroup`] is one ordered coupling category ("A" or "B"); a [`Bin`] is
//! the set of blocks handed to one worker of the propagation engine.

use std::ops::Range;

use crate::error::CoreError;
use crate::matrix::SparseOperator;

/// A rectangular sub-region of a coupling operator.
///
/// The block keeps its entries in a full-dimension [`SparseOperator`]
/// restricted to the block's row range, so that bins can later be summed
/// without any index translation. `seq` is the block's position in the
/// original block ordering of the whole matrix and is what the
/// locality-preserving balancer keys on.
#[derive(Debug, Clone)]
pub struct Block {
    matrix: SparseOperator,
    seq: usize,
    rows: Range<usize>,
    cols: Range<usize>,
}

impl Block {
    pub fn new(matrix: SparseOperator, seq: usize, rows: Range<usize>, cols: Range<usize>) -> Self {
        Self {
            matrix,
            seq,
            rows,
            cols,
        }
    }

    /// Number of stored entries; the load metric for balancing.
    pub fn nnz(&self) -> u64 {
        self.matrix.nnz() as u64
    }

    /// Position in the original block ordering.
    pub fn seq(&self) -> usize {
        self.seq
    }

    pub fn row_range(&self) -> Range<usize> {
        self.rows.clone()
    }

    pub fn col_range(&self) -> Range<usize> {
        self.cols.clone()
    }

    pub fn matrix(&self) -> &SparseOperator {
        &self.matrix
    }
}

/// An ordered sequence of blocks forming one coupling category.
///
/// Construction validates the ordering invariants: sequence indices strictly
/// increasing and row ranges strictly increasing without overlap. Zero-nnz
/// blocks are valid members; they occupy a sequence position and contribute
/// zero load.
#[derive(Debug, Clone)]
pub struct BlockGroup {
    label: String,
    dim: usize,
    blocks: Vec<Block>,
}

impl BlockGroup {
    pub fn new(
        label: impl Into<String>,
        dim: usize,
        blocks: Vec<Block>,
    ) -> Result<Self, CoreError> {
        let label = label.into();
        for (position, pair) in blocks.windows(2).enumerate() {
            if pair[1].seq <= pair[0].seq {
                return Err(CoreError::UnorderedBlocks {
                    group: label,
                    position: position + 1,
                });
            }
            if pair[1].rows.start < pair[0].rows.end {
                return Err(CoreError::OverlappingBlocks {
                    group: label,
                    seq: pair[1].seq,
                });
            }
        }
        for block in &blocks {
            if block.matrix.dim() != dim {
                return Err(CoreError::BlockDimensionMismatch {
                    group: label,
                    seq: block.seq,
                    found: block.matrix.dim(),
                    expected: dim,
                });
            }
        }
        Ok(Self { label, dim, blocks })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Dimension of the underlying operator carrying the blocks.
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Sum of member block loads.
    pub fn total_nnz(&self) -> u64 {
        self.blocks.iter().map(Block::nnz).sum()
    }

    /// Per-block loads in sequence order.
    pub fn loads(&self) -> Vec<u64> {
        self.blocks.iter().map(Block::nnz).collect()
    }
}

/// The blocks assigned to one parallel worker.
///
/// Member blocks are kept in ascending sequence order regardless of the
/// assignment order the balancer produced, so bin contents are deterministic
/// and reproducible.
#[derive(Debug, Clone)]
pub struct Bin {
    index: usize,
    blocks: Vec<Block>,
}

impl Bin {
    pub fn new(index: usize, mut blocks: Vec<Block>) -> Self {
        blocks.sort_by_key(Block::seq);
        Self { index, blocks }
    }

    pub fn empty(index: usize) -> Self {
        Self {
            index,
            blocks: Vec::new(),
        }
    }

    /// 0-based bin index; schedule rows are this plus one.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Aggregate load: sum of member block `nnz()` counts.
    pub fn load(&self) -> u64 {
        self.blocks.iter().map(Block::nnz).sum()
    }

    /// Sequence indices of the member blocks, ascending.
    pub fn seqs(&self) -> Vec<usize> {
        self.blocks.iter().map(Block::seq).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn block(seq: usize, rows: Range<usize>, entries: usize, dim: usize) -> Block {
        let triplets: Vec<_> = (0..entries)
            .map(|k| {
                let row = rows.start + k % rows.len();
                let col = k / rows.len();
                (row, col, Complex64::new(1.0, 0.0))
            })
            .collect();
        let matrix = SparseOperator::from_triplets(dim, &triplets).unwrap();
        Block::new(matrix, seq, rows.clone(), rows)
    }

    #[test]
    fn test_group_accepts_ordered_blocks() {
        let blocks = vec![block(0, 0..2, 3, 8), block(1, 2..5, 4, 8), block(2, 5..8, 0, 8)];
        let group = BlockGroup::new("A", 8, blocks).unwrap();
        assert_eq!(group.len(), 3);
        assert_eq!(group.total_nnz(), 7);
        assert_eq!(group.loads(), vec![3, 4, 0]);
    }

    #[test]
    fn test_group_rejects_unordered_seq() {
        let blocks = vec![block(1, 0..2, 1, 8), block(0, 2..4, 1, 8)];
        assert!(matches!(
            BlockGroup::new("A", 8, blocks),
            Err(CoreError::UnorderedBlocks { .. })
        ));
    }

    #[test]
    fn test_group_rejects_overlapping_rows() {
        let blocks = vec![block(0, 0..3, 1, 8), block(1, 2..5, 1, 8)];
        assert!(matches!(
            BlockGroup::new("A", 8, blocks),
            Err(CoreError::OverlappingBlocks { seq: 1, .. })
        ));
    }

    #[test]
    fn test_group_rejects_wrong_dimension() {
        let blocks = vec![block(0, 0..2, 1, 6)];
        assert!(matches!(
            BlockGroup::new("A", 8, blocks),
            Err(CoreError::BlockDimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_bin_load_and_order() {
        let bin = Bin::new(3, vec![block(4, 4..6, 5, 8), block(1, 0..2, 2, 8)]);
        assert_eq!(bin.index(), 3);
        assert_eq!(bin.load(), 7);
        assert_eq!(bin.seqs(), vec![1, 4]);
    }

    #[test]
    fn test_empty_bin() {
        let bin = Bin::empty(0);
        assert!(bin.is_empty());
        assert_eq!(bin.load(), 0);
    }
}
