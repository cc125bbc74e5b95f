//! Summation of a bin's blocks into one combined operator.
//!
//! Each bin's blocks are carried as full-dimension sparse matrices, so
//! aggregation is plain index-aligned addition. The stored pattern of the
//! result is the union of the blocks' patterns, except that entries summing
//! to exact algebraic zero are eliminated from storage. Blocks of one
//! coupling group occupy disjoint rows, so cancellation never occurs for
//! bins produced by the balancers and the aggregate load equals the bin
//! load.

use hamplan_core::{Bin, SparseOperator};
use thiserror::Error;

/// Errors from bin aggregation.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// A member block's matrix dimension differs from the requested dimension
    #[error("Bin {bin}: block {seq} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        bin: usize,
        seq: usize,
        found: usize,
        expected: usize,
    },
}

/// Sum the blocks of `bin` into a single `dim x dim` operator.
///
/// An empty bin yields the empty operator. Blocks within a group occupy
/// disjoint row ranges, so no positions actually collide across blocks; the
/// summation is still written as general elementwise addition and tolerates
/// overlap.
pub fn aggregate(bin: &Bin, dim: usize) -> Result<SparseOperator, AggregateError> {
    for block in bin.blocks() {
        if block.matrix().dim() != dim {
            return Err(AggregateError::DimensionMismatch {
                bin: bin.index(),
                seq: block.seq(),
                found: block.matrix().dim(),
                expected: dim,
            });
        }
    }

    let mut acc = SparseOperator::empty(dim);
    for block in bin.blocks() {
        acc = acc
            .add(block.matrix())
            .unwrap_or_else(|_| unreachable!("dimensions checked above"));
    }
    Ok(acc)
}
