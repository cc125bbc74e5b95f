//! Immutable sparse operator over complex entries.
//!
//! Hamiltonians in this pipeline are large and very sparse: a coupling
//! operator over a ~10^4-dimensional Hilbert space typically carries well
//! under 0.1% density. Operators are stored in CSR form and never mutated;
//! every transformation (addition, conjugate transpose, filtering) produces a
//! new value.

use num_complex::Complex64;
use sprs::{CsMat, TriMat};

use crate::error::CoreError;

/// Immutable square sparse matrix of `Complex64` in CSR format.
///
/// Construction goes through triplets; duplicate positions are summed during
/// CSR conversion. Structural (explicitly stored) zeros are permitted and
/// counted by [`nnz`](SparseOperator::nnz) - the load metric for balancing is
/// the stored-entry count, not the count of numerically nonzero values.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseOperator {
    matrix: CsMat<Complex64>,
    dim: usize,
}

impl SparseOperator {
    /// Build an operator from `(row, col, value)` triplets.
    ///
    /// Fails with [`CoreError::IndexOutOfRange`] if any index is outside
    /// `[0, dim)`. Duplicate positions are summed.
    pub fn from_triplets(
        dim: usize,
        entries: &[(usize, usize, Complex64)],
    ) -> Result<Self, CoreError> {
        let mut triplets = TriMat::new((dim, dim));
        for &(row, col, value) in entries {
            if row >= dim || col >= dim {
                return Err(CoreError::IndexOutOfRange { row, col, dim });
            }
            triplets.add_triplet(row, col, value);
        }
        Ok(Self {
            matrix: triplets.to_csr(),
            dim,
        })
    }

    /// The empty `dim x dim` operator.
    pub fn empty(dim: usize) -> Self {
        Self {
            matrix: CsMat::zero((dim, dim)),
            dim,
        }
    }

    /// Matrix dimension (the operator is square).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.matrix.nnz()
    }

    /// Matrix density (nnz / dim^2).
    pub fn density(&self) -> f64 {
        if self.dim == 0 {
            return 0.0;
        }
        self.nnz() as f64 / (self.dim * self.dim) as f64
    }

    /// Get entry `(i, j)`, zero if not stored.
    pub fn get(&self, i: usize, j: usize) -> Complex64 {
        self.matrix
            .get(i, j)
            .copied()
            .unwrap_or(Complex64::new(0.0, 0.0))
    }

    /// Iterate stored entries as `(row, col, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Complex64)> + '_ {
        self.matrix.iter().map(|(v, (i, j))| (i, j, *v))
    }

    /// Elementwise sum with another operator of the same dimension.
    ///
    /// The result's stored pattern is the union of both operands' patterns,
    /// except that entries cancelling to exact zero are eliminated from
    /// storage.
    pub fn add(&self, other: &SparseOperator) -> Result<SparseOperator, CoreError> {
        if self.dim != other.dim {
            return Err(CoreError::DimensionMismatch {
                left: self.dim,
                right: other.dim,
            });
        }
        Ok(Self {
            matrix: &self.matrix + &other.matrix,
            dim: self.dim,
        })
    }

    /// Conjugate transpose of the operator.
    pub fn dag(&self) -> SparseOperator {
        Self {
            matrix: self.matrix.transpose_view().to_csr().map(|v| v.conj()),
            dim: self.dim,
        }
    }

    /// Keep only the stored entries for which `keep(row, col)` holds.
    pub fn filter(&self, mut keep: impl FnMut(usize, usize) -> bool) -> SparseOperator {
        let mut triplets = TriMat::new((self.dim, self.dim));
        for (i, j, v) in self.iter() {
            if keep(i, j) {
                triplets.add_triplet(i, j, v);
            }
        }
        Self {
            matrix: triplets.to_csr(),
            dim: self.dim,
        }
    }
}
