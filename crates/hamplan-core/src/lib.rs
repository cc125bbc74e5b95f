//! # hamplan-core: Hamiltonian Block Scheduling Data Model
//!
//! Core value types for planning the parallel application of a large sparse
//! Hamiltonian: the sparse operator itself, the rectangular blocks it
//! decomposes into, the per-worker bins those blocks are assigned to, and the
//! schedule descriptor consumed by the external propagation engine.
//!
//! ## Design Philosophy
//!
//! Everything here is an **immutable value type**. Blocks and block groups are
//! derived once from a static input operator; bins and schedule entries are
//! derived once per (operator, thread-count) configuration. There is no
//! runtime mutation after planning, which is what makes the downstream
//! engine's lock-free execution sound.
//!
//! ## Core Data Structures
//!
//! - [`SparseOperator`] - immutable square complex sparse matrix (CSR)
//! - [`Block`] - rectangular sub-region of an operator, the atomic work unit
//! - [`BlockGroup`] - ordered, named sequence of blocks (one coupling category)
//! - [`Bin`] - the blocks assigned to one parallel worker
//! - [`ScheduleEntry`] - `(row, column, total_threads, stage)` descriptor
//!
//! ## Quick Start
//!
//! ```rust
//! use hamplan_core::{ScheduleEntry, SparseOperator};
//! use num_complex::Complex64;
//!
//! let m = SparseOperator::from_triplets(
//!     4,
//!     &[(0, 1, Complex64::new(1.0, 0.0)), (2, 3, Complex64::new(0.0, -1.0))],
//! )
//! .unwrap();
//! assert_eq!(m.nnz(), 2);
//!
//! let entry = ScheduleEntry::new(1, 2, 12, 2).unwrap();
//! assert_eq!(entry.to_string(), "1,2,12,2");
//! ```

pub mod block;
pub mod error;
pub mod matrix;
pub mod schedule;

pub use block::{Bin, Block, BlockGroup};
pub use error::{CoreError, HamplanError, HamplanResult};
pub use matrix::SparseOperator;
pub use schedule::{ScheduleEntry, ScheduleError};
