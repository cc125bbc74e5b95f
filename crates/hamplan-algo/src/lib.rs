//! # hamplan-algo: Block Partitioning and Work Scheduling
//!
//! Offline planning algorithms that turn a sparse coupling operator into a
//! static execution plan for an external multi-threaded propagation engine.
//!
//! ## Pipeline
//!
//! | Step | Function | What it does |
//! |------|----------|--------------|
//! | Extraction | [`split_coupling`] | carve the operator into alternating "A"/"B" block groups |
//! | Balancing | [`balance`] | greedy LPT assignment minimizing the maximum bin load |
//! | Balancing | [`balance_contiguous`] | contiguous-run assignment preserving block locality |
//! | Diagonal | [`split_diagonal`] | column-disjoint partition of the potential operator |
//! | Aggregation | [`aggregate`] | sum each bin's blocks into one operator |
//! | Planning | [`build_plan`] | wire it all into a deterministic [`SchedulePlan`] |
//!
//! Everything is single-threaded, pure and deterministic: planning runs once
//! per (operator, thread-count) configuration and its output is immutable.
//! The concurrency happens downstream, in the engine consuming the plan.
//!
//! ## Example
//!
//! ```rust
//! use hamplan_algo::{balance, split_coupling};
//! use hamplan_core::SparseOperator;
//! use num_complex::Complex64;
//!
//! // 4x4 coupling operator with two 2-row blocks on the diagonal
//! let m = SparseOperator::from_triplets(
//!     4,
//!     &[
//!         (0, 1, Complex64::new(1.0, 0.0)),
//!         (1, 2, Complex64::new(1.0, 0.0)),
//!         (2, 3, Complex64::new(1.0, 0.0)),
//!     ],
//! )
//! .unwrap();
//!
//! let (group_a, group_b) = split_coupling(&m, &[2, 2]).unwrap();
//! let bins = balance(&group_a, 2).unwrap();
//! let total: u64 = bins.iter().map(|b| b.load()).sum();
//! assert_eq!(total, group_a.total_nnz());
//! ```

pub mod aggregate;
pub mod balance;
pub mod contiguous;
pub mod diagonal;
pub mod extract;
pub mod plan;
pub mod test_support;

pub use aggregate::{aggregate, AggregateError};
pub use balance::{balance, lpt_assignment, BalanceError};
pub use contiguous::{balance_contiguous, contiguous_cuts};
pub use diagonal::split_diagonal;
pub use extract::{split_coupling, split_coupling_operators, ExtractError};
pub use plan::{build_plan, BalanceStrategy, PlanError, ScheduledOperator, SchedulePlan};
