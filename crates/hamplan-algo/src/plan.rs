//! End-to-end schedule planning.
//!
//! Wires the pipeline together: extract the coupling blocks, balance them
//! across worker bins, aggregate each bin into one operator, split the
//! potential by column, and attach a [`ScheduleEntry`] to every operator.
//!
//! Operator roles map to schedule columns: potential = 1, group "A" forward
//! = 2, group "B" forward = 3, group "A" adjoint = 4, group "B" adjoint = 5.
//! Stages equal columns: all rows of one role touch disjoint row (or column)
//! ranges and may run concurrently, while distinct roles are separated by an
//! engine-side barrier.

use hamplan_core::{Bin, BlockGroup, ScheduleEntry, ScheduleError, SparseOperator};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::{aggregate, AggregateError};
use crate::balance::{balance, BalanceError};
use crate::contiguous::balance_contiguous;
use crate::diagonal::split_diagonal;
use crate::extract::{split_coupling, ExtractError};

/// Schedule columns for the operator roles, in emission order.
const COLUMN_POTENTIAL: u32 = 1;
const COLUMN_A_FORWARD: u32 = 2;
const COLUMN_B_FORWARD: u32 = 3;
const COLUMN_A_ADJOINT: u32 = 4;
const COLUMN_B_ADJOINT: u32 = 5;

/// Errors from plan assembly.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Balance(#[from] BalanceError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// The potential and coupling operators must share a dimension
    #[error("Potential dimension {potential} does not match coupling dimension {coupling}")]
    DimensionMismatch { potential: usize, coupling: usize },

    /// Thread counts beyond u32 cannot be encoded in a schedule entry
    #[error("Thread count {0} exceeds the schedule descriptor range")]
    ThreadCountOverflow(usize),
}

/// How coupling blocks are distributed across bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceStrategy {
    /// Greedy LPT: best balance, blocks may scatter across the sequence.
    Lpt,
    /// Contiguous runs: locality preserved at the cost of some balance.
    Contiguous,
}

/// One operator of the plan together with its schedule descriptor.
#[derive(Debug, Clone)]
pub struct ScheduledOperator {
    pub entry: ScheduleEntry,
    pub operator: SparseOperator,
}

/// A complete, immutable execution plan for the propagation engine.
#[derive(Debug, Clone)]
pub struct SchedulePlan {
    operators: Vec<ScheduledOperator>,
    n_threads: usize,
}

impl SchedulePlan {
    pub fn operators(&self) -> &[ScheduledOperator] {
        &self.operators
    }

    pub fn n_threads(&self) -> usize {
        self.n_threads
    }

    /// Descriptor lines in emission order (column, then row), one per
    /// operator, in the engine's bit-exact format.
    pub fn descriptor_lines(&self) -> Vec<String> {
        self.operators.iter().map(|s| s.entry.to_string()).collect()
    }

    /// Check that `(row, column)` pairs are unique across the plan.
    pub fn validate(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.operators
            .iter()
            .all(|s| seen.insert((s.entry.row(), s.entry.column())))
    }
}

/// Build the full execution plan for one (Hamiltonian, thread-count)
/// configuration.
///
/// `potential` is the diagonal part, `coupling` the upper-triangular block
/// part; `block_sizes` is the external block metadata. Emits, per worker row:
/// the potential partition (column 1), the forward coupling operators
/// (columns 2 and 3) and their adjoints (columns 4 and 5). Planning is pure
/// and deterministic; repeated calls with the same inputs produce identical
/// plans.
pub fn build_plan(
    potential: &SparseOperator,
    coupling: &SparseOperator,
    block_sizes: &[usize],
    n_threads: usize,
    strategy: BalanceStrategy,
) -> Result<SchedulePlan, PlanError> {
    if n_threads == 0 {
        return Err(PlanError::Balance(BalanceError::InvalidThreadCount));
    }
    let total_threads = u32::try_from(n_threads).map_err(|_| PlanError::ThreadCountOverflow(n_threads))?;
    if potential.dim() != coupling.dim() {
        return Err(PlanError::DimensionMismatch {
            potential: potential.dim(),
            coupling: coupling.dim(),
        });
    }
    let dim = coupling.dim();

    let (group_a, group_b) = split_coupling(coupling, block_sizes)?;
    let bins_a = balance_with(&group_a, n_threads, strategy)?;
    let bins_b = balance_with(&group_b, n_threads, strategy)?;

    let ops_a: Vec<SparseOperator> = bins_a
        .iter()
        .map(|bin| aggregate(bin, dim))
        .collect::<Result<_, _>>()?;
    let ops_b: Vec<SparseOperator> = bins_b
        .iter()
        .map(|bin| aggregate(bin, dim))
        .collect::<Result<_, _>>()?;
    let potentials = split_diagonal(potential, n_threads)?;

    let mut operators = Vec::with_capacity(5 * n_threads);
    let mut emit = |column: u32, ops: Vec<SparseOperator>| -> Result<(), PlanError> {
        for (row0, operator) in ops.into_iter().enumerate() {
            let entry = ScheduleEntry::new(row0 as u32 + 1, column, total_threads, column)?;
            operators.push(ScheduledOperator { entry, operator });
        }
        Ok(())
    };
    emit(COLUMN_POTENTIAL, potentials)?;
    emit(COLUMN_A_FORWARD, ops_a.clone())?;
    emit(COLUMN_B_FORWARD, ops_b.clone())?;
    emit(COLUMN_A_ADJOINT, ops_a.iter().map(SparseOperator::dag).collect())?;
    emit(COLUMN_B_ADJOINT, ops_b.iter().map(SparseOperator::dag).collect())?;
    drop(emit);

    Ok(SchedulePlan {
        operators,
        n_threads,
    })
}

fn balance_with(
    group: &BlockGroup,
    n_bins: usize,
    strategy: BalanceStrategy,
) -> Result<Vec<Bin>, BalanceError> {
    match strategy {
        BalanceStrategy::Lpt => balance(group, n_bins),
        BalanceStrategy::Contiguous => balance_contiguous(group, n_bins),
    }
}
