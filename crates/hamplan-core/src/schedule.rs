//! Schedule descriptor entries for the external propagation engine.
//!
//! The engine consumes one descriptor per scheduled operator, serialized as
//! `"{row},{column},{total_threads},{stage}"` - comma-joined integers, no
//! whitespace. The engine parses this format verbatim, so it must not change.
//! `row` identifies the worker (1-based), `column` the operator role,
//! `stage` the synchronization phase: operators sharing a stage may run
//! concurrently, distinct stages imply a barrier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from schedule entry construction or parsing.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// All four fields are required to be positive
    #[error("Schedule field '{0}' must be positive")]
    ZeroField(&'static str),

    /// Descriptor string does not match the `"r,c,t,s"` format
    #[error("Malformed schedule descriptor '{0}'")]
    Malformed(String),
}

/// One entry of the engine's execution plan.
///
/// `(row, column)` pairs are unique within a generated schedule; the planner
/// enforces this when assembling a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleEntry {
    row: u32,
    column: u32,
    total_threads: u32,
    stage: u32,
}

impl ScheduleEntry {
    /// Build an entry, rejecting zero in any field.
    pub fn new(row: u32, column: u32, total_threads: u32, stage: u32) -> Result<Self, ScheduleError> {
        if row == 0 {
            return Err(ScheduleError::ZeroField("row"));
        }
        if column == 0 {
            return Err(ScheduleError::ZeroField("column"));
        }
        if total_threads == 0 {
            return Err(ScheduleError::ZeroField("total_threads"));
        }
        if stage == 0 {
            return Err(ScheduleError::ZeroField("stage"));
        }
        Ok(Self {
            row,
            column,
            total_threads,
            stage,
        })
    }

    /// Worker identifier, 1-based.
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Operator role (potential = 1, coupling groups and adjoints = 2..).
    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn total_threads(&self) -> u32 {
        self.total_threads
    }

    /// Synchronization phase within one time step.
    pub fn stage(&self) -> u32 {
        self.stage
    }
}

impl fmt::Display for ScheduleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.row, self.column, self.total_threads, self.stage
        )
    }
}

impl FromStr for ScheduleEntry {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split(',');
        let mut next = || -> Result<u32, ScheduleError> {
            fields
                .next()
                // u32::parse would accept "+2"; fields must be plain digits
                .filter(|f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|f| f.parse().ok())
                .ok_or_else(|| ScheduleError::Malformed(s.to_string()))
        };
        let row = next()?;
        let column = next()?;
        let total_threads = next()?;
        let stage = next()?;
        drop(next);
        if fields.next().is_some() {
            return Err(ScheduleError::Malformed(s.to_string()));
        }
        ScheduleEntry::new(row, column, total_threads, stage)
    }
}
