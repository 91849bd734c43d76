use crate::math::RealNumber;
use crate::matrix::Allocation;
use crate::stats::SolveStats;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type Cell = (usize, usize);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Status {
    Optimal,
    Infeasible,
    /// Never produced by a balanced transportation problem.
    Unbounded,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Optimal => write!(f, "Optimal"),
            Status::Infeasible => write!(f, "Infeasible"),
            Status::Unbounded => write!(f, "Unbounded"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResult<T: RealNumber> {
    pub status: Status,
    pub allocation: Allocation<T>,
    pub total_cost: T,
    pub basis: Vec<Cell>,
    pub stats: SolveStats<T>,
}

impl<T> SolveResult<T>
where
    T: RealNumber,
{
    pub fn pivots(&self) -> usize {
        self.stats.pivots
    }

    pub fn shipped(&self, location: &str, customer: &str) -> T {
        self.allocation
            .get(location, customer)
            .unwrap_or_else(T::zero)
    }

    pub fn row_total(&self, row: usize) -> T {
        self.allocation
            .row(row)
            .iter()
            .fold(T::zero(), |acc, &qty| acc + qty)
    }

    pub fn column_total(&self, col: usize) -> T {
        self.allocation
            .column(col)
            .fold(T::zero(), |acc, qty| acc + qty)
    }
}
