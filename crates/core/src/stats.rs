use crate::math::RealNumber;
use crate::solution::Cell;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PivotRecord<T: RealNumber> {
    pub pivot: usize,
    pub entering: Cell,
    pub leaving: Cell,
    pub reduced_cost: T,
    pub theta: T,
    pub objective: T,
    pub elapsed: Duration,
}

impl<T> PivotRecord<T>
where
    T: RealNumber,
{
    pub fn new(
        pivot: usize,
        entering: Cell,
        leaving: Cell,
        reduced_cost: T,
        theta: T,
        objective: T,
        elapsed: Duration,
    ) -> Self {
        Self {
            pivot,
            entering,
            leaving,
            reduced_cost,
            theta,
            objective,
            elapsed,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.theta == T::zero()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveStats<T: RealNumber> {
    pub history: Vec<PivotRecord<T>>,
    pub solve_time: Duration,
    pub initial_objective: T,
    pub pivots: usize,
    pub degenerate_pivots: usize,
    pub padded_cells: usize,
}

impl<T> SolveStats<T>
where
    T: RealNumber,
{
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            solve_time: Duration::ZERO,
            initial_objective: T::zero(),
            pivots: 0,
            degenerate_pivots: 0,
            padded_cells: 0,
        }
    }

    pub fn record(&mut self, record: PivotRecord<T>, keep: bool) {
        self.pivots += 1;
        if record.is_degenerate() {
            self.degenerate_pivots += 1;
        }
        if keep {
            self.history.push(record);
        }
    }
}

impl<T> Default for SolveStats<T>
where
    T: RealNumber,
{
    fn default() -> Self {
        Self::new()
    }
}
