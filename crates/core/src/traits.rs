use crate::math::RealNumber;
use crate::problem::TransportProblem;
use crate::solution::Cell;
use std::time::Duration;

/// Produces the starting allocation of the transportation simplex.
///
/// Every returned entry must exhaust its row or its column at the moment it
/// is made, so the entries never close a cycle.
pub trait InitialSolution<T: RealNumber> {
    fn name(&self) -> &str;

    fn allocate(&self, problem: &TransportProblem<T>) -> Vec<(Cell, u64)>;
}

pub trait StoppingCriterion: Send + Sync {
    fn name(&self) -> &str;

    fn should_stop(&self, pivots: usize, elapsed: Duration) -> Option<String>;
}
