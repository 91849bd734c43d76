use crate::basis::Basis;
use crate::certificate::{price_with, PricingRule};
use crate::initial::initial_solution;
use crate::stopping::{InterruptFlag, TimeLimit};
use std::cmp::Ordering;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use thiserror::Error;
use tranship_core::math::{dot, from_count, snap, snap_all, RealNumber, Timer};
use tranship_core::options::SolveOptions;
use tranship_core::problem::{ProblemError, TransportProblem};
use tranship_core::solution::{Cell, SolveResult, Status};
use tranship_core::stats::{PivotRecord, SolveStats};
use tranship_core::traits::StoppingCriterion;

#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Problem(#[from] ProblemError),
    #[error("invalid basis: {0}")]
    InvalidBasis(String),
    #[error("solver diverged: no optimum after {pivots} pivots (limit {limit})")]
    Divergence { pivots: usize, limit: usize },
    #[error("solve interrupted after {pivots} pivots: {reason}")]
    Interrupted { pivots: usize, reason: String },
}

/// After `m + n` consecutive degenerate pivots the entering rule falls back
/// to Bland's until flow moves again. Stopping criteria run between pivots.
pub struct TransportSimplex<T: RealNumber> {
    options: SolveOptions<T>,
    criteria: Vec<Box<dyn StoppingCriterion>>,
}

impl<T> TransportSimplex<T>
where
    T: RealNumber,
{
    pub fn new(options: SolveOptions<T>) -> Self {
        Self {
            options,
            criteria: Vec::new(),
        }
    }

    pub fn with_criterion<C>(mut self, criterion: C) -> Self
    where
        C: StoppingCriterion + 'static,
    {
        self.criteria.push(Box::new(criterion));
        self
    }

    pub fn with_interrupt(self, flag: Arc<AtomicBool>) -> Self {
        self.with_criterion(InterruptFlag::new(flag))
    }

    pub fn options(&self) -> &SolveOptions<T> {
        &self.options
    }

    fn stop_reason(&self, pivots: usize, timer: &Timer) -> Option<String> {
        let elapsed = timer.elapsed();
        self.options
            .max_time
            .map(TimeLimit::new)
            .and_then(|limit| limit.should_stop(pivots, elapsed))
            .or_else(|| {
                self.criteria
                    .iter()
                    .find_map(|criterion| criterion.should_stop(pivots, elapsed))
            })
    }

    pub fn solve(&self, problem: &TransportProblem<T>) -> Result<SolveResult<T>, SolveError> {
        let timer = Timer::start();
        let (m, n) = (problem.nrows(), problem.ncols());
        let tol = self.options.tolerance;
        let mut stats = SolveStats::new();
        let mut flows = vec![T::zero(); m * n];

        if m == 0 || n == 0 {
            return self.finish(problem, flows, Vec::new(), stats, timer);
        }

        let starter = initial_solution::<T>(self.options.initial);
        let shipped = starter.allocate(problem);
        for &((i, j), qty) in &shipped {
            flows[i * n + j] = from_count(qty);
        }
        let allocated: Vec<Cell> = shipped.iter().map(|&(cell, _)| cell).collect();
        let (mut basis, padded) = Basis::spanning(m, n, &allocated)?;
        stats.padded_cells = padded;
        stats.initial_objective = dot(problem.costs().data(), &flows);
        tracing::debug!(
            method = starter.name(),
            objective = %stats.initial_objective,
            padded,
            "initial basic feasible solution"
        );

        let limit = self.options.pivot_limit(m, n);
        let mut stalled = 0usize;
        loop {
            let rule = if stalled >= m + n {
                PricingRule::Bland
            } else {
                PricingRule::Dantzig
            };
            let certificate = price_with(problem, &basis, tol, rule);
            let Some((entering, reduced_cost)) = certificate.entering else {
                break;
            };
            if let Some(reason) = self.stop_reason(stats.pivots, &timer) {
                tracing::warn!(pivots = stats.pivots, %reason, "transport simplex interrupted");
                return Err(SolveError::Interrupted {
                    pivots: stats.pivots,
                    reason,
                });
            }
            if stats.pivots >= limit {
                tracing::warn!(pivots = stats.pivots, limit, "pivot limit exceeded");
                return Err(SolveError::Divergence {
                    pivots: stats.pivots,
                    limit,
                });
            }

            let cycle = basis.cycle(entering)?;
            let (leaving, theta) = cycle
                .iter()
                .step_by(2)
                .map(|&cell| (cell, flows[cell.0 * n + cell.1]))
                .min_by(|&(a, fa), &(b, fb)| {
                    fa.partial_cmp(&fb).unwrap_or(Ordering::Equal).then(a.cmp(&b))
                })
                .ok_or_else(|| {
                    SolveError::InvalidBasis(format!("empty cycle for entering cell {entering:?}"))
                })?;

            for (k, &(i, j)) in cycle.iter().enumerate() {
                let flow = &mut flows[i * n + j];
                *flow = if k % 2 == 0 { *flow - theta } else { *flow + theta };
                *flow = snap(*flow, tol);
            }
            flows[entering.0 * n + entering.1] = theta;
            flows[leaving.0 * n + leaving.1] = T::zero();
            basis.replace(leaving, entering)?;
            stalled = if theta == T::zero() { stalled + 1 } else { 0 };

            let objective = dot(problem.costs().data(), &flows);
            tracing::debug!(
                pivot = stats.pivots,
                ?entering,
                ?leaving,
                reduced_cost = %reduced_cost,
                theta = %theta,
                objective = %objective,
                "pivot"
            );
            stats.record(
                PivotRecord::new(
                    stats.pivots,
                    entering,
                    leaving,
                    reduced_cost,
                    theta,
                    objective,
                    timer.elapsed(),
                ),
                self.options.record_history,
            );
        }

        let cells = basis.cells().to_vec();
        self.finish(problem, flows, cells, stats, timer)
    }

    fn finish(
        &self,
        problem: &TransportProblem<T>,
        mut flows: Vec<T>,
        basis: Vec<Cell>,
        mut stats: SolveStats<T>,
        mut timer: Timer,
    ) -> Result<SolveResult<T>, SolveError> {
        snap_all(&mut flows, self.options.tolerance);
        let total_cost = dot(problem.costs().data(), &flows);
        let allocation = problem.costs().with_data(flows)?;
        timer.stop();
        stats.solve_time = timer.elapsed();
        tracing::debug!(
            pivots = stats.pivots,
            degenerate = stats.degenerate_pivots,
            total_cost = %total_cost,
            elapsed = ?stats.solve_time,
            "transport simplex finished"
        );
        Ok(SolveResult {
            status: Status::Optimal,
            allocation,
            total_cost,
            basis,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::certify;
    use approx::assert_relative_eq;
    use std::time::Duration;
    use tranship_core::options::InitialMethod;

    fn scenario() -> TransportProblem<f64> {
        TransportProblem::from_raw(
            vec![vec![4.0, 6.0, 0.0], vec![8.0, 5.0, 0.0]],
            vec![100, 50],
            vec![80, 40, 30],
        )
        .unwrap()
    }

    #[test]
    fn solves_two_by_two_with_surplus() {
        let result = TransportSimplex::new(SolveOptions::default())
            .solve(&scenario())
            .unwrap();
        assert_eq!(result.status, Status::Optimal);
        assert_relative_eq!(result.total_cost, 520.0);
        assert_eq!(result.pivots(), 1);
        assert_eq!(result.allocation.data(), &[80.0, 0.0, 20.0, 0.0, 40.0, 10.0]);
        assert_eq!(result.basis.len(), 4);

        let certificate = certify(&scenario(), &result.basis, 1e-9).unwrap();
        assert!(certificate.is_optimal());
        assert!(certificate.min_reduced_cost >= -1e-9);
    }

    #[test]
    fn records_history_when_asked() {
        let options = SolveOptions {
            record_history: true,
            ..SolveOptions::default()
        };
        let result = TransportSimplex::new(options).solve(&scenario()).unwrap();
        assert_eq!(result.stats.history.len(), 1);
        let record = &result.stats.history[0];
        assert_eq!(record.entering, (1, 2));
        assert_eq!(record.leaving, (1, 0));
        assert_relative_eq!(record.theta, 10.0);
        assert_relative_eq!(result.stats.initial_objective, 560.0);
    }

    #[test]
    fn pivot_ceiling_reports_divergence() {
        let options = SolveOptions {
            max_pivots: Some(0),
            ..SolveOptions::default()
        };
        let err = TransportSimplex::new(options).solve(&scenario()).unwrap_err();
        assert!(matches!(err, SolveError::Divergence { pivots: 0, limit: 0 }));
    }

    #[test]
    fn zero_time_budget_interrupts() {
        let options = SolveOptions {
            max_time: Some(Duration::ZERO),
            ..SolveOptions::default()
        };
        let err = TransportSimplex::new(options).solve(&scenario()).unwrap_err();
        assert!(matches!(err, SolveError::Interrupted { pivots: 0, .. }));
    }

    #[test]
    fn raised_flag_interrupts() {
        let flag = Arc::new(AtomicBool::new(true));
        let err = TransportSimplex::new(SolveOptions::<f64>::default())
            .with_interrupt(flag)
            .solve(&scenario())
            .unwrap_err();
        assert!(err.to_string().contains("interrupt signal received"));
    }

    #[test]
    fn optimal_start_ignores_budget() {
        let problem =
            TransportProblem::from_raw(vec![vec![1.0, 9.0], vec![9.0, 1.0]], vec![5, 5], vec![5, 5])
                .unwrap();
        let options = SolveOptions {
            max_time: Some(Duration::ZERO),
            max_pivots: Some(0),
            ..SolveOptions::default()
        };
        let result = TransportSimplex::new(options).solve(&problem).unwrap();
        assert_relative_eq!(result.total_cost, 10.0);
    }

    #[test]
    fn every_start_reaches_the_same_optimum() {
        for initial in [InitialMethod::LeastCost, InitialMethod::NorthWest, InitialMethod::Vogel] {
            let options = SolveOptions {
                initial,
                ..SolveOptions::default()
            };
            let result = TransportSimplex::new(options).solve(&scenario()).unwrap();
            assert_relative_eq!(result.total_cost, 520.0);
        }
    }

    #[test]
    fn empty_tableau_is_trivially_optimal() {
        let problem = TransportProblem::<f64>::from_raw(Vec::new(), Vec::new(), vec![0]).unwrap();
        let result = TransportSimplex::new(SolveOptions::default())
            .solve(&problem)
            .unwrap();
        assert_eq!(result.status, Status::Optimal);
        assert_eq!(result.total_cost, 0.0);
        assert!(result.basis.is_empty());
    }
}
