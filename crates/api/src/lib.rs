#![forbid(unsafe_code)]

pub mod report;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tranship_algos::{SolveError, TransportSimplex};
use tranship_core::balance::{balanced_vectors, DemandVector, SupplyVector};
use tranship_core::cost::build_cost_matrix;
use tranship_core::math::RealNumber;
use tranship_core::model::ModelError;
use tranship_core::problem::{ProblemError, TransportProblem};
use uuid::Uuid;

pub use report::{assemble, CapacityRow, CustomerRow, TransportReport};
pub use tranship_core::model::{Customer, Location, SYNTHETIC_CUSTOMER};
pub use tranship_core::options::{InitialMethod, SolveOptions};
pub use tranship_core::solution::{SolveResult, Status};
pub use tranship_core::stats::SolveStats;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingCostField,
    Infeasible,
    SolverDivergence,
    Interrupted,
    InvalidInput,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Problem(#[from] ProblemError),
    #[error(transparent)]
    Solve(#[from] SolveError),
}

impl TransportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransportError::Model(ModelError::MissingCostField { .. }) => {
                ErrorKind::MissingCostField
            }
            TransportError::Model(ModelError::Infeasible { .. }) => ErrorKind::Infeasible,
            TransportError::Model(_) => ErrorKind::InvalidInput,
            TransportError::Problem(ProblemError::Unbalanced { .. })
            | TransportError::Solve(SolveError::Problem(ProblemError::Unbalanced { .. })) => {
                ErrorKind::Infeasible
            }
            TransportError::Problem(_) | TransportError::Solve(SolveError::Problem(_)) => {
                ErrorKind::InvalidInput
            }
            TransportError::Solve(SolveError::Divergence { .. })
            | TransportError::Solve(SolveError::InvalidBasis(_)) => ErrorKind::SolverDivergence,
            TransportError::Solve(SolveError::Interrupted { .. }) => ErrorKind::Interrupted,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportInstance<T> {
    pub locations: Vec<Location<T>>,
    pub customers: Vec<Customer<T>>,
}

#[derive(Debug, Clone)]
pub struct PreparedProblem<T: RealNumber> {
    pub problem: TransportProblem<T>,
    pub supply: SupplyVector,
    pub demand: DemandVector,
}

pub fn prepare<T: RealNumber>(
    locations: &[Location<T>],
    customers: &[Customer<T>],
) -> Result<PreparedProblem<T>, TransportError> {
    let costs = build_cost_matrix(locations, customers)?;
    let (supply, demand) = balanced_vectors(locations, customers)?;
    let problem = TransportProblem::new(costs, &supply, &demand)?;
    Ok(PreparedProblem {
        problem,
        supply,
        demand,
    })
}

pub struct TransportSolver<T: RealNumber> {
    options: SolveOptions<T>,
    interrupt: Option<Arc<AtomicBool>>,
}

impl<T> TransportSolver<T>
where
    T: RealNumber,
{
    pub fn new() -> Self {
        Self {
            options: SolveOptions::default(),
            interrupt: None,
        }
    }

    pub fn options(mut self, options: SolveOptions<T>) -> Self {
        self.options = options;
        self
    }

    pub fn initial(mut self, method: InitialMethod) -> Self {
        self.options.initial = method;
        self
    }

    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.options.max_time = Some(limit);
        self
    }

    pub fn interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    fn engine(&self) -> TransportSimplex<T> {
        let engine = TransportSimplex::new(self.options.clone());
        match &self.interrupt {
            Some(flag) => engine.with_interrupt(Arc::clone(flag)),
            None => engine,
        }
    }

    pub fn solve(
        &self,
        locations: &[Location<T>],
        customers: &[Customer<T>],
    ) -> Result<TransportReport<T>, TransportError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "transport_solve",
            %request_id,
            locations = locations.len(),
            customers = customers.len()
        );
        let _guard = span.enter();

        let outcome = self.run(locations, customers);
        match &outcome {
            Ok(report) => tracing::info!(
                status = %report.status,
                total_cost = %report.total_cost,
                pivots = report.pivots(),
                elapsed = ?report.stats.solve_time,
                "transport problem solved"
            ),
            Err(err) => tracing::warn!(kind = ?err.kind(), error = %err, "transport problem failed"),
        }
        outcome
    }

    fn run(
        &self,
        locations: &[Location<T>],
        customers: &[Customer<T>],
    ) -> Result<TransportReport<T>, TransportError> {
        let prepared = prepare(locations, customers)?;
        let result = self.engine().solve(&prepared.problem)?;
        Ok(assemble(&result, &prepared.supply, &prepared.demand)?)
    }

    pub fn solve_instance(
        &self,
        instance: &TransportInstance<T>,
    ) -> Result<TransportReport<T>, TransportError> {
        self.solve(&instance.locations, &instance.customers)
    }

    pub fn solve_batch(
        &self,
        instances: &[TransportInstance<T>],
    ) -> Vec<Result<TransportReport<T>, TransportError>> {
        instances
            .par_iter()
            .map(|instance| self.solve_instance(instance))
            .collect()
    }
}

impl<T> Default for TransportSolver<T>
where
    T: RealNumber,
{
    fn default() -> Self {
        Self::new()
    }
}

pub fn solve_transportation<T: RealNumber>(
    locations: &[Location<T>],
    customers: &[Customer<T>],
    options: SolveOptions<T>,
) -> Result<TransportReport<T>, TransportError> {
    TransportSolver::new()
        .options(options)
        .solve(locations, customers)
}
