use crate::balance::{DemandVector, SupplyVector};
use crate::math::RealNumber;
use crate::matrix::CostMatrix;
use indexmap::IndexSet;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("invalid structure: {0}")]
    InvalidStructure(String),
    #[error("unbalanced problem: total supply {supply} != total demand {demand}")]
    Unbalanced { supply: u64, demand: u64 },
}

pub type ProblemResult<T> = Result<T, ProblemError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportProblem<T> {
    costs: CostMatrix<T>,
    supply: Vec<u64>,
    demand: Vec<u64>,
}

impl<T> TransportProblem<T>
where
    T: RealNumber,
{
    pub fn new(
        costs: CostMatrix<T>,
        supply: &SupplyVector,
        demand: &DemandVector,
    ) -> ProblemResult<Self> {
        if !costs.rows().iter().map(String::as_str).eq(supply.labels()) {
            return Err(ProblemError::DimensionMismatch(format!(
                "cost rows [{}] do not match supply labels [{}]",
                costs.rows().iter().join(", "),
                supply.labels().join(", ")
            )));
        }
        if !costs.cols().iter().map(String::as_str).eq(demand.labels()) {
            return Err(ProblemError::DimensionMismatch(format!(
                "cost columns [{}] do not match demand labels [{}]",
                costs.cols().iter().join(", "),
                demand.labels().join(", ")
            )));
        }
        Self::checked(costs, supply.quantities(), demand.quantities())
    }

    pub fn from_raw(costs: Vec<Vec<T>>, supply: Vec<u64>, demand: Vec<u64>) -> ProblemResult<Self> {
        if costs.len() != supply.len() {
            return Err(ProblemError::DimensionMismatch(format!(
                "cost rows {} != supply len {}",
                costs.len(),
                supply.len()
            )));
        }
        if let Some((i, row)) = costs.iter().find_position(|row| row.len() != demand.len()) {
            return Err(ProblemError::DimensionMismatch(format!(
                "cost row {i} has {} entries, expected {}",
                row.len(),
                demand.len()
            )));
        }
        let rows: IndexSet<String> = (0..supply.len()).map(|i| format!("s{i}")).collect();
        let cols: IndexSet<String> = (0..demand.len()).map(|j| format!("d{j}")).collect();
        let data = costs.into_iter().flatten().collect();
        let matrix = CostMatrix::from_parts(rows, cols, data)?;
        Self::checked(matrix, supply, demand)
    }

    fn checked(costs: CostMatrix<T>, supply: Vec<u64>, demand: Vec<u64>) -> ProblemResult<Self> {
        if let Some(idx) = costs.data().iter().position(|c| !c.is_finite()) {
            return Err(ProblemError::InvalidStructure(format!(
                "non-finite cost at ({}, {})",
                idx / costs.ncols().max(1),
                idx % costs.ncols().max(1)
            )));
        }
        let total_supply = total(&supply)?;
        let total_demand = total(&demand)?;
        if total_supply != total_demand {
            return Err(ProblemError::Unbalanced {
                supply: total_supply,
                demand: total_demand,
            });
        }
        Ok(Self {
            costs,
            supply,
            demand,
        })
    }

    pub fn nrows(&self) -> usize {
        self.supply.len()
    }

    pub fn ncols(&self) -> usize {
        self.demand.len()
    }

    pub fn costs(&self) -> &CostMatrix<T> {
        &self.costs
    }

    pub fn cost(&self, row: usize, col: usize) -> T {
        self.costs.at(row, col)
    }

    pub fn supply(&self) -> &[u64] {
        &self.supply
    }

    pub fn demand(&self) -> &[u64] {
        &self.demand
    }

    pub fn total_supply(&self) -> u64 {
        self.supply.iter().sum()
    }
}

fn total(values: &[u64]) -> ProblemResult<u64> {
    values.iter().try_fold(0u64, |acc, &v| {
        acc.checked_add(v)
            .ok_or_else(|| ProblemError::InvalidStructure("quantity overflow".into()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::balance;

    #[test]
    fn raw_instance_validates() {
        let problem =
            TransportProblem::from_raw(vec![vec![1.0, 2.0], vec![3.0, 4.0]], vec![5, 5], vec![6, 4])
                .unwrap();
        assert_eq!(problem.nrows(), 2);
        assert_eq!(problem.ncols(), 2);
        assert_eq!(problem.cost(1, 0), 3.0);
        assert_eq!(problem.total_supply(), 10);
    }

    #[test]
    fn detects_unbalanced_totals() {
        let err = TransportProblem::from_raw(vec![vec![1.0]], vec![5], vec![4]).unwrap_err();
        assert_eq!(err, ProblemError::Unbalanced { supply: 5, demand: 4 });
    }

    #[test]
    fn detects_ragged_costs() {
        let err = TransportProblem::from_raw(vec![vec![1.0, 2.0], vec![3.0]], vec![1, 1], vec![1, 1])
            .unwrap_err();
        assert!(matches!(err, ProblemError::DimensionMismatch(_)));
    }

    #[test]
    fn detects_nan_cost() {
        let err = TransportProblem::from_raw(vec![vec![f64::NAN]], vec![1], vec![1]).unwrap_err();
        assert!(matches!(err, ProblemError::InvalidStructure(_)));
    }

    #[test]
    fn labels_must_line_up() {
        let rows: IndexSet<String> = ["a".to_string()].into_iter().collect();
        let cols: IndexSet<String> = ["x".to_string()].into_iter().collect();
        let costs = CostMatrix::from_parts(rows, cols, vec![1.0]).unwrap();
        let supply: SupplyVector = [("b".to_string(), 1)].into_iter().collect();
        let demand = balance(&supply, &DemandVector::default()).unwrap();
        let err = TransportProblem::new(costs, &supply, &demand).unwrap_err();
        assert!(matches!(err, ProblemError::DimensionMismatch(_)));
    }
}
