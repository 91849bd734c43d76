use crate::basis::{Basis, Potentials};
use crate::simplex::SolveError;
use itertools::iproduct;
use tranship_core::math::RealNumber;
use tranship_core::problem::TransportProblem;
use tranship_core::solution::Cell;

#[derive(Debug, Clone)]
pub struct Certificate<T> {
    pub potentials: Potentials<T>,
    pub entering: Option<(Cell, T)>,
    pub min_reduced_cost: T,
}

impl<T> Certificate<T>
where
    T: RealNumber,
{
    pub fn is_optimal(&self) -> bool {
        self.entering.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PricingRule {
    #[default]
    Dantzig,
    /// First improving cell in row-major order. Terminates under degeneracy.
    Bland,
}

pub fn price<T: RealNumber>(
    problem: &TransportProblem<T>,
    basis: &Basis,
    tolerance: T,
) -> Certificate<T> {
    price_with(problem, basis, tolerance, PricingRule::Dantzig)
}

pub fn price_with<T: RealNumber>(
    problem: &TransportProblem<T>,
    basis: &Basis,
    tolerance: T,
    rule: PricingRule,
) -> Certificate<T> {
    let potentials = basis.potentials(problem);
    let mut entering: Option<(Cell, T)> = None;
    let mut min_reduced_cost = T::zero();
    for cell in iproduct!(0..problem.nrows(), 0..problem.ncols()) {
        if basis.contains(cell) {
            continue;
        }
        let reduced = potentials.reduced_cost(problem, cell);
        if reduced < min_reduced_cost {
            min_reduced_cost = reduced;
        }
        if reduced >= -tolerance {
            continue;
        }
        let replace = match (rule, entering) {
            (_, None) => true,
            (PricingRule::Dantzig, Some((_, best))) => reduced < best,
            (PricingRule::Bland, Some(_)) => false,
        };
        if replace {
            entering = Some((cell, reduced));
        }
    }
    Certificate {
        potentials,
        entering,
        min_reduced_cost,
    }
}

pub fn certify<T: RealNumber>(
    problem: &TransportProblem<T>,
    basis: &[Cell],
    tolerance: T,
) -> Result<Certificate<T>, SolveError> {
    let (tree, padded) = Basis::spanning(problem.nrows(), problem.ncols(), basis)?;
    if padded > 0 {
        return Err(SolveError::InvalidBasis(format!(
            "basis has {} cells, expected {}",
            basis.len(),
            tree.len()
        )));
    }
    Ok(price(problem, &tree, tolerance))
}
