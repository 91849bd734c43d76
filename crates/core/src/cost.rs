use crate::math::RealNumber;
use crate::matrix::CostMatrix;
use crate::model::{
    check_cost, validate_model, Customer, Location, ModelError, ModelResult, SYNTHETIC_CUSTOMER,
};
use indexmap::IndexSet;
use itertools::Itertools;
use std::iter;

pub fn build_cost_matrix<T: RealNumber>(
    locations: &[Location<T>],
    customers: &[Customer<T>],
) -> ModelResult<CostMatrix<T>> {
    validate_model(locations, customers)?;

    let rows: IndexSet<String> = locations.iter().map(|loc| loc.name.clone()).collect();
    let cols: IndexSet<String> = customers
        .iter()
        .map(|customer| customer.name.clone())
        .chain(iter::once(SYNTHETIC_CUSTOMER.to_string()))
        .collect();
    let mut matrix = CostMatrix::filled(rows, cols, T::zero());

    for ((i, location), (j, customer)) in locations
        .iter()
        .enumerate()
        .cartesian_product(customers.iter().enumerate())
    {
        let base = customer
            .base_cost(&location.name)
            .ok_or_else(|| ModelError::MissingCostField {
                customer: customer.name.clone(),
                location: location.name.clone(),
            })?;
        check_cost(base, || {
            format!("cost of customer '{}' at '{}'", customer.name, location.name)
        })?;
        matrix.set(i, j, base + location.shipping_cost);
    }

    tracing::debug!(
        locations = matrix.nrows(),
        customers = customers.len(),
        "cost matrix built"
    );
    Ok(matrix)
}
