use crate::math::RealNumber;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SYNTHETIC_CUSTOMER: &str = "__synthetic__";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("customer '{customer}' has no cost for location '{location}'")]
    MissingCostField { customer: String, location: String },
    #[error("infeasible problem: total demand {demand} exceeds total supply {supply}")]
    Infeasible { supply: u64, demand: u64 },
    #[error("duplicate location '{0}'")]
    DuplicateLocation(String),
    #[error("duplicate customer '{0}'")]
    DuplicateCustomer(String),
    #[error("'{0}' is a reserved name")]
    ReservedName(String),
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
    #[error("quantity overflow while summing {0}")]
    QuantityOverflow(&'static str),
}

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location<T> {
    pub name: String,
    pub capacity: u64,
    pub shipping_cost: T,
    pub general_cost: T,
}

impl<T> Location<T>
where
    T: RealNumber,
{
    pub fn new(name: impl Into<String>, capacity: u64, shipping_cost: T) -> Self {
        Self {
            name: name.into(),
            capacity,
            shipping_cost,
            general_cost: T::zero(),
        }
    }

    pub fn with_general_cost(mut self, general_cost: T) -> Self {
        self.general_cost = general_cost;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer<T> {
    pub name: String,
    pub base_costs: IndexMap<String, T>,
    pub demand: u64,
}

impl<T> Customer<T>
where
    T: RealNumber,
{
    pub fn new(name: impl Into<String>, demand: u64) -> Self {
        Self {
            name: name.into(),
            base_costs: IndexMap::new(),
            demand,
        }
    }

    pub fn cost(mut self, location: impl Into<String>, value: T) -> Self {
        self.base_costs.insert(location.into(), value);
        self
    }

    pub fn base_cost(&self, location: &str) -> Option<T> {
        self.base_costs.get(location).copied()
    }
}

pub fn validate_model<T: RealNumber>(
    locations: &[Location<T>],
    customers: &[Customer<T>],
) -> ModelResult<()> {
    let mut seen = IndexSet::with_capacity(locations.len());
    for location in locations {
        if !seen.insert(location.name.as_str()) {
            return Err(ModelError::DuplicateLocation(location.name.clone()));
        }
        check_cost(
            location.shipping_cost,
            || format!("shippingCost of location '{}'", location.name),
        )?;
    }

    let mut seen = IndexSet::with_capacity(customers.len());
    for customer in customers {
        if customer.name == SYNTHETIC_CUSTOMER {
            return Err(ModelError::ReservedName(customer.name.clone()));
        }
        if !seen.insert(customer.name.as_str()) {
            return Err(ModelError::DuplicateCustomer(customer.name.clone()));
        }
    }
    Ok(())
}

pub(crate) fn check_cost<T, F>(value: T, field: F) -> ModelResult<()>
where
    T: RealNumber,
    F: FnOnce() -> String,
{
    if !value.is_finite() {
        return Err(ModelError::InvalidValue {
            field: field(),
            message: "must be finite".into(),
        });
    }
    if value < T::zero() {
        return Err(ModelError::InvalidValue {
            field: field(),
            message: "must be non-negative".into(),
        });
    }
    Ok(())
}
