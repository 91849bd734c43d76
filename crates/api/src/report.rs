use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tranship_core::balance::{DemandVector, SupplyVector};
use tranship_core::math::RealNumber;
use tranship_core::model::ModelResult;
use tranship_core::solution::{SolveResult, Status};
use tranship_core::stats::SolveStats;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRow<T> {
    pub customer: String,
    pub shipments: IndexMap<String, T>,
    pub total: T,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CapacityRow {
    pub capacities: IndexMap<String, u64>,
    pub total_capacity: u64,
    pub total_demand: u64,
}

impl CapacityRow {
    pub fn label(&self) -> String {
        format!("{} / {}", self.total_capacity, self.total_demand)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportReport<T: RealNumber> {
    pub status: Status,
    pub rows: Vec<CustomerRow<T>>,
    pub capacity: CapacityRow,
    pub total_cost: T,
    pub stats: SolveStats<T>,
}

impl<T> TransportReport<T>
where
    T: RealNumber,
{
    pub fn pivots(&self) -> usize {
        self.stats.pivots
    }

    pub fn row(&self, customer: &str) -> Option<&CustomerRow<T>> {
        self.rows.iter().find(|row| row.customer == customer)
    }
}

pub fn assemble<T: RealNumber>(
    result: &SolveResult<T>,
    supply: &SupplyVector,
    demand: &DemandVector,
) -> ModelResult<TransportReport<T>> {
    let rows = demand
        .real()
        .map(|(customer, _)| {
            let shipments: IndexMap<String, T> = supply
                .labels()
                .map(|location| (location.to_string(), result.shipped(location, customer)))
                .collect();
            let total = shipments.values().fold(T::zero(), |acc, &qty| acc + qty);
            CustomerRow {
                customer: customer.to_string(),
                shipments,
                total,
            }
        })
        .collect();

    let capacity = CapacityRow {
        capacities: supply
            .iter()
            .map(|(location, cap)| (location.to_string(), cap))
            .collect(),
        total_capacity: supply.total()?,
        total_demand: demand.real_total()?,
    };

    Ok(TransportReport {
        status: result.status,
        rows,
        capacity,
        total_cost: result.total_cost,
        stats: result.stats.clone(),
    })
}
