use crate::math::RealNumber;
use crate::model::{Customer, Location, ModelError, ModelResult, SYNTHETIC_CUSTOMER};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

fn checked_total<'a, I>(values: I, what: &'static str) -> ModelResult<u64>
where
    I: IntoIterator<Item = &'a u64>,
{
    values.into_iter().try_fold(0u64, |acc, &value| {
        acc.checked_add(value)
            .ok_or(ModelError::QuantityOverflow(what))
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupplyVector {
    capacities: IndexMap<String, u64>,
}

impl SupplyVector {
    pub fn from_locations<T: RealNumber>(locations: &[Location<T>]) -> Self {
        Self {
            capacities: locations
                .iter()
                .map(|loc| (loc.name.clone(), loc.capacity))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.capacities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capacities.is_empty()
    }

    pub fn get(&self, location: &str) -> Option<u64> {
        self.capacities.get(location).copied()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.capacities.keys().map(String::as_str)
    }

    pub fn quantities(&self) -> Vec<u64> {
        self.capacities.values().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.capacities.iter().map(|(name, &cap)| (name.as_str(), cap))
    }

    pub fn total(&self) -> ModelResult<u64> {
        checked_total(self.capacities.values(), "supply")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DemandVector {
    demands: IndexMap<String, u64>,
    synthetic: Option<u64>,
}

impl DemandVector {
    pub fn from_customers<T: RealNumber>(customers: &[Customer<T>]) -> Self {
        Self {
            demands: customers
                .iter()
                .map(|customer| (customer.name.clone(), customer.demand))
                .collect(),
            synthetic: None,
        }
    }

    pub fn len(&self) -> usize {
        self.demands.len() + usize::from(self.synthetic.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_balanced(&self) -> bool {
        self.synthetic.is_some()
    }

    pub fn synthetic(&self) -> Option<u64> {
        self.synthetic
    }

    pub fn get(&self, customer: &str) -> Option<u64> {
        if customer == SYNTHETIC_CUSTOMER {
            return self.synthetic;
        }
        self.demands.get(customer).copied()
    }

    pub fn real(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.demands.iter().map(|(name, &qty)| (name.as_str(), qty))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.demands
            .keys()
            .map(String::as_str)
            .chain(self.synthetic.map(|_| SYNTHETIC_CUSTOMER))
    }

    pub fn quantities(&self) -> Vec<u64> {
        self.demands
            .values()
            .copied()
            .chain(self.synthetic)
            .collect()
    }

    pub fn real_total(&self) -> ModelResult<u64> {
        checked_total(self.demands.values(), "demand")
    }

    pub fn total(&self) -> ModelResult<u64> {
        checked_total(
            self.demands.values().chain(self.synthetic.as_ref()),
            "demand",
        )
    }
}

/// The synthetic entry is added even when the surplus is zero.
pub fn balance(supply: &SupplyVector, demand: &DemandVector) -> ModelResult<DemandVector> {
    let total_supply = supply.total()?;
    let total_demand = demand.real_total()?;
    let surplus = total_supply
        .checked_sub(total_demand)
        .ok_or(ModelError::Infeasible {
            supply: total_supply,
            demand: total_demand,
        })?;

    tracing::debug!(total_supply, total_demand, surplus, "problem balanced");
    Ok(DemandVector {
        demands: demand.demands.clone(),
        synthetic: Some(surplus),
    })
}

pub fn balanced_vectors<T: RealNumber>(
    locations: &[Location<T>],
    customers: &[Customer<T>],
) -> ModelResult<(SupplyVector, DemandVector)> {
    let supply = SupplyVector::from_locations(locations);
    let demand = balance(&supply, &DemandVector::from_customers(customers))?;
    Ok((supply, demand))
}

impl FromIterator<(String, u64)> for SupplyVector {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            capacities: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<(String, u64)> for DemandVector {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            demands: iter.into_iter().collect(),
            synthetic: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supply(values: &[(&str, u64)]) -> SupplyVector {
        values
            .iter()
            .map(|(name, qty)| (name.to_string(), *qty))
            .collect()
    }

    fn demand(values: &[(&str, u64)]) -> DemandVector {
        values
            .iter()
            .map(|(name, qty)| (name.to_string(), *qty))
            .collect()
    }

    #[test]
    fn surplus_goes_to_synthetic_customer() {
        let s = supply(&[("Cleveland", 100), ("Chicago", 50)]);
        let d = demand(&[("Acme", 80), ("Bolt", 40)]);
        let balanced = balance(&s, &d).unwrap();
        assert_eq!(balanced.synthetic(), Some(30));
        assert_eq!(balanced.get(SYNTHETIC_CUSTOMER), Some(30));
        assert_eq!(balanced.total().unwrap(), s.total().unwrap());
        assert_eq!(
            balanced.labels().collect::<Vec<_>>(),
            vec!["Acme", "Bolt", SYNTHETIC_CUSTOMER]
        );
    }

    #[test]
    fn exact_balance_keeps_zero_synthetic() {
        let s = supply(&[("Cleveland", 60)]);
        let d = demand(&[("Acme", 60)]);
        let balanced = balance(&s, &d).unwrap();
        assert_eq!(balanced.synthetic(), Some(0));
        assert_eq!(balanced.quantities(), vec![60, 0]);
    }

    #[test]
    fn excess_demand_is_infeasible() {
        let s = supply(&[("Cleveland", 10)]);
        let d = demand(&[("Acme", 7), ("Bolt", 5)]);
        assert_eq!(
            balance(&s, &d).unwrap_err(),
            ModelError::Infeasible {
                supply: 10,
                demand: 12
            }
        );
    }

    #[test]
    fn rebalancing_replaces_previous_synthetic() {
        let s = supply(&[("Cleveland", 10)]);
        let once = balance(&s, &demand(&[("Acme", 4)])).unwrap();
        let twice = balance(&s, &once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn overflow_is_reported() {
        let s = supply(&[("a", u64::MAX), ("b", 1)]);
        assert_eq!(
            s.total().unwrap_err(),
            ModelError::QuantityOverflow("supply")
        );
    }
}
