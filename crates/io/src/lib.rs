#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tranship_api::{Customer, Location, TransportError, TransportInstance, TransportReport};
use tranship_core::math::Scalar;
use tranship_core::model::{ModelError, ModelResult};
use tranship_core::solution::Status;
use tranship_core::stats::SolveStats;

pub const CUSTOMER_KEY: &str = "CLIENTE";
pub const DEMAND_KEY: &str = "DEMANDA";
pub const CAPACITY_ROW: &str = "CAPACIDAD";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidCombination {
    #[serde(default)]
    pub combination: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub capacity: u64,
    #[serde(default)]
    pub cost: Scalar,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerRecord {
    pub client: String,
    pub demand: u64,
    /// Remaining keys. Numeric ones are base costs keyed by location name,
    /// anything else is ignored.
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,
}

impl CustomerRecord {
    pub fn costs(&self) -> IndexMap<String, Scalar> {
        self.fields
            .iter()
            .filter_map(|(key, value)| value.as_f64().map(|cost| (key.clone(), cost)))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub location: String,
    pub capacity: u64,
    pub shipping_cost: Scalar,
    #[serde(default)]
    pub general_cost: Scalar,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransportationRequest {
    #[serde(default)]
    pub valid_combinations: Vec<ValidCombination>,
    pub customers: Vec<CustomerRecord>,
    pub locations: Vec<LocationRecord>,
}

impl TransportationRequest {
    pub fn into_instance(self) -> ModelResult<TransportInstance<Scalar>> {
        let locations = self
            .locations
            .into_iter()
            .map(|record| {
                if record.location == CUSTOMER_KEY || record.location == DEMAND_KEY {
                    return Err(ModelError::ReservedName(record.location));
                }
                Ok(Location::new(record.location, record.capacity, record.shipping_cost)
                    .with_general_cost(record.general_cost))
            })
            .collect::<ModelResult<Vec<_>>>()?;
        let customers = self
            .customers
            .into_iter()
            .map(|record| Customer {
                base_costs: record.costs(),
                name: record.client,
                demand: record.demand,
            })
            .collect();
        Ok(TransportInstance {
            locations,
            customers,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportationResponse {
    pub status: Status,
    pub matrix: Vec<IndexMap<String, Value>>,
    pub total_cost: Scalar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<SolveStats<Scalar>>,
}

impl TransportationResponse {
    pub fn from_report(report: &TransportReport<Scalar>, with_stats: bool) -> Self {
        let mut matrix: Vec<IndexMap<String, Value>> = report
            .rows
            .iter()
            .map(|row| {
                let mut entry = IndexMap::with_capacity(row.shipments.len() + 2);
                entry.insert(CUSTOMER_KEY.to_string(), Value::from(row.customer.as_str()));
                for (location, &qty) in &row.shipments {
                    entry.insert(location.clone(), Value::from(qty));
                }
                entry.insert(DEMAND_KEY.to_string(), Value::from(row.total));
                entry
            })
            .collect();

        let capacity = &report.capacity;
        let mut entry = IndexMap::with_capacity(capacity.capacities.len() + 2);
        entry.insert(CUSTOMER_KEY.to_string(), Value::from(CAPACITY_ROW));
        for (location, &cap) in &capacity.capacities {
            entry.insert(location.clone(), Value::from(cap));
        }
        entry.insert(DEMAND_KEY.to_string(), Value::from(capacity.label()));
        matrix.push(entry);

        Self {
            status: report.status,
            matrix,
            total_cost: report.total_cost,
            stats: with_stats.then(|| report.stats.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub detail: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub const STATUS_CODE: u16 = 500;

    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            status_code: Self::STATUS_CODE,
        }
    }
}

impl From<&TransportError> for ErrorResponse {
    fn from(err: &TransportError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<&anyhow::Error> for ErrorResponse {
    fn from(err: &anyhow::Error) -> Self {
        // Prefer the solver's own message over the context chain.
        match err.downcast_ref::<TransportError>() {
            Some(inner) => inner.into(),
            None => Self::new(format!("{err:#}")),
        }
    }
}

pub fn parse_request(contents: &str) -> Result<TransportationRequest> {
    serde_json::from_str(contents).context("failed to parse transportation request")
}

pub fn read_request<P: AsRef<Path>>(path: P) -> Result<TransportationRequest> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("failed to open {:?}", path))?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader
        .read_to_string(&mut contents)
        .with_context(|| format!("failed to read {:?}", path))?;
    parse_request(&contents).with_context(|| format!("invalid request in {:?}", path))
}

pub fn write_response<P: AsRef<Path>>(path: P, response: &TransportationResponse) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create parent directory {:?}", parent))?;
        }
    }

    let file = File::create(path).with_context(|| format!("failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, response).context("failed to serialise response")?;
    writer
        .flush()
        .with_context(|| format!("failed to write response into {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tranship_api::{solve_transportation, ErrorKind, SolveOptions};

    const REQUEST: &str = r#"{
        "validCombinations": [
            {"combination": "C1", "description": "Cleveland only", "capacity": 100, "cost": 250}
        ],
        "customers": [
            {"client": "Acme", "Cleveland": 3, "Chicago": 6.0, "demand": 80},
            {"client": "Bolt", "Cleveland": 5.0, "Chicago": 3, "demand": 40}
        ],
        "locations": [
            {"location": "Cleveland", "capacity": 100, "shippingCost": 1.0, "generalCost": 250},
            {"location": "Chicago", "capacity": 50, "shippingCost": 2}
        ]
    }"#;

    fn solve(request: TransportationRequest) -> TransportationResponse {
        let instance = request.into_instance().unwrap();
        let report = solve_transportation(
            &instance.locations,
            &instance.customers,
            SolveOptions::default(),
        )
        .unwrap();
        TransportationResponse::from_report(&report, false)
    }

    #[test]
    fn parses_flattened_customer_costs() {
        let request = parse_request(REQUEST).unwrap();
        assert_eq!(request.valid_combinations.len(), 1);
        let acme = &request.customers[0];
        assert_eq!(acme.demand, 80);
        let costs = acme.costs();
        assert_eq!(costs.keys().collect::<Vec<_>>(), ["Cleveland", "Chicago"]);
        assert_eq!(costs["Cleveland"], 3.0);
        assert_eq!(request.locations[1].general_cost, 0.0);
    }

    #[test]
    fn non_numeric_customer_fields_are_ignored() {
        let request = parse_request(
            r#"{
                "customers": [
                    {"client": "Acme", "region": "north", "priority": null,
                     "Cleveland": 3, "Chicago": 6.0, "demand": 80}
                ],
                "locations": [
                    {"location": "Cleveland", "capacity": 100, "shippingCost": 1.0},
                    {"location": "Chicago", "capacity": 50, "shippingCost": 2.0}
                ]
            }"#,
        )
        .unwrap();
        let instance = request.into_instance().unwrap();
        let acme = &instance.customers[0];
        assert_eq!(acme.base_costs.len(), 2);
        assert_eq!(acme.base_cost("Chicago"), Some(6.0));
        assert_eq!(acme.base_cost("region"), None);

        let report =
            solve_transportation(&instance.locations, &instance.customers, SolveOptions::default())
                .unwrap();
        assert_relative_eq!(report.total_cost, 320.0);
    }

    #[test]
    fn valid_combinations_are_optional() {
        let request = parse_request(r#"{"customers": [], "locations": []}"#).unwrap();
        assert!(request.valid_combinations.is_empty());
    }

    #[test]
    fn response_rows_follow_request_order() {
        let response = solve(parse_request(REQUEST).unwrap());
        assert_eq!(response.status, Status::Optimal);
        assert_relative_eq!(response.total_cost, 520.0);
        assert_eq!(response.matrix.len(), 3);

        let keys: Vec<&str> = response.matrix[0].keys().map(String::as_str).collect();
        assert_eq!(keys, [CUSTOMER_KEY, "Cleveland", "Chicago", DEMAND_KEY]);
        assert_eq!(response.matrix[0][CUSTOMER_KEY], "Acme");
        assert_eq!(response.matrix[1]["Chicago"], 40.0);
        assert_eq!(response.matrix[1]["Cleveland"], 0.0);
        assert_eq!(response.matrix[1][DEMAND_KEY], 40.0);
        assert_eq!(response.matrix[0][DEMAND_KEY], 80.0);

        let capacity = &response.matrix[2];
        assert_eq!(capacity[CUSTOMER_KEY], CAPACITY_ROW);
        assert_eq!(capacity["Cleveland"], 100);
        assert_eq!(capacity[DEMAND_KEY], "150 / 120");
    }

    #[test]
    fn serialized_response_omits_stats_unless_asked() {
        let response = solve(parse_request(REQUEST).unwrap());
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("stats").is_none());
        assert_eq!(json["matrix"][2]["DEMANDA"], "150 / 120");
    }

    #[test]
    fn reserved_location_names_are_rejected() {
        let mut request = parse_request(REQUEST).unwrap();
        request.locations[0].location = DEMAND_KEY.to_string();
        let err = request.into_instance().unwrap_err();
        assert_eq!(err, ModelError::ReservedName(DEMAND_KEY.to_string()));
    }

    #[test]
    fn error_body_carries_solver_message() {
        let mut request = parse_request(REQUEST).unwrap();
        request.customers[0].demand = 1000;
        let instance = request.into_instance().unwrap();
        let err = solve_transportation(
            &instance.locations,
            &instance.customers,
            SolveOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Infeasible);

        let wrapped = anyhow::Error::new(err).context("solve failed");
        let body = ErrorResponse::from(&wrapped);
        assert_eq!(body.status_code, 500);
        assert!(body.detail.starts_with("infeasible problem"));
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.starts_with(r#"{"detail":"#));
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = read_request("does/not/exist.json").unwrap_err();
        assert!(format!("{err:#}").contains("exist.json"));
    }
}
