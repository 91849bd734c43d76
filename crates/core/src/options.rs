use crate::math::RealNumber;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum InitialMethod {
    #[default]
    LeastCost,
    NorthWest,
    Vogel,
}

impl fmt::Display for InitialMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitialMethod::LeastCost => write!(f, "least-cost"),
            InitialMethod::NorthWest => write!(f, "north-west"),
            InitialMethod::Vogel => write!(f, "vogel"),
        }
    }
}

impl FromStr for InitialMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "least-cost" | "least_cost" | "lc" => Ok(InitialMethod::LeastCost),
            "north-west" | "north_west" | "northwest" | "nw" => Ok(InitialMethod::NorthWest),
            "vogel" | "vam" => Ok(InitialMethod::Vogel),
            other => Err(format!("unknown initial method: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveOptions<T: RealNumber> {
    pub tolerance: T,
    /// Pivot ceiling. `None` derives `8 (m + n)^2 + 64` from the instance.
    pub max_pivots: Option<usize>,
    pub max_time: Option<Duration>,
    pub initial: InitialMethod,
    pub record_history: bool,
}

impl<T> SolveOptions<T>
where
    T: RealNumber,
{
    pub fn with_tolerance(tolerance: T) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    pub fn pivot_limit(&self, rows: usize, cols: usize) -> usize {
        self.max_pivots
            .unwrap_or_else(|| default_pivot_limit(rows, cols))
    }
}

impl<T> Default for SolveOptions<T>
where
    T: RealNumber,
{
    fn default() -> Self {
        Self {
            tolerance: T::from_f64(1e-9).unwrap_or_else(T::epsilon),
            max_pivots: None,
            max_time: None,
            initial: InitialMethod::LeastCost,
            record_history: false,
        }
    }
}

pub fn default_pivot_limit(rows: usize, cols: usize) -> usize {
    let nodes = rows.saturating_add(cols);
    nodes
        .saturating_mul(nodes)
        .saturating_mul(8)
        .saturating_add(64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Scalar;

    #[test]
    fn pivot_limit_grows_quadratically() {
        let options = SolveOptions::<Scalar>::default();
        assert_eq!(options.pivot_limit(2, 3), 8 * 25 + 64);
        let capped = SolveOptions::<Scalar> {
            max_pivots: Some(3),
            ..SolveOptions::default()
        };
        assert_eq!(capped.pivot_limit(100, 100), 3);
    }

    #[test]
    fn initial_method_parses_aliases() {
        assert_eq!("vam".parse::<InitialMethod>(), Ok(InitialMethod::Vogel));
        assert_eq!(
            "North-West".parse::<InitialMethod>(),
            Ok(InitialMethod::NorthWest)
        );
        assert!("simplex".parse::<InitialMethod>().is_err());
        assert_eq!(InitialMethod::LeastCost.to_string(), "least-cost");
    }
}
