#![forbid(unsafe_code)]

pub mod basis;
pub mod certificate;
pub mod initial;
pub mod simplex;
pub mod stopping;

pub use basis::{Basis, Potentials};
pub use certificate::{certify, price, price_with, Certificate, PricingRule};
pub use initial::{initial_solution, LeastCost, NorthWest, Vogel};
pub use simplex::{SolveError, TransportSimplex};
pub use stopping::{InterruptFlag, TimeLimit};
