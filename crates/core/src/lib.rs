#![forbid(unsafe_code)]

pub mod balance;
pub mod cost;
pub mod math;
pub mod matrix;
pub mod model;
pub mod options;
pub mod problem;
pub mod solution;
pub mod stats;
pub mod traits;

pub use balance::*;
pub use cost::*;
pub use math::*;
pub use matrix::*;
pub use model::*;
pub use options::*;
pub use problem::*;
pub use solution::*;
pub use stats::*;
pub use traits::*;
