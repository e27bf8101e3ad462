//! Equation synthesis: expansion, value propagation and the generator facade

mod config;
mod errors;
mod expand;
mod generator;
mod propagate;
mod validation;

pub use config::{EngineConfig, OperatorSet, Toggle};
pub use errors::EngineError;
pub use expand::Expander;
pub use generator::EquationEngine;
pub use propagate::{MAX_DIFFERENCE_OFFSET, MAX_FACTOR_TARGET, Propagator};
pub use validation::{MAX_TARGET, validate_depth, validate_target};

#[cfg(test)]
mod tests;
