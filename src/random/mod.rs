//! Sampling primitives shared by the expander and the propagator

mod errors;
mod replay;
mod source;

pub use errors::RandomError;
pub use replay::ReplaySource;
pub use source::RandomSource;
