use thiserror::Error;

use crate::random::RandomError;
use crate::tree::TreeError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Target must be an integer between 1 and {max}, got {target}")]
    InvalidTarget { target: i64, max: i64 },
    #[error("Maximum depth must be at least 1, got {0}")]
    InvalidDepth(u32),
    #[error("Unknown toggle: {0}")]
    UnknownToggle(String),
    #[error("Random source error: {0}")]
    RandomError(#[from] RandomError),
    #[error("Tree error: {0}")]
    TreeError(#[from] TreeError),
}
