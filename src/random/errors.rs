use thiserror::Error;

/// Errors raised while sampling
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RandomError {
    #[error("Cannot choose from an empty set of options")]
    EmptyChoiceSet,
    #[error("Drawn index {index} is outside a choice set of length {len}")]
    IndexOutOfRange { index: i64, len: usize },
}
