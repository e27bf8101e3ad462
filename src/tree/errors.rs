use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Constant at depth {depth} was never assigned a value")]
    UnassignedConstant { depth: u32 },
    #[error("Constant at depth {depth} already holds a value")]
    AlreadyAssigned { depth: u32 },
    #[error("Failed to tokenize markup at: '{0}'")]
    Tokenize(String),
    #[error("Unexpected token in markup: {0}")]
    UnexpectedToken(String),
    #[error("Unexpected end of markup")]
    UnexpectedEnd,
    #[error("Invalid number in markup: {0}")]
    InvalidNumber(String),
}
