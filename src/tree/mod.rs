//! Equation tree: node model, evaluation, LaTeX rendering and parsing

mod ast;
mod errors;
mod eval;
mod latex;
pub mod markup;

pub use ast::{Node, NodeIter, NodeKind, Operator};
pub use errors::TreeError;
pub use latex::RenderStyle;

pub(crate) use eval::is_integer;
