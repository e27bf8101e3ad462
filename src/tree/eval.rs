use log::debug;

use crate::tree::ast::{Node, NodeKind};
use crate::tree::errors::TreeError;

#[inline]
fn is_zero(value: f64) -> bool {
    value.abs() < f64::EPSILON
}

#[inline]
pub(crate) fn is_integer(value: f64) -> bool {
    if !value.is_finite() {
        false
    } else if value.abs() > 2_f64.powi(52) {
        true
    } else {
        (value - value.round()).abs() < f64::EPSILON
    }
}

impl Node {
    /// Compute the numeric value of this subtree.
    ///
    /// # Errors
    ///
    /// Returns an error when a constant has not been assigned a value or a
    /// fraction has a zero denominator.
    pub fn evaluate(&self) -> Result<f64, TreeError> {
        let result = match &self.kind {
            NodeKind::Constant(Some(n)) => Ok(*n),
            NodeKind::Constant(None) => Err(TreeError::UnassignedConstant { depth: self.depth }),
            NodeKind::Add(l, r) => Ok(l.evaluate()? + r.evaluate()?),
            NodeKind::Sub(l, r) => Ok(l.evaluate()? - r.evaluate()?),
            NodeKind::Mul(l, r) => Ok(l.evaluate()? * r.evaluate()?),
            NodeKind::Div(l, r) => {
                let top = l.evaluate()?;
                let bottom = r.evaluate()?;
                if is_zero(bottom) {
                    debug!("Division by zero at depth {}", self.depth);
                    Err(TreeError::DivisionByZero)
                } else {
                    Ok(top / bottom)
                }
            }
            NodeKind::Sin(a) => Ok(a.evaluate()?.sin()),
            NodeKind::Cos(a) => Ok(a.evaluate()?.cos()),
        };

        if let Err(e) = &result {
            debug!("Evaluation failed at depth {}: {}", self.depth, e);
        }

        result
    }
}
