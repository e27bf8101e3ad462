use log::debug;

use crate::tree::ast::{Node, NodeKind};
use crate::tree::errors::TreeError;

/// How binary operators are parenthesized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    /// Parentheses only where operator precedence requires them
    #[default]
    Precedence,
    /// Every binary operator wrapped in its own pair of parentheses
    FullyParenthesized,
}

/// Slot requirement for fraction and function arguments, which never need parentheses
const ANY_PRECEDENCE: u8 = u8::MAX;

impl Node {
    /// Render with [`RenderStyle::Precedence`].
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnassignedConstant`] if any constant has no value.
    pub fn to_latex(&self) -> Result<String, TreeError> {
        self.to_latex_with(RenderStyle::Precedence)
    }

    /// Render the tree as LaTeX.
    /// - `+` and `-` for addition and subtraction, `\times` for multiplication
    /// - `\frac{top}{bottom}` for division
    /// - `\sin(x)` and `\cos(x)` for the trig functions
    /// - A child is parenthesized when it binds more loosely than its slot allows;
    ///   the right operand of a subtraction only accepts constants and functional forms
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnassignedConstant`] if any constant has no value.
    pub fn to_latex_with(&self, style: RenderStyle) -> Result<String, TreeError> {
        fn wrap_parens(s: String) -> String {
            format!("({})", s)
        }

        fn child(node: &Node, required: u8, style: RenderStyle) -> Result<String, TreeError> {
            let s = fmt(node, style)?;
            if style == RenderStyle::Precedence && node.operator().precedence() > required {
                Ok(wrap_parens(s))
            } else {
                Ok(s)
            }
        }

        fn binary(
            l: &Node,
            r: &Node,
            glyph: &str,
            (lp, rp): (u8, u8),
            style: RenderStyle,
        ) -> Result<String, TreeError> {
            let s = format!(
                "{} {} {}",
                child(l, lp, style)?,
                glyph,
                child(r, rp, style)?
            );
            match style {
                RenderStyle::Precedence => Ok(s),
                RenderStyle::FullyParenthesized => Ok(wrap_parens(s)),
            }
        }

        fn fmt(node: &Node, style: RenderStyle) -> Result<String, TreeError> {
            let own = node.operator().precedence();
            match &node.kind {
                NodeKind::Constant(Some(n)) => Ok(number_to_string(*n)),
                NodeKind::Constant(None) => {
                    Err(TreeError::UnassignedConstant { depth: node.depth })
                }
                NodeKind::Add(l, r) => binary(l, r, "+", (own, own), style),
                NodeKind::Mul(l, r) => binary(l, r, "\\times", (own, own), style),
                NodeKind::Sub(l, r) => binary(l, r, "-", (own, 0), style),
                NodeKind::Div(l, r) => {
                    let top = child(l, ANY_PRECEDENCE, style)?;
                    let bottom = child(r, ANY_PRECEDENCE, style)?;
                    Ok(format!("\\frac{{{}}}{{{}}}", top, bottom))
                }
                NodeKind::Sin(a) => Ok(format!("\\sin({})", child(a, ANY_PRECEDENCE, style)?)),
                NodeKind::Cos(a) => Ok(format!("\\cos({})", child(a, ANY_PRECEDENCE, style)?)),
            }
        }

        let rendered = fmt(self, style)?;
        debug!("Rendered {} nodes as '{}'", self.node_count(), rendered);
        Ok(rendered)
    }
}

pub(crate) fn number_to_string(n: f64) -> String {
    // Integers without trailing .0, other reals in shortest round-tripping form
    if n.fract() == 0.0 && n.is_finite() {
        format!("{}", n.trunc() as i128)
    } else if n.is_infinite() {
        if n.is_sign_positive() {
            String::from("\\infty")
        } else {
            String::from("-\\infty")
        }
    } else if n.is_nan() {
        String::from("\\mathrm{NaN}")
    } else {
        format!("{}", n)
    }
}
