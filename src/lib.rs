//! Unsolver - A library for generating equations with a known answer
//!
//! This library builds random arithmetic expression trees, pushes a chosen
//! answer down through them so that every leaf gets a concrete value, and
//! renders the result as LaTeX for "guess the equation" puzzles.

pub mod engine;
pub mod random;
pub mod tree;

// Re-export the main public API
pub use engine::{EngineConfig, EngineError, EquationEngine, OperatorSet, Toggle};
pub use random::{RandomError, RandomSource, ReplaySource};
pub use tree::{Node, NodeKind, Operator, RenderStyle, TreeError};

/// Generate a LaTeX equation that evaluates to `target`
///
/// Operators are drawn from `operators` for every node above `max_depth`.
/// Fractions may be nested inside fractions. Parentheses are only placed where
/// precedence needs them, so a product at the root renders as `2 \times 3`
/// rather than `(2 \times 3)`. Use [`EngineConfig::with_style`] with
/// [`RenderStyle::FullyParenthesized`] to wrap every operation.
///
/// # Arguments
///
/// * `target` - The answer the equation must evaluate to, at least 1
/// * `max_depth` - Depth at which tree expansion stops; 1 yields a bare number
/// * `operators` - The operators the generator may use
///
/// # Errors
///
/// This function will return an error if:
/// * `target` is not positive or `max_depth` is zero
/// * `operators` is empty while `max_depth` is greater than 1
///
/// # Examples
///
/// ```
/// use unsolver::{Operator, get_equation};
///
/// // Depth 1 never expands, so the answer comes back as-is
/// assert_eq!(get_equation(42, 1, &[]).ok(), Some("42".to_string()));
///
/// match get_equation(42, 3, &[Operator::Add, Operator::Mul]) {
///     Ok(latex) => println!("{}", latex),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub fn get_equation(
    target: i64,
    max_depth: u32,
    operators: &[Operator],
) -> Result<String, EngineError> {
    let engine = EquationEngine::new(EngineConfig::new(max_depth, operators.iter().copied()));
    engine.generate(target)
}

/// Generate an equation from toggle names such as `allowAdd` or `allowStackedDiv`
///
/// Unknown toggle names are logged and ignored.
///
/// # Errors
///
/// Same as [`get_equation`].
///
/// # Examples
///
/// ```
/// use unsolver::get_equation_from_toggles;
///
/// // 12 always has a proper divisor, so the root becomes a product
/// let latex = get_equation_from_toggles(12, 2, &["allowMul"]);
/// assert!(latex.is_ok_and(|l| l.contains("\\times")));
///
/// // 7 does not, so it stays a bare number
/// assert_eq!(
///     get_equation_from_toggles(7, 2, &["allowMul"]).ok(),
///     Some("7".to_string())
/// );
/// ```
pub fn get_equation_from_toggles<S: AsRef<str>>(
    target: i64,
    max_depth: u32,
    toggles: &[S],
) -> Result<String, EngineError> {
    let engine = EquationEngine::new(EngineConfig::from_toggles(max_depth, toggles));
    engine.generate(target)
}
