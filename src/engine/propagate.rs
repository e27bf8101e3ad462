use log::{debug, trace};

use crate::engine::errors::EngineError;
use crate::random::{RandomError, RandomSource};
use crate::tree::{Node, NodeKind, TreeError, is_integer};

/// Largest value the divisor search will try to factor
pub const MAX_FACTOR_TARGET: f64 = 1e12;

/// Largest offset a difference split will draw. Values past it still split,
/// with the offset range capped so the integer arithmetic cannot overflow.
pub const MAX_DIFFERENCE_OFFSET: i64 = 1 << 53;

/// Pushes a target value down an expanded tree.
///
/// Each operator node picks child values that recombine to its own value,
/// then its children are visited once, left to right. When an operator has no
/// valid split for its value the node becomes a constant holding that value.
pub struct Propagator<'a, R: RandomSource> {
    rng: &'a mut R,
}

impl<'a, R: RandomSource> Propagator<'a, R> {
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }

    /// # Errors
    ///
    /// Returns [`TreeError::AlreadyAssigned`] if the subtree contains a
    /// constant that already holds a value.
    pub fn propagate(&mut self, node: &mut Node, value: f64) -> Result<(), EngineError> {
        trace!("Depth {}: {:?} <- {}", node.depth, node.operator(), value);

        let depth = node.depth;
        let resolved = match &mut node.kind {
            NodeKind::Constant(slot) => {
                if slot.is_some() {
                    return Err(TreeError::AlreadyAssigned { depth }.into());
                }
                *slot = Some(value);
                true
            }
            NodeKind::Add(l, r) => match split_sum(self.rng, value) {
                Some(parts) => self.propagate_pair(l, r, parts)?,
                None => false,
            },
            NodeKind::Sub(l, r) => {
                let parts = split_difference(self.rng, value);
                self.propagate_pair(l, r, parts)?
            }
            NodeKind::Mul(l, r) => match split_product(self.rng, value)? {
                Some(parts) => self.propagate_pair(l, r, parts)?,
                None => false,
            },
            NodeKind::Div(l, r) => match split_quotient(value) {
                Some(parts) => self.propagate_pair(l, r, parts)?,
                None => false,
            },
            NodeKind::Sin(a) => self.propagate_inverse(a, value, f64::asin)?,
            NodeKind::Cos(a) => self.propagate_inverse(a, value, f64::acos)?,
        };

        if !resolved {
            debug!("Depth {}: no split for {}, keeping a constant", depth, value);
            node.assign(value);
        }
        Ok(())
    }

    fn propagate_pair(
        &mut self,
        left: &mut Node,
        right: &mut Node,
        (left_value, right_value): (f64, f64),
    ) -> Result<bool, EngineError> {
        self.propagate(left, left_value)?;
        self.propagate(right, right_value)?;
        Ok(true)
    }

    /// `false` when `value` lies outside the domain of `inverse`
    fn propagate_inverse(
        &mut self,
        child: &mut Node,
        value: f64,
        inverse: fn(f64) -> f64,
    ) -> Result<bool, EngineError> {
        if !(-1.0..=1.0).contains(&value) {
            return Ok(false);
        }
        self.propagate(child, inverse(value))?;
        Ok(true)
    }
}

/// `left` drawn from `[1, ⌊value⌋ - 1]`, `right` the remainder. `None` below 2.
pub(crate) fn split_sum<R: RandomSource>(rng: &mut R, value: f64) -> Option<(f64, f64)> {
    if value.is_nan() || value < 2.0 {
        return None;
    }
    let left = rng.uniform_int(1, value.floor() as i64 - 1) as f64;
    Some((left, value - left))
}

/// `left` drawn from `[value + 1, 2 * value]` for integer values, `right = left - value`.
/// Real values draw the offset `right` from `[1, max(1, ⌊value⌋)]`. The offset never
/// exceeds [`MAX_DIFFERENCE_OFFSET`].
pub(crate) fn split_difference<R: RandomSource>(rng: &mut R, value: f64) -> (f64, f64) {
    let base = (value.floor() as i64).min(MAX_DIFFERENCE_OFFSET);
    let offset = rng.uniform_int(base + 1, base + base.max(1)) - base;
    let right = offset as f64;
    (value + right, right)
}

/// A uniformly chosen proper divisor and its cofactor, if `value` has one
pub(crate) fn split_product<R: RandomSource>(
    rng: &mut R,
    value: f64,
) -> Result<Option<(f64, f64)>, RandomError> {
    if !is_integer(value) || !(4.0..=MAX_FACTOR_TARGET).contains(&value) {
        return Ok(None);
    }

    let n = value as u64;
    let divisors = proper_divisors(n);
    if divisors.is_empty() {
        return Ok(None);
    }

    let left = *rng.choose_one(&divisors)?;
    Ok(Some((left as f64, (n / left) as f64)))
}

/// Numerator and denominator with `bottom = ⌈√value⌉ + 1`. `None` once the
/// numerator is no longer finite.
pub(crate) fn split_quotient(value: f64) -> Option<(f64, f64)> {
    let bottom = value.max(0.0).sqrt().ceil() + 1.0;
    let top = value * bottom;
    top.is_finite().then_some((top, bottom))
}

/// Divisors of `n` strictly between 1 and `n`, ascending
pub(crate) fn proper_divisors(n: u64) -> Vec<u64> {
    let mut small = Vec::new();
    let mut large = Vec::new();

    let mut i = 2;
    while i * i <= n {
        if n % i == 0 {
            small.push(i);
            if i != n / i {
                large.push(n / i);
            }
        }
        i += 1;
    }

    small.extend(large.into_iter().rev());
    small
}
