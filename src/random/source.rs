use rand::Rng;
use rand::rngs::{StdRng, ThreadRng};

use crate::random::errors::RandomError;

/// Uniform sampling over inclusive integer ranges and ordered choice sets.
///
/// Every random decision the engine makes goes through this trait, so a
/// seeded [`StdRng`] or a [`ReplaySource`](crate::random::ReplaySource) makes
/// equation generation fully deterministic.
pub trait RandomSource {
    /// Draw an integer uniformly from `low..=high`.
    ///
    /// An empty range (`high < low`) yields `low`.
    fn uniform_int(&mut self, low: i64, high: i64) -> i64;

    /// Pick one element of `options` uniformly.
    ///
    /// # Errors
    ///
    /// Returns [`RandomError::EmptyChoiceSet`] if `options` is empty, or
    /// [`RandomError::IndexOutOfRange`] if the source produced an index outside
    /// the requested range.
    fn choose_one<'a, T>(&mut self, options: &'a [T]) -> Result<&'a T, RandomError> {
        let last = match options.len().checked_sub(1) {
            Some(last) => last,
            None => return Err(RandomError::EmptyChoiceSet),
        };

        let index = self.uniform_int(0, last as i64);
        usize::try_from(index)
            .ok()
            .and_then(|i| options.get(i))
            .ok_or(RandomError::IndexOutOfRange {
                index,
                len: options.len(),
            })
    }

    /// Fair coin, `true` with probability 1/2.
    fn coin_flip(&mut self) -> bool {
        self.uniform_int(0, 1) == 1
    }
}

#[inline]
fn draw<R: Rng + ?Sized>(rng: &mut R, low: i64, high: i64) -> i64 {
    if high <= low {
        low
    } else {
        rng.gen_range(low..=high)
    }
}

impl RandomSource for StdRng {
    fn uniform_int(&mut self, low: i64, high: i64) -> i64 {
        draw(self, low, high)
    }
}

impl RandomSource for ThreadRng {
    fn uniform_int(&mut self, low: i64, high: i64) -> i64 {
        draw(self, low, high)
    }
}
