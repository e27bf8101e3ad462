use std::collections::VecDeque;

use log::trace;

use crate::random::source::RandomSource;

/// A [`RandomSource`] that replays a fixed sequence of draws.
///
/// Each call to [`RandomSource::uniform_int`] consumes exactly one scripted
/// value, clamped into the requested range. Once the script runs out every
/// draw yields the lower bound, which means coin flips come up tails and
/// choices pick the first option.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    draws: VecDeque<i64>,
    consumed: usize,
}

impl ReplaySource {
    pub fn new(draws: impl IntoIterator<Item = i64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            consumed: 0,
        }
    }

    /// Number of scripted draws not yet consumed
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }

    /// Number of draws requested so far, including those past the end of the script
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl RandomSource for ReplaySource {
    fn uniform_int(&mut self, low: i64, high: i64) -> i64 {
        self.consumed += 1;
        let next = self.draws.pop_front().unwrap_or(low);
        let value = if high <= low { low } else { next.clamp(low, high) };
        trace!("Replayed draw {} in [{}, {}] as {}", next, low, high, value);
        value
    }
}
