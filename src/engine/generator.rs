use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::engine::config::EngineConfig;
use crate::engine::errors::EngineError;
use crate::engine::expand::Expander;
use crate::engine::propagate::Propagator;
use crate::engine::validation::{validate_depth, validate_target};
use crate::random::RandomSource;
use crate::tree::Node;

/// Generates equations that evaluate to a chosen answer
#[derive(Debug, Clone, Default)]
pub struct EquationEngine {
    config: EngineConfig,
}

impl EquationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Expand a fresh tree and propagate `target` through it.
    ///
    /// # Errors
    ///
    /// Fails if `target` or the configured depth is out of range, or if the
    /// tree needs an operator while none are enabled.
    pub fn build_tree<R: RandomSource>(
        &self,
        target: i64,
        rng: &mut R,
    ) -> Result<Node, EngineError> {
        validate_target(target)?;
        validate_depth(self.config.max_depth)?;

        let mut root = Node::new(1);
        Expander::new(&self.config, rng).expand(&mut root)?;
        debug!(
            "Expanded tree: {} nodes, depth {}",
            root.node_count(),
            root.max_depth()
        );

        Propagator::new(rng).propagate(&mut root, target as f64)?;
        Ok(root)
    }

    /// # Errors
    ///
    /// See [`EquationEngine::build_tree`].
    pub fn generate_with<R: RandomSource>(
        &self,
        target: i64,
        rng: &mut R,
    ) -> Result<String, EngineError> {
        let root = self.build_tree(target, rng)?;
        Ok(root.to_latex_with(self.config.style)?)
    }

    /// Generate an equation using the thread-local generator.
    ///
    /// # Errors
    ///
    /// See [`EquationEngine::build_tree`].
    pub fn generate(&self, target: i64) -> Result<String, EngineError> {
        info!(
            "Generating equation for {} with depth {} and operators {:?}",
            target,
            self.config.max_depth,
            self.config.operators.as_slice()
        );
        let mut rng = rand::thread_rng();
        self.generate_with(target, &mut rng)
    }

    /// # Errors
    ///
    /// See [`EquationEngine::build_tree`].
    pub fn generate_seeded(&self, target: i64, seed: u64) -> Result<String, EngineError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate_with(target, &mut rng)
    }

    /// Generate `count` equations in parallel. Equation `i` is seeded with
    /// `seed + i`, so the same arguments always give the same batch.
    ///
    /// # Errors
    ///
    /// Returns an error if any equation in the batch fails.
    pub fn generate_batch(
        &self,
        target: i64,
        count: usize,
        seed: u64,
    ) -> Result<Vec<String>, EngineError> {
        info!(
            "Generating {} equations for {} starting at seed {}",
            count, target, seed
        );

        (0..count)
            .into_par_iter()
            .map(|i| self.generate_seeded(target, seed.wrapping_add(i as u64)))
            .collect()
    }
}
