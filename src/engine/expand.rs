use log::trace;

use crate::engine::config::EngineConfig;
use crate::random::{RandomError, RandomSource};
use crate::tree::{Node, NodeKind, Operator};

/// Builds the shape of an equation tree.
///
/// Operator choice and shape never depend on the target value. Every child
/// slot gets its own fair coin: heads expands the child, tails leaves it as a
/// constant leaf, so trees come out ragged rather than complete.
pub struct Expander<'a, R: RandomSource> {
    max_depth: u32,
    operators: &'a [Operator],
    allow_stacked_division: bool,
    rng: &'a mut R,
}

impl<'a, R: RandomSource> Expander<'a, R> {
    pub fn new(config: &'a EngineConfig, rng: &'a mut R) -> Self {
        Self {
            max_depth: config.max_depth,
            operators: config.operators.as_slice(),
            allow_stacked_division: config.allow_stacked_division,
            rng,
        }
    }

    /// Expand `node` in place. The node itself is always expanded unless it
    /// already sits at the maximum depth.
    ///
    /// # Errors
    ///
    /// Returns [`RandomError::EmptyChoiceSet`] if an operator has to be drawn
    /// while no operators are enabled.
    pub fn expand(&mut self, node: &mut Node) -> Result<(), RandomError> {
        self.expand_node(node, false)
    }

    fn expand_node(&mut self, node: &mut Node, division_parent: bool) -> Result<(), RandomError> {
        if node.depth >= self.max_depth {
            return Ok(());
        }

        let operator = match self.draw_operator(division_parent)? {
            Some(operator) => operator,
            None => return Ok(()),
        };
        trace!("Depth {}: drew {:?}", node.depth, operator);

        let depth = node.depth;
        node.kind = match operator {
            Operator::Constant => return Ok(()),
            Operator::Add => self.binary(NodeKind::Add, depth, false)?,
            Operator::Sub => self.binary(NodeKind::Sub, depth, false)?,
            Operator::Mul => self.binary(NodeKind::Mul, depth, false)?,
            Operator::Div => self.binary(NodeKind::Div, depth, true)?,
            Operator::Sin => NodeKind::Sin(Box::new(self.child(depth, false)?)),
            Operator::Cos => NodeKind::Cos(Box::new(self.child(depth, false)?)),
        };

        Ok(())
    }

    /// `None` when the only enabled operator is a fraction and fractions may not stack here
    fn draw_operator(&mut self, division_parent: bool) -> Result<Option<Operator>, RandomError> {
        if division_parent
            && !self.allow_stacked_division
            && self.operators.contains(&Operator::Div)
        {
            let filtered: Vec<Operator> = self
                .operators
                .iter()
                .copied()
                .filter(|op| *op != Operator::Div)
                .collect();
            if filtered.is_empty() {
                return Ok(None);
            }
            return self.rng.choose_one(&filtered).map(|op| Some(*op));
        }

        self.rng.choose_one(self.operators).map(|op| Some(*op))
    }

    fn child(&mut self, parent_depth: u32, division_parent: bool) -> Result<Node, RandomError> {
        let mut child = Node::new(parent_depth + 1);
        if self.rng.coin_flip() {
            self.expand_node(&mut child, division_parent)?;
        }
        Ok(child)
    }

    fn binary(
        &mut self,
        make: fn(Box<Node>, Box<Node>) -> NodeKind,
        parent_depth: u32,
        division_parent: bool,
    ) -> Result<NodeKind, RandomError> {
        let left = self.child(parent_depth, division_parent)?;
        let right = self.child(parent_depth, division_parent)?;
        Ok(make(Box::new(left), Box::new(right)))
    }
}
