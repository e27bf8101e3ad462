use std::str::FromStr;

use log::{debug, warn};

use crate::engine::errors::EngineError;
use crate::tree::{Operator, RenderStyle};

/// Feature toggles accepted by [`EngineConfig::from_toggles`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    AllowAdd,
    AllowSub,
    AllowMul,
    AllowDiv,
    AllowSin,
    AllowCos,
    AllowStackedDiv,
}

impl Toggle {
    /// The operator this toggle enables, if it enables one
    pub fn operator(self) -> Option<Operator> {
        match self {
            Toggle::AllowAdd => Some(Operator::Add),
            Toggle::AllowSub => Some(Operator::Sub),
            Toggle::AllowMul => Some(Operator::Mul),
            Toggle::AllowDiv => Some(Operator::Div),
            Toggle::AllowSin => Some(Operator::Sin),
            Toggle::AllowCos => Some(Operator::Cos),
            Toggle::AllowStackedDiv => None,
        }
    }
}

impl FromStr for Toggle {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allowAdd" => Ok(Toggle::AllowAdd),
            "allowSub" => Ok(Toggle::AllowSub),
            "allowMul" => Ok(Toggle::AllowMul),
            "allowDiv" => Ok(Toggle::AllowDiv),
            "allowSin" => Ok(Toggle::AllowSin),
            "allowCos" => Ok(Toggle::AllowCos),
            "allowStackedDiv" => Ok(Toggle::AllowStackedDiv),
            _ => Err(EngineError::UnknownToggle(s.to_string())),
        }
    }
}

/// Ordered, duplicate-free set of operators the expander draws from.
///
/// Only operators that own children can be enabled; `Operator::Constant` is
/// never inserted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OperatorSet(Vec<Operator>);

impl OperatorSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// `+`, `-`, `\times` and fractions
    pub fn arithmetic() -> Self {
        [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div]
            .into_iter()
            .collect()
    }

    /// Returns `false` if the operator was already present or is `Constant`
    pub fn insert(&mut self, operator: Operator) -> bool {
        if operator == Operator::Constant || self.0.contains(&operator) {
            return false;
        }
        self.0.push(operator);
        true
    }

    pub fn contains(&self, operator: Operator) -> bool {
        self.0.contains(&operator)
    }

    pub fn as_slice(&self) -> &[Operator] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Operator> for OperatorSet {
    fn from_iter<I: IntoIterator<Item = Operator>>(iter: I) -> Self {
        let mut set = OperatorSet::new();
        for operator in iter {
            set.insert(operator);
        }
        set
    }
}

/// Configuration for equation generation
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Depth at which expansion stops; the root sits at depth 1
    pub max_depth: u32,
    pub operators: OperatorSet,
    /// Whether a fraction may appear directly inside another fraction
    pub allow_stacked_division: bool,
    pub style: RenderStyle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            operators: OperatorSet::arithmetic(),
            allow_stacked_division: false,
            style: RenderStyle::Precedence,
        }
    }
}

impl EngineConfig {
    /// Draw freely from `operators`, stacked fractions included
    pub fn new(max_depth: u32, operators: impl IntoIterator<Item = Operator>) -> Self {
        Self {
            max_depth,
            operators: operators.into_iter().collect(),
            allow_stacked_division: true,
            style: RenderStyle::Precedence,
        }
    }

    /// Build a configuration from toggle names such as `allowAdd` or
    /// `allowStackedDiv`. Unknown names are logged and skipped.
    pub fn from_toggles<I, S>(max_depth: u32, toggles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self {
            max_depth,
            operators: OperatorSet::new(),
            allow_stacked_division: false,
            style: RenderStyle::Precedence,
        };

        for name in toggles {
            match name.as_ref().parse::<Toggle>() {
                Ok(toggle) => config.apply(toggle),
                Err(e) => warn!("Ignoring toggle: {}", e),
            }
        }

        debug!("Configuration from toggles: {:?}", config);
        config
    }

    pub fn apply(&mut self, toggle: Toggle) {
        match toggle.operator() {
            Some(operator) => {
                self.operators.insert(operator);
            }
            None => self.allow_stacked_division = true,
        }
    }

    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_stacked_division(mut self, allow: bool) -> Self {
        self.allow_stacked_division = allow;
        self
    }
}
