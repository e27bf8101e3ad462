use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::engine::{
    EngineConfig, EngineError, EquationEngine, Expander, MAX_DIFFERENCE_OFFSET, MAX_TARGET,
    OperatorSet, Propagator, Toggle,
};
use crate::random::{RandomError, ReplaySource};
use crate::tree::markup::parse;
use crate::tree::{Node, NodeKind, Operator, RenderStyle, TreeError};

const TARGETS: [i64; 10] = [1, 2, 3, 7, 12, 42, 97, 360, 1000, 65536];

fn close_to(value: f64, target: f64) -> bool {
    (value - target).abs() <= 1e-9 * target.abs().max(1.0)
}

fn engine(max_depth: u32, operators: &[Operator]) -> EquationEngine {
    EquationEngine::new(EngineConfig::new(max_depth, operators.iter().copied()))
}

fn all_operators() -> Vec<Operator> {
    vec![
        Operator::Add,
        Operator::Sub,
        Operator::Mul,
        Operator::Div,
        Operator::Sin,
        Operator::Cos,
    ]
}

fn leaf_pair(make: fn(Box<Node>, Box<Node>) -> NodeKind) -> Node {
    Node {
        depth: 1,
        kind: make(Box::new(Node::new(2)), Box::new(Node::new(2))),
    }
}

fn leaf_unary(make: fn(Box<Node>) -> NodeKind) -> Node {
    Node {
        depth: 1,
        kind: make(Box::new(Node::new(2))),
    }
}

#[test]
fn test_single_constant_at_depth_one() {
    let engine = engine(1, &[]);
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(engine.generate_with(42, &mut rng), Ok("42".to_string()));
}

#[test]
fn test_forced_divisor_renders_product() {
    let engine = engine(2, &[Operator::Mul]);
    // operator, two coin flips, divisor index
    let mut rng = ReplaySource::new([0, 0, 0, 0]);
    assert_eq!(
        engine.generate_with(6, &mut rng),
        Ok("2 \\times 3".to_string())
    );

    let parenthesized = EquationEngine::new(
        EngineConfig::new(2, [Operator::Mul]).with_style(RenderStyle::FullyParenthesized),
    );
    let mut rng = ReplaySource::new([0, 0, 0, 0]);
    assert_eq!(
        parenthesized.generate_with(6, &mut rng),
        Ok("(2 \\times 3)".to_string())
    );
}

#[test]
fn test_add_fallback_for_one() {
    let engine = engine(2, &[Operator::Add]);
    for seed in 0..50 {
        assert_eq!(engine.generate_seeded(1, seed), Ok("1".to_string()));
    }
}

#[test]
fn test_empty_operator_set_fails_fast() {
    let engine = engine(3, &[]);
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(
        engine.generate_with(42, &mut rng),
        Err(EngineError::RandomError(RandomError::EmptyChoiceSet))
    );
}

#[test]
fn test_invalid_target() {
    let engine = engine(3, &[Operator::Add]);
    for target in [0, -5, MAX_TARGET + 1] {
        assert!(matches!(
            engine.generate_seeded(target, 0),
            Err(EngineError::InvalidTarget { .. })
        ));
    }
    assert!(engine.generate_seeded(MAX_TARGET, 0).is_ok());
}

#[test]
fn test_invalid_depth() {
    let engine = engine(0, &[Operator::Add]);
    assert_eq!(
        engine.generate_seeded(10, 0),
        Err(EngineError::InvalidDepth(0))
    );
}

#[test]
fn test_propagate_add_one_becomes_constant() {
    let mut node = leaf_pair(NodeKind::Add);
    let mut rng = StdRng::seed_from_u64(5);
    assert!(Propagator::new(&mut rng).propagate(&mut node, 1.0).is_ok());
    assert!(node.is_constant());
    assert_eq!(node.value(), Some(1.0));
    assert!(node.children().is_empty());
}

#[test]
fn test_propagate_add_splits_into_positive_parts() {
    let mut rng = StdRng::seed_from_u64(8);
    for _ in 0..100 {
        let mut node = leaf_pair(NodeKind::Add);
        assert!(Propagator::new(&mut rng).propagate(&mut node, 10.0).is_ok());
        let parts: Vec<f64> = node.children().iter().filter_map(|c| c.value()).collect();
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|p| *p >= 1.0));
        assert_eq!(parts.iter().sum::<f64>(), 10.0);
    }
}

#[test]
fn test_propagate_mul_prime_or_one_becomes_constant() {
    for value in [1.0, 2.0, 3.0, 13.0, 97.0] {
        let mut node = leaf_pair(NodeKind::Mul);
        let mut rng = StdRng::seed_from_u64(2);
        assert!(Propagator::new(&mut rng).propagate(&mut node, value).is_ok());
        assert!(node.is_constant());
        assert_eq!(node.value(), Some(value));
    }
}

#[test]
fn test_propagate_mul_uses_proper_divisor() {
    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..50 {
        let mut node = leaf_pair(NodeKind::Mul);
        assert!(Propagator::new(&mut rng).propagate(&mut node, 36.0).is_ok());
        let parts: Vec<f64> = node.children().iter().filter_map(|c| c.value()).collect();
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|p| *p > 1.0 && *p < 36.0));
        assert_eq!(parts.iter().product::<f64>(), 36.0);
    }
}

#[test]
fn test_propagate_sub_keeps_parts_ordered() {
    let mut rng = StdRng::seed_from_u64(6);
    for _ in 0..100 {
        let mut node = leaf_pair(NodeKind::Sub);
        assert!(Propagator::new(&mut rng).propagate(&mut node, 9.0).is_ok());
        let parts: Vec<f64> = node.children().iter().filter_map(|c| c.value()).collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0] >= 10.0 && parts[0] <= 18.0);
        assert!(parts[0] > parts[1] && parts[1] > 0.0);
        assert_eq!(parts[0] - parts[1], 9.0);
    }
}

#[test]
fn test_propagate_div_builds_fraction() {
    let mut node = leaf_pair(NodeKind::Div);
    let mut rng = ReplaySource::new([]);
    assert!(Propagator::new(&mut rng).propagate(&mut node, 42.0).is_ok());
    assert_eq!(node.to_latex(), Ok("\\frac{336}{8}".to_string()));
    assert_eq!(node.evaluate(), Ok(42.0));
}

#[test]
fn test_propagate_trig() {
    let mut rng = ReplaySource::new([]);

    let mut sin = leaf_unary(NodeKind::Sin);
    assert!(Propagator::new(&mut rng).propagate(&mut sin, 1.0).is_ok());
    assert_eq!(
        sin.children().first().and_then(|c| c.value()),
        Some(std::f64::consts::FRAC_PI_2)
    );

    let mut cos = leaf_unary(NodeKind::Cos);
    assert!(Propagator::new(&mut rng).propagate(&mut cos, 1.0).is_ok());
    assert_eq!(cos.children().first().and_then(|c| c.value()), Some(0.0));
    assert_eq!(cos.to_latex(), Ok("\\cos(0)".to_string()));
}

#[test]
fn test_propagate_trig_out_of_domain_becomes_constant() {
    let mut rng = ReplaySource::new([]);
    let mut sin = leaf_unary(NodeKind::Sin);
    assert!(Propagator::new(&mut rng).propagate(&mut sin, 5.0).is_ok());
    assert!(sin.is_constant());
    assert_eq!(sin.value(), Some(5.0));
}

#[test]
fn test_propagate_assigned_constant_fails() {
    let mut node = Node::constant(1, 3.0);
    let mut rng = ReplaySource::new([]);
    assert_eq!(
        Propagator::new(&mut rng).propagate(&mut node, 4.0),
        Err(EngineError::TreeError(TreeError::AlreadyAssigned { depth: 1 }))
    );
}

#[test]
fn test_expander_follows_scripted_draws() {
    let config = EngineConfig::new(3, [Operator::Add, Operator::Sub]);
    // Sub at the root, expand the left child into an Add whose children stay leaves,
    // leave the right child as a leaf
    let mut rng = ReplaySource::new([1, 1, 0, 0, 0, 0]);
    let mut root = Node::new(1);
    assert!(Expander::new(&config, &mut rng).expand(&mut root).is_ok());
    assert_eq!(rng.remaining(), 0);

    let ops: Vec<Operator> = root.iter().map(Node::operator).collect();
    assert_eq!(
        ops,
        vec![
            Operator::Sub,
            Operator::Add,
            Operator::Constant,
            Operator::Constant,
            Operator::Constant
        ]
    );
}

#[test]
fn test_expander_stops_at_max_depth() {
    let config = EngineConfig::new(4, all_operators());
    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut root = Node::new(1);
        assert!(Expander::new(&config, &mut rng).expand(&mut root).is_ok());

        for node in root.iter() {
            assert!(node.depth() <= 4);
            if node.depth() == 4 {
                assert!(node.is_constant());
            }
            assert_eq!(node.children().len(), node.operator().arity());
            for child in node.children() {
                assert_eq!(child.depth(), node.depth() + 1);
            }
        }
    }
}

#[test]
fn test_expander_coin_is_fair() {
    let config = EngineConfig::new(3, [Operator::Add]);
    let mut rng = StdRng::seed_from_u64(2024);
    let mut expanded = 0;
    let mut slots = 0;

    for _ in 0..2000 {
        let mut root = Node::new(1);
        assert!(Expander::new(&config, &mut rng).expand(&mut root).is_ok());
        for child in root.children() {
            slots += 1;
            if !child.is_constant() {
                expanded += 1;
            }
        }
    }

    let ratio = expanded as f64 / slots as f64;
    assert!((ratio - 0.5).abs() < 0.05, "ratio was {}", ratio);
}

#[test]
fn test_stacked_division_disabled() {
    let config = EngineConfig::new(4, [Operator::Div]).with_stacked_division(false);
    let mut rng = ReplaySource::new(std::iter::repeat_n(1, 64));
    let mut root = Node::new(1);
    assert!(Expander::new(&config, &mut rng).expand(&mut root).is_ok());

    assert_eq!(root.operator(), Operator::Div);
    assert!(root.children().iter().all(|c| c.is_constant()));
}

#[test]
fn test_stacked_division_disabled_falls_back_to_other_operators() {
    let config = EngineConfig::new(3, [Operator::Div, Operator::Add]).with_stacked_division(false);
    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut root = Node::new(1);
        assert!(Expander::new(&config, &mut rng).expand(&mut root).is_ok());
        for node in root.iter().filter(|n| n.operator() == Operator::Div) {
            assert!(
                node.children()
                    .iter()
                    .all(|c| c.operator() != Operator::Div)
            );
        }
    }
}

#[test]
fn test_stacked_division_enabled() {
    let config = EngineConfig::new(4, [Operator::Div]).with_stacked_division(true);
    let mut rng = ReplaySource::new(std::iter::repeat_n(1, 64));
    let mut root = Node::new(1);
    assert!(Expander::new(&config, &mut rng).expand(&mut root).is_ok());

    assert_eq!(root.max_depth(), 4);
    assert_eq!(root.node_count(), 15);
}

fn assert_round_trip(engine: &EquationEngine, target: i64, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let root = engine.build_tree(target, &mut rng);
    assert!(root.is_ok(), "seed {}: {:?}", seed, root);
    let Ok(root) = root else { return };

    let value = root.evaluate();
    assert!(value.is_ok());
    if let Ok(value) = value {
        assert!(close_to(value, target as f64), "{} != {}", value, target);
    }

    let rendered = root.to_latex_with(engine.config().style);
    assert!(rendered.is_ok());
    if let Ok(rendered) = rendered {
        let parsed = parse(&rendered).and_then(|tree| tree.evaluate());
        assert!(parsed.is_ok(), "could not read back '{}'", rendered);
        if let Ok(value) = parsed {
            assert!(
                close_to(value, target as f64),
                "'{}' evaluates to {}, expected {}",
                rendered,
                value,
                target
            );
        }
    }
}

#[test]
fn test_generated_equations_evaluate_to_target() {
    let configs = [
        EngineConfig::default(),
        EngineConfig::new(5, all_operators()),
        EngineConfig::new(6, [Operator::Sin, Operator::Cos, Operator::Add]),
        EngineConfig::new(4, [Operator::Mul, Operator::Div]).with_stacked_division(false),
        EngineConfig::new(5, all_operators()).with_style(RenderStyle::FullyParenthesized),
    ];

    for config in configs {
        let engine = EquationEngine::new(config);
        for target in TARGETS {
            for seed in 0..40 {
                assert_round_trip(&engine, target, seed);
            }
        }
    }
}

#[test]
fn test_largest_target_survives_deep_trees() {
    let configs = [
        EngineConfig {
            max_depth: 5,
            ..EngineConfig::default()
        },
        EngineConfig {
            max_depth: 5,
            ..EngineConfig::default()
        }
        .with_stacked_division(true)
        .with_style(RenderStyle::FullyParenthesized),
        EngineConfig::new(5, all_operators()),
        EngineConfig::new(6, [Operator::Div, Operator::Sub]),
    ];

    for config in configs {
        let engine = EquationEngine::new(config);
        for seed in 0..300 {
            assert_round_trip(&engine, MAX_TARGET, seed);
        }
    }
}

#[test]
fn test_difference_below_nested_fractions() {
    let engine = engine(4, &[Operator::Div, Operator::Sub]);
    let mut rng = ReplaySource::new([0, 1, 0, 1, 1, 0, 0, 0, 0]);
    let latex = engine.generate_with(MAX_TARGET, &mut rng);
    assert!(latex.is_ok());
    if let Ok(latex) = latex {
        let value = parse(&latex).and_then(|tree| tree.evaluate());
        assert!(value.is_ok(), "could not read back '{}'", latex);
        if let Ok(value) = value {
            assert!(close_to(value, MAX_TARGET as f64), "{} != {}", value, MAX_TARGET);
        }
    }
}

#[test]
fn test_propagate_sub_huge_value() {
    let mut rng = StdRng::seed_from_u64(3);
    for value in [1e21, 1e32, 1e300] {
        let mut node = leaf_pair(NodeKind::Sub);
        assert!(Propagator::new(&mut rng).propagate(&mut node, value).is_ok());
        let parts: Vec<f64> = node.children().iter().filter_map(|c| c.value()).collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[1] >= 1.0 && parts[1] <= MAX_DIFFERENCE_OFFSET as f64);
        assert!(close_to(parts[0] - parts[1], value));
    }
}

#[test]
fn test_propagate_div_overflow_becomes_constant() {
    let mut node = leaf_pair(NodeKind::Div);
    let mut rng = ReplaySource::new([]);
    assert!(Propagator::new(&mut rng).propagate(&mut node, 1e300).is_ok());
    assert!(node.is_constant());
    assert_eq!(node.value(), Some(1e300));
}

#[test]
fn test_equation_from_toggle_names() {
    for _ in 0..20 {
        let latex = crate::get_equation_from_toggles(12, 2, &["allowMul"]);
        assert!(latex.is_ok());
        if let Ok(latex) = latex {
            assert!(latex.contains("\\times"), "'{}' is not a product", latex);
            assert_eq!(parse(&latex).and_then(|tree| tree.evaluate()), Ok(12.0));
        }
    }

    assert_eq!(
        crate::get_equation_from_toggles(7, 2, &["allowMul", "allowPow"]),
        Ok("7".to_string())
    );
    assert_eq!(
        crate::get_equation_from_toggles(5, 2, &Vec::<String>::new()),
        Err(EngineError::RandomError(RandomError::EmptyChoiceSet))
    );
}

#[test]
fn test_generated_trees_have_no_unassigned_constants() {
    let engine = engine(6, &all_operators());
    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        let root = engine.build_tree(42, &mut rng);
        assert!(root.is_ok());
        if let Ok(root) = root {
            assert!(
                root.iter()
                    .filter(|n| n.is_constant())
                    .all(|n| n.value().is_some())
            );
        }
    }
}

#[test]
fn test_replayed_draws_are_deterministic() {
    let engine = engine(5, &all_operators());
    let script: Vec<i64> = (0..200).map(|i| (i * 7 + 3) % 5).collect();

    let mut first = ReplaySource::new(script.clone());
    let mut second = ReplaySource::new(script);
    assert_eq!(
        engine.generate_with(360, &mut first),
        engine.generate_with(360, &mut second)
    );
}

#[test]
fn test_seeded_generation_is_deterministic() {
    let engine = EquationEngine::default();
    for seed in 0..20 {
        assert_eq!(
            engine.generate_seeded(42, seed),
            engine.generate_seeded(42, seed)
        );
    }
}

#[test]
fn test_generate_batch() {
    let engine = EquationEngine::default();
    let batch = engine.generate_batch(42, 16, 100);
    assert!(batch.is_ok());
    if let Ok(items) = &batch {
        assert_eq!(items.len(), 16);
        assert_eq!(items.first().cloned(), engine.generate_seeded(42, 100).ok());
        assert_eq!(items.last().cloned(), engine.generate_seeded(42, 115).ok());
    }
    assert_eq!(engine.generate_batch(42, 16, 100), batch);
}

#[test]
fn test_generate_batch_propagates_errors() {
    let engine = EquationEngine::default();
    assert!(matches!(
        engine.generate_batch(0, 4, 0),
        Err(EngineError::InvalidTarget { .. })
    ));
    assert_eq!(engine.generate_batch(42, 0, 0), Ok(Vec::new()));
}

#[test]
fn test_toggle_parsing() {
    assert_eq!("allowAdd".parse::<Toggle>(), Ok(Toggle::AllowAdd));
    assert_eq!("allowCos".parse::<Toggle>(), Ok(Toggle::AllowCos));
    assert_eq!(
        "allowStackedDiv".parse::<Toggle>(),
        Ok(Toggle::AllowStackedDiv)
    );
    assert_eq!(
        "allowPow".parse::<Toggle>(),
        Err(EngineError::UnknownToggle("allowPow".to_string()))
    );
    assert_eq!(Toggle::AllowStackedDiv.operator(), None);
    assert_eq!(Toggle::AllowSin.operator(), Some(Operator::Sin));
}

#[test]
fn test_config_from_toggles() {
    let config = EngineConfig::from_toggles(
        4,
        ["allowAdd", "allowDiv", "bogus", "allowStackedDiv", "allowAdd"],
    );
    assert_eq!(config.max_depth, 4);
    assert_eq!(config.operators.as_slice(), &[Operator::Add, Operator::Div]);
    assert!(config.allow_stacked_division);

    let plain = EngineConfig::from_toggles(2, ["allowMul"]);
    assert!(!plain.allow_stacked_division);
}

#[test]
fn test_operator_set() {
    let mut set = OperatorSet::new();
    assert!(set.is_empty());
    assert!(set.insert(Operator::Sub));
    assert!(!set.insert(Operator::Sub));
    assert!(!set.insert(Operator::Constant));
    assert!(set.insert(Operator::Add));
    assert_eq!(set.as_slice(), &[Operator::Sub, Operator::Add]);
    assert_eq!(set.len(), 2);
    assert!(set.contains(Operator::Add));
    assert!(!set.contains(Operator::Mul));
}

#[test]
fn test_default_config() {
    let config = EngineConfig::default();
    assert_eq!(config.max_depth, 3);
    assert_eq!(config.operators, OperatorSet::arithmetic());
    assert!(!config.allow_stacked_division);
    assert_eq!(config.style, RenderStyle::Precedence);
}
