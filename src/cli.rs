use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use unsolver::engine::validate_target;
use unsolver::tree::markup;
use unsolver::{EngineConfig, EquationEngine, Operator, RenderStyle};

/// Log level for the application
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_log_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Operators selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OperatorArg {
    Add,
    Sub,
    Mul,
    Div,
    Sin,
    Cos,
}

impl From<OperatorArg> for Operator {
    fn from(arg: OperatorArg) -> Self {
        match arg {
            OperatorArg::Add => Operator::Add,
            OperatorArg::Sub => Operator::Sub,
            OperatorArg::Mul => Operator::Mul,
            OperatorArg::Div => Operator::Div,
            OperatorArg::Sin => Operator::Sin,
            OperatorArg::Cos => Operator::Cos,
        }
    }
}

/// Unsolver - Generate equations that evaluate to a chosen answer
#[derive(Parser, Debug)]
#[command(name = "unsolver")]
#[command(about = "Generate random LaTeX equations that evaluate to a chosen answer")]
#[command(version)]
pub struct CliArgs {
    /// Answer the equations must evaluate to
    #[arg(default_value_t = 42, allow_negative_numbers = true)]
    pub target: i64,

    /// Depth at which tree expansion stops
    #[arg(short, long, default_value_t = 3)]
    pub depth: u32,

    /// Operators to draw from (default: add,sub,mul,div)
    #[arg(short, long, value_enum, value_delimiter = ',')]
    pub ops: Vec<OperatorArg>,

    /// Toggle names such as allowAdd or allowStackedDiv; replaces --ops
    #[arg(short, long)]
    pub toggle: Vec<String>,

    /// Allow fractions directly inside fractions
    #[arg(long)]
    pub stacked_division: bool,

    /// Wrap every binary operation in parentheses
    #[arg(long)]
    pub parenthesize_all: bool,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of equations to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,

    /// Read every equation back and verify it evaluates to the target
    #[arg(long)]
    pub check: bool,

    /// Log level (default: warn)
    #[arg(short, long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

/// Configuration for the CLI application
pub struct CliConfig {
    pub target: i64,
    pub engine: EngineConfig,
    pub seed: Option<u64>,
    pub count: usize,
    pub check: bool,
    pub log_level: LogLevel,
}

/// Map command line flags onto an engine configuration
pub fn build_engine_config(args: &CliArgs) -> EngineConfig {
    let mut config = if !args.toggle.is_empty() {
        EngineConfig::from_toggles(args.depth, &args.toggle)
    } else if args.ops.is_empty() {
        EngineConfig {
            max_depth: args.depth,
            ..EngineConfig::default()
        }
    } else {
        EngineConfig::new(args.depth, args.ops.iter().copied().map(Operator::from))
            .with_stacked_division(false)
    };

    if args.stacked_division {
        config.allow_stacked_division = true;
    }
    if args.parenthesize_all {
        config.style = RenderStyle::FullyParenthesized;
    }

    config
}

/// Parse command line arguments and return configuration
pub fn parse_args() -> Result<CliConfig> {
    let args = CliArgs::parse();

    validate_target(args.target).context("Invalid target")?;

    Ok(CliConfig {
        target: args.target,
        engine: build_engine_config(&args),
        seed: args.seed,
        count: args.count,
        check: args.check,
        log_level: args.log_level,
    })
}

/// Initialize logging based on the provided log level
pub fn init_logging(log_level: &LogLevel) -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log_level.to_log_level_filter())
        .init();
    Ok(())
}

/// Read `equation` back and make sure it evaluates to `target`
pub fn check_equation(equation: &str, target: i64) -> Result<()> {
    let value = markup::parse(equation)
        .and_then(|tree| tree.evaluate())
        .with_context(|| format!("Could not evaluate '{}'", equation))?;

    let expected = target as f64;
    if (value - expected).abs() > 1e-9 * expected.abs().max(1.0) {
        bail!("'{}' evaluates to {}, expected {}", equation, value, target);
    }

    debug!("Checked '{}' = {}", equation, value);
    Ok(())
}

/// Run the main application logic
pub fn run() -> Result<()> {
    let config = parse_args()?;

    // Initialize logging
    init_logging(&config.log_level)?;

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(
        "Generating {} equation(s) for {} with seed {}",
        config.count, config.target, seed
    );

    let engine = EquationEngine::new(config.engine);
    let equations = engine
        .generate_batch(config.target, config.count, seed)
        .context("Failed to generate equation")?;

    for equation in equations {
        if config.check {
            check_equation(&equation, config.target)?;
        }
        println!("{}", equation);
    }

    Ok(())
}
