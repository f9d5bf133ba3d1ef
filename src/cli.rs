use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use thiserror::Error;
use voicecalc::{EvalError, Mode, TurnOutcome, evaluate_turn, evaluate_turns, normalize};

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

/// Voicecalc - evaluate spoken or typed arithmetic
#[derive(Parser, Debug)]
#[command(name = "voicecalc")]
#[command(about = "Evaluate arithmetic written as words or symbols, e.g. 'five plus three times two'")]
#[command(version)]
pub struct CliArgs {
    /// Words of the expression; joined with spaces into one turn
    pub input: Vec<String>,

    /// Evaluate the input exactly as typed, without rewriting number words
    #[arg(short, long, conflicts_with = "normalize_only")]
    pub raw: bool,

    /// Print the canonical expression instead of evaluating it
    #[arg(short, long)]
    pub normalize_only: bool,

    /// Print the evaluated expression next to the result
    #[arg(short = 'e', long)]
    pub show_expression: bool,

    /// Read one turn per line from a file ('-' for stdin)
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Log level (default: warn)
    #[arg(short, long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

/// Where turns come from
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    Text(String),
    File(PathBuf),
    Stdin,
}

/// Configuration for the CLI application
pub struct CliConfig {
    pub source: InputSource,
    pub mode: Mode,
    pub normalize_only: bool,
    pub show_expression: bool,
    pub log_level: LogLevel,
}

/// A finite result could not be shown as a real number
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DisplayError {
    #[error("Math error: result is not a real number")]
    NotReal,
    #[error("Math error: result is too large")]
    Overflow,
}

/// Parse command line arguments and return configuration
pub fn parse_args() -> Result<CliConfig> {
    config_from_args(CliArgs::parse())
}

fn config_from_args(args: CliArgs) -> Result<CliConfig> {
    let text = args.input.join(" ");

    let source = match (&args.file, text.trim().is_empty()) {
        (Some(_), false) => bail!("Give either an expression or --file, not both"),
        (Some(path), true) if path.as_os_str() == "-" => InputSource::Stdin,
        (Some(path), true) => InputSource::File(path.clone()),
        (None, false) => InputSource::Text(text),
        (None, true) => bail!("Nothing to evaluate: pass an expression or --file"),
    };

    Ok(CliConfig {
        source,
        mode: if args.raw { Mode::Raw } else { Mode::Spoken },
        normalize_only: args.normalize_only,
        show_expression: args.show_expression,
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

/// Render an evaluation result for display
///
/// Integral values print without a fractional part and `-0` prints as `0`.
pub fn format_result(value: f64) -> Result<String, DisplayError> {
    if value.is_nan() {
        return Err(DisplayError::NotReal);
    }
    if value.is_infinite() {
        return Err(DisplayError::Overflow);
    }
    if value == 0.0 {
        return Ok("0".to_string());
    }
    Ok(value.to_string())
}

/// User-facing wording for an evaluation failure
pub fn describe_error(err: &EvalError) -> String {
    match err {
        EvalError::Syntax { .. } => format!("Invalid expression: {}", err),
        EvalError::DisallowedConstruct { construct } => {
            format!("Invalid expression: {} is not allowed", construct)
        }
        EvalError::DivisionByZero => "Math error: division by zero".to_string(),
    }
}

fn render_outcome(outcome: &TurnOutcome, show_expression: bool) -> Result<String> {
    let value = outcome
        .result
        .as_ref()
        .map_err(|e| anyhow!(describe_error(e)))?;
    let shown = format_result(*value)?;
    if show_expression {
        Ok(format!("{} = {}", outcome.expression, shown))
    } else {
        Ok(shown)
    }
}

fn read_lines(source: &InputSource) -> Result<Vec<String>> {
    let contents = match source {
        InputSource::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        InputSource::Stdin => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
        InputSource::Text(text) => text.clone(),
    };

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn run_single(text: &str, config: &CliConfig) -> Result<()> {
    if config.normalize_only {
        println!("{}", normalize(text));
        return Ok(());
    }

    let outcome = evaluate_turn(text, config.mode);
    info!("Evaluated '{}' as '{}'", outcome.input, outcome.expression);
    println!("{}", render_outcome(&outcome, config.show_expression)?);
    Ok(())
}

fn run_batch(lines: &[String], config: &CliConfig) -> Result<()> {
    if config.normalize_only {
        for line in lines {
            println!("{}", normalize(line));
        }
        return Ok(());
    }

    let outcomes = evaluate_turns(lines, config.mode);
    let mut failures = 0;
    for outcome in &outcomes {
        match render_outcome(outcome, config.show_expression) {
            Ok(shown) => println!("{}", shown),
            Err(e) => {
                failures += 1;
                warn!("'{}' failed: {}", outcome.input, e);
                println!("{}: {}", outcome.input, e);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} turns failed", failures, outcomes.len());
    }
    Ok(())
}

/// Run the main application logic
pub fn run() -> Result<()> {
    let config = parse_args()?;

    // Initialize logging
    init_logging(&config.log_level)?;

    match &config.source {
        InputSource::Text(text) => run_single(text, &config),
        source => {
            let lines = read_lines(source)?;
            info!("Read {} turns", lines.len());
            run_batch(&lines, &config)
        }
    }
}
