//! Command-line interface for the ctlmc model checker.

use clap::{ArgAction, Parser, Subcommand};
use ctlmc_check::Verdict;
use ctlmc_syntax::{parse, Formula};
use ctlmc_ts::ExplorationDefault;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI error with source context for pretty printing.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("failed to read file: {message}")]
    IoError { message: String },

    #[error("parse error: {message}")]
    #[diagnostic(code(ctlmc::parse_error))]
    ParseError {
        message: String,
        #[source_code]
        src: NamedSource<Arc<String>>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("artifact error: {message}")]
    #[diagnostic(code(ctlmc::artifact_error))]
    ArtifactError { message: String },
}

impl CliError {
    fn from_parse_error(e: ctlmc_syntax::ParseError, source: Arc<String>) -> Self {
        let span = e.span();
        CliError::ParseError {
            message: e.to_string(),
            src: NamedSource::new("formula", source),
            span: (span.start, span.len()).into(),
        }
    }
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "ctlmc", version)]
#[command(about = "Three-valued CTL model checker for partial transition systems", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a formula and show its canonical rendering
    Parse {
        /// CTL formula text
        #[arg(value_name = "FORMULA")]
        formula: String,

        /// Dump the formula tree
        #[arg(long)]
        ast: bool,
    },

    /// Print the simplified form of a formula
    Simplify {
        /// CTL formula text
        #[arg(value_name = "FORMULA")]
        formula: String,
    },

    /// List the atomic propositions a formula refers to
    Atoms {
        /// CTL formula text
        #[arg(value_name = "FORMULA")]
        formula: String,
    },

    /// Check a formula against exploration artifacts
    Check {
        /// CTL formula text
        #[arg(value_name = "FORMULA")]
        formula: String,

        /// Label listing artifact (JSON)
        #[arg(long, value_name = "FILE")]
        labels: PathBuf,

        /// Transition listing artifact (JSON)
        #[arg(long, value_name = "FILE")]
        transitions: PathBuf,

        /// Treat states as explored when the artifact carries no
        /// truncation marker (producer guarantees completeness)
        #[arg(long)]
        assume_explored: bool,
    },
}

fn main() {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    let cli = Cli::parse();

    // Initialize logging
    let default_directives = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let result = match cli.command {
        Commands::Parse { formula, ast } => cmd_parse(&formula, ast),
        Commands::Simplify { formula } => cmd_simplify(&formula),
        Commands::Atoms { formula } => cmd_atoms(&formula),
        Commands::Check {
            formula,
            labels,
            transitions,
            assume_explored,
        } => cmd_check(&formula, &labels, &transitions, assume_explored),
    };

    if let Err(e) = result {
        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(1);
    }
}

fn parse_formula(text: &str) -> CliResult<Formula> {
    let source = Arc::new(text.to_string());
    parse(text).map_err(|e| CliError::from_parse_error(e, source))
}

fn cmd_parse(text: &str, ast: bool) -> CliResult<()> {
    let formula = parse_formula(text)?;

    if ast {
        println!("{:#?}", formula);
    } else {
        println!("{}", formula);
        let simplified = formula.simplify();
        if simplified != formula {
            println!("simplified: {}", simplified);
        }
    }

    println!("parse: ok");
    Ok(())
}

fn cmd_simplify(text: &str) -> CliResult<()> {
    let formula = parse_formula(text)?;
    println!("{}", formula.simplify());
    Ok(())
}

fn cmd_atoms(text: &str) -> CliResult<()> {
    let formula = parse_formula(text)?;
    for name in formula.atoms() {
        println!("{}", name);
    }
    Ok(())
}

fn cmd_check(
    text: &str,
    labels: &PathBuf,
    transitions: &PathBuf,
    assume_explored: bool,
) -> CliResult<()> {
    info!("parsing formula...");
    let formula = parse_formula(text)?.simplify();

    info!("loading artifacts...");
    let labels_json = fs::read_to_string(labels).map_err(|e| CliError::IoError {
        message: format!("{}: {}", labels.display(), e),
    })?;
    let transitions_json = fs::read_to_string(transitions).map_err(|e| CliError::IoError {
        message: format!("{}: {}", transitions.display(), e),
    })?;

    let default = if assume_explored {
        ExplorationDefault::Explored
    } else {
        ExplorationDefault::Truncated
    };
    let system = ctlmc_ts::load_system(&labels_json, &transitions_json, default).map_err(|e| {
        CliError::ArtifactError {
            message: e.to_string(),
        }
    })?;

    info!("model checking...");
    let start = Instant::now();
    let analysis = ctlmc_check::check(&system, &formula);
    let elapsed = start.elapsed();

    let record = analysis.record();
    println!();
    println!("Result: {}", verdict_label(analysis.verdict()));
    println!("  Formula: {}", formula);
    println!(
        "  States: {} ({} satisfying, {} refuting, {} undetermined)",
        system.len(),
        record.sat.len(),
        record.refuted.len(),
        record.unknown().len()
    );
    println!("  Time: {:.2}s", elapsed.as_secs_f64());

    match analysis.verdict() {
        Verdict::Satisfied => Ok(()),
        Verdict::Refuted => std::process::exit(2),
        Verdict::Undetermined => std::process::exit(3),
    }
}

fn verdict_label(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Satisfied => "SATISFIED",
        Verdict::Refuted => "REFUTED",
        Verdict::Undetermined => "UNDETERMINED",
    }
}
