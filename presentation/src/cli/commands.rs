//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use trial_domain::{ReportFormat, SelectionPolicy};

/// Output format for the end-of-batch summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Averages table with skipped records
    Summary,
    /// Full metrics report as JSON
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Summary => ReportFormat::Summary,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

/// Outer speaker selection strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SelectionArg {
    /// Rotation until the final phase, then the judge's verdict
    PhaseGated,
    /// Plaintiff, defendant, judge, repeat
    RoundRobin,
    /// Plaintiff and defendant only
    Alternating,
}

impl From<SelectionArg> for SelectionPolicy {
    fn from(arg: SelectionArg) -> Self {
        match arg {
            SelectionArg::PhaseGated => SelectionPolicy::PhaseGated,
            SelectionArg::RoundRobin => SelectionPolicy::RoundRobin,
            SelectionArg::Alternating => SelectionPolicy::Alternating,
        }
    }
}

/// CLI arguments for mock-trial
#[derive(Parser, Debug)]
#[command(name = "mock-trial")]
#[command(author, version, about = "Mock trial - LLM agents argue criminal cases and the verdicts are scored")]
#[command(long_about = r#"
Mock trial runs a simulated criminal hearing for every case in a dataset.

A presiding judge moderates two delegates. Before each delegate speaks, its
team (evidence specialist, legal researcher, lead counsel) deliberates
internally. The judge's closing verdict is parsed and scored against the
ground truth (law articles and crime types).

Progress is checkpointed after every case; rerunning with the same --out
directory resumes where the previous run stopped.

Configuration files are loaded from (in priority order):
1. MOCK_TRIAL_* environment variables
2. --config <path>     Explicit config file
3. ./trial.toml        Project-level config
4. ~/.config/mock-trial/config.toml   Global config

Example:
  mock-trial --cases data/test.json --out runs/baseline
  mock-trial --cases data/test.json --truth data/truth.json --selection round-robin -v
"#)]
pub struct Cli {
    /// JSON array of case records
    #[arg(long, value_name = "PATH")]
    pub cases: Option<PathBuf>,

    /// Ground-truth table keyed by CaseId (overrides inline truth)
    #[arg(long, value_name = "PATH")]
    pub truth: Option<PathBuf>,

    /// Output directory for transcripts, checkpoint and metrics
    #[arg(short = 'O', long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Outer courtroom turn budget
    #[arg(long, value_name = "N")]
    pub outer_rounds: Option<usize>,

    /// Specialist turns per team deliberation
    #[arg(long, value_name = "N")]
    pub inner_rounds: Option<usize>,

    /// Outer speaker selection strategy
    #[arg(long, value_enum)]
    pub selection: Option<SelectionArg>,

    /// Model for every role (overrides [models])
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Skip similar-case retrieval for the judge's opening
    #[arg(long)]
    pub no_retrieval: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
