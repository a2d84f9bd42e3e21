//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

/// CDC catch-up immunization scheduler.
#[derive(Parser)]
#[command(
    name = "acip",
    version,
    about = "CDC catch-up immunization scheduler",
    long_about = "Evaluates a patient's vaccination history against the CDC \
                  catch-up schedule and recommends the next dose for every \
                  applicable vaccine."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    #[command(flatten)]
    pub color: Color,

    /// Override the log level (takes precedence over -v/-q)
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate a catch-up request file and print recommendations
    Evaluate(EvaluateArgs),
    /// List the vaccines the engine knows about
    Vaccines,
}

#[derive(Parser)]
pub struct EvaluateArgs {
    /// Path to a JSON catch-up request
    #[arg(value_name = "REQUEST")]
    pub request: PathBuf,

    /// Output format
    #[arg(long = "output", value_enum, default_value = "table")]
    pub output: OutputArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputArg {
    /// Rendered tables for terminals
    Table,
    /// Pretty-printed JSON
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
