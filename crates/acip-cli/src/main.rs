//! Command-line entry point for the catch-up immunization engine.

use std::io::{self, IsTerminal};
use std::process;

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use acip_cli::logging::{LogConfig, LogFormat, init_logging};

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();

    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        process::exit(1);
    }

    let code = match &cli.command {
        Command::Evaluate(args) => match commands::run_evaluate(args) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Vaccines => {
            commands::run_vaccines();
            0
        }
    };
    process::exit(code);
}

fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    // RUST_LOG only applies when the user has not asked for a level
    // explicitly on the command line.
    let use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig {
        level_filter,
        use_env_filter,
        format,
        log_file: cli.log_file.clone(),
        with_ansi,
    }
}
