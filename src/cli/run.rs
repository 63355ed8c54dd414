//! CLI entry point and dispatch logic
//!
//! This module owns the `run()` function which:
//! - Parses CLI arguments
//! - Builds CliArgs and discovers Config
//! - Initializes tracing
//! - Dispatches to command handlers
//! - Handles all error output

use anyhow::Result;
use clap::Parser;

use super::args::{Cli, Commands};
use super::commands;

use crate::{CliArgs, Config, ContractFlowError, ExitCode, UserFriendlyError};
use contractflow_utils::error::ConfigError;
use contractflow_utils::logging::init_tracing;

/// Main CLI execution function.
///
/// Handles ALL output including errors. On error the report is printed
/// here and the exit code returned; main.rs only calls
/// `std::process::exit(code.as_i32())`.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    let cli_args = CliArgs {
        config_path: cli.config.clone(),
        verbose: cli.verbose.then_some(true),
        granularity: cli.command.granularity(),
        diff_max_input_bytes: cli.diff_max_input_bytes,
    };

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            match err.downcast_ref::<ConfigError>() {
                Some(config_err) => eprintln!("{}", contextual_report(config_err, "config")),
                None => eprintln!("✗ Failed to load configuration: {err:#}"),
            }
            return Err(ExitCode::CLI_ARGS);
        }
    };

    // A second subscriber (e.g. under a test harness) is not an error worth failing on.
    let _ = init_tracing(config.verbose());

    let operation = cli.command.operation();

    let result = match cli.command {
        Commands::Diff {
            original,
            modified,
            granularity: _,
            json,
        } => commands::execute_diff_command(&original, &modified, json, &config),
        Commands::Risk {
            original,
            modified,
            taxonomy,
            json,
        } => commands::execute_risk_command(
            &original,
            &modified,
            taxonomy.as_deref(),
            json,
            &config,
        ),
        Commands::Workflow { json } => commands::execute_workflow_command(json),
    };

    if let Err(error) = result {
        if let Some(cf_error) = error.downcast_ref::<ContractFlowError>() {
            eprintln!("{}", contextual_report(cf_error, operation));
            return Err(cf_error.to_exit_code());
        }

        eprintln!("✗ Unexpected error: {error:#}");
        if let Some(suggestions) = enhance_error_context(&error) {
            eprintln!("\n  Suggestions:");
            for (i, suggestion) in suggestions.iter().enumerate() {
                eprintln!("    {}. {}", i + 1, suggestion);
            }
        }
        eprintln!("\n  Run with --verbose for more detailed output");
        return Err(ExitCode::INTERNAL);
    }

    Ok(())
}

/// `Error / Context / Suggestions` report with an operation-specific hint.
pub(crate) fn contextual_report(error: &dyn UserFriendlyError, operation: &str) -> String {
    let mut output = format!("✗ {operation} failed: {}\n", error.user_message());

    if let Some(ctx) = error.context() {
        output.push_str(&format!("\n  Context: {ctx}\n"));
    }

    let suggestions = error.suggestions();
    if !suggestions.is_empty() {
        output.push_str("\n  Suggestions:\n");
        for (i, suggestion) in suggestions.iter().enumerate() {
            output.push_str(&format!("    {}. {}\n", i + 1, suggestion));
        }
    }

    output
}

/// Suggestions for failures that did not come from the library.
fn enhance_error_context(error: &anyhow::Error) -> Option<Vec<String>> {
    let error_str = format!("{error:#}");

    if error_str.contains("No such file or directory") {
        Some(vec![
            "Verify the specified paths exist".to_string(),
            "Check that you're running from the correct directory".to_string(),
        ])
    } else if error_str.contains("Permission denied") {
        Some(vec!["Check file permissions on the input documents".to_string()])
    } else {
        None
    }
}
