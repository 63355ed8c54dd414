//! CLI argument definitions and parsing structures
//!
//! This module defines the command-line interface structure using clap,
//! including the main `Cli` struct and the subcommand enum.

use clap::{Parser, Subcommand};
use contractflow_diff::Granularity;
use std::path::PathBuf;

/// contractflow - contract lifecycle core
#[derive(Parser, Debug)]
#[command(name = "contractflow")]
#[command(about = "Compare contract drafts, score their risk and inspect the contract lifecycle")]
#[command(long_about = r#"
contractflow compares contract drafts, scores how risky a set of changes is
against a clause taxonomy, and describes the phase workflow a contract moves
through before and after activation.

EXAMPLES:
  # Line diff of two drafts
  contractflow diff msa-v1.txt msa-v2.txt

  # Character diff as canonical JSON
  contractflow diff msa-v1.txt msa-v2.txt --granularity char --json

  # Risk indicator with a custom clause taxonomy
  contractflow risk msa-v1.txt msa-v2.txt --taxonomy taxonomy.toml

  # Lifecycle order and approval gates
  contractflow workflow --json

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  Config file is discovered by searching upward from CWD for .contractflow/config.toml
  Use --config to specify an explicit config file path

WORKFLOW:
  Pre-Activation [Drafting → Comparison → Approval*] → Activation [Execution]
  → Post-Activation [Obligations → Disputes → Variations] → Reports
  * gated on unanimous approval; Post-Activation is entered by activation only
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Maximum bytes accepted per compared document
    #[arg(long, global = true)]
    pub diff_max_input_bytes: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare two contract documents
    Diff {
        /// Original document (e.g. the baseline)
        original: PathBuf,

        /// Modified document
        modified: PathBuf,

        /// Unit of comparison: line or char
        #[arg(long)]
        granularity: Option<Granularity>,

        /// Output as canonical JSON
        #[arg(long)]
        json: bool,
    },

    /// Score the risk of the changes between two documents
    Risk {
        /// Original document (e.g. the baseline)
        original: PathBuf,

        /// Modified document
        modified: PathBuf,

        /// Stand-alone clause taxonomy file (TOML)
        #[arg(long)]
        taxonomy: Option<PathBuf>,

        /// Output as canonical JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the lifecycle order and approval gates
    Workflow {
        /// Output as canonical JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Operation name used in error reports.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Diff { .. } => "diff",
            Self::Risk { .. } => "risk",
            Self::Workflow { .. } => "workflow",
        }
    }

    /// Granularity given on the command line, if any.
    #[must_use]
    pub fn granularity(&self) -> Option<Granularity> {
        match self {
            Self::Diff { granularity, .. } => *granularity,
            _ => None,
        }
    }
}

/// Build the clap command (for help rendering and tests).
#[must_use]
pub fn build_cli() -> clap::Command {
    <Cli as clap::CommandFactory>::command()
}
