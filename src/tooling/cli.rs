//! CLI Tooling
//!
//! Command-line interface for the migration operations: tree rebuild from
//! flat rows, fragment merge, and single- or multi-target link
//! reconciliation. Library semantics live in the core modules; this layer
//! wires artifacts and configuration to them and renders results.

use crate::artifact;
use crate::config::{ConfigLoader, MigrationConfig};
use crate::error::MigrateError;
use crate::logging::LoggingConfig;
use crate::report::{format_merge_report_text, format_reconciliation_text};
use crate::runner;
use crate::tree::builder::PathTreeBuilder;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

/// Treegraft CLI - content-migration reconciliation
#[derive(Parser)]
#[command(name = "treegraft")]
#[command(about = "Rebuild, graft, and cross-validate migrated navigation trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (default: ./treegraft.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rebuild a hierarchy tree from a flat row artifact
    BuildTree {
        /// Flat row artifact (JSON list of maps, or tab-delimited text)
        #[arg(long)]
        rows: PathBuf,
        /// Destination tree artifact
        #[arg(long)]
        out: PathBuf,
    },
    /// Graft fragment subtrees into a parent tree
    Merge {
        /// Parent tree artifact (never overwritten)
        #[arg(long)]
        parent: PathBuf,
        /// Directory of fragment subdirectories
        #[arg(long)]
        fragments: PathBuf,
        /// Destination for the merged tree artifact
        #[arg(long)]
        out: PathBuf,
    },
    /// Cross-validate link references for one target directory
    Reconcile {
        /// Target content-store directory holding the three link artifacts
        target: PathBuf,
        /// Show full diagnostic lists instead of a 3-entry preview
        #[arg(long)]
        all: bool,
        /// Output format
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Reconcile every target directory under a root, fail-fast
    Batch {
        /// Root directory containing target subdirectories
        root: PathBuf,
        /// Show full diagnostic lists instead of a 3-entry preview
        #[arg(long)]
        all: bool,
    },
}

/// Rendered command result plus the verdict the process exit must carry.
#[derive(Debug)]
pub struct CommandOutput {
    pub text: String,
    /// True when the command ran to completion but its verdict failed
    /// (soft reconciliation failures; hard failures surface as errors).
    pub failed_verdict: bool,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        CommandOutput {
            text,
            failed_verdict: false,
        }
    }
}

/// CLI context holding the loaded migration configuration.
pub struct CliContext {
    config: MigrationConfig,
}

impl CliContext {
    /// Create a new CLI context from an optional explicit config path.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, MigrateError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Ok(CliContext { config })
    }

    pub fn with_config(config: MigrationConfig) -> Self {
        CliContext { config }
    }

    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Merge CLI logging flags over the configured logging section.
    pub fn logging_config_with_overrides(&self, cli: &Cli) -> LoggingConfig {
        let mut logging = self.config.logging.clone();
        if let Some(level) = &cli.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &cli.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &cli.log_output {
            logging.output = output.clone();
        }
        if let Some(file) = &cli.log_file {
            logging.file = Some(file.clone());
        }
        logging
    }

    /// Execute a CLI command.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, MigrateError> {
        match command {
            Commands::BuildTree { rows, out } => {
                let flat_rows = artifact::load_rows(rows)?;
                let builder = PathTreeBuilder::new(&self.config);
                let tree = builder.build(&flat_rows);
                artifact::write_tree(out, &tree)?;
                info!(rows = flat_rows.len(), out = %out.display(), "tree built");
                Ok(CommandOutput::ok(format!(
                    "Built tree: {} nodes from {} rows -> {}",
                    tree.node_count(),
                    flat_rows.len(),
                    out.display()
                )))
            }
            Commands::Merge {
                parent,
                fragments,
                out,
            } => {
                let report = runner::run_merge(parent, fragments, out, &self.config)?;
                Ok(CommandOutput::ok(format_merge_report_text(
                    &report,
                    &out.display().to_string(),
                )))
            }
            Commands::Reconcile {
                target,
                all,
                format,
            } => {
                let report = runner::run_reconcile(target, &self.config)?;
                let name = target
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| target.display().to_string());
                let text = if format == "json" {
                    serde_json::to_string_pretty(&report)
                        .map_err(|e| MigrateError::Config(e.to_string()))?
                } else {
                    format_reconciliation_text(&name, &report, *all)
                };
                Ok(CommandOutput {
                    text,
                    failed_verdict: !report.verdict,
                })
            }
            Commands::Batch { root, all } => {
                let outcome = runner::run_reconcile_batch(root, &self.config)?;
                let mut text = String::new();
                for (name, report) in &outcome.results {
                    text.push_str(&format_reconciliation_text(name, report, *all));
                    text.push('\n');
                }
                if outcome.results.is_empty() {
                    text.push_str("No target directories found.\n");
                }
                if let Some(aborted) = &outcome.aborted_at {
                    text.push_str(&format!(
                        "Batch aborted at target '{}' (hard failure); remaining targets skipped.\n",
                        aborted
                    ));
                }
                Ok(CommandOutput {
                    text,
                    failed_verdict: !outcome.all_passed(),
                })
            }
        }
    }
}
