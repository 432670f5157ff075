//! umlsctl - command-line host for the UMLS client library
//!
//! Installs the log subscriber, resolves configuration and prints the
//! rendered result of one subcommand.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use umls_common::UmlsClient;
use umlsctl::cli::{Cli, Commands};
use umlsctl::commands;

fn main() -> Result<()> {
    // Initialize logging (RUST_LOG overrides), on stderr so stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // The label table needs no credentials
    if matches!(cli.command, Commands::RelationLabels) {
        println!("{}", commands::relation_label_table());
        return Ok(());
    }

    let config = commands::load_config(&cli)?;
    let client = UmlsClient::from_config(config).context("Failed to create HTTP client")?;

    println!("{}", commands::execute(&client, &cli));
    Ok(())
}
