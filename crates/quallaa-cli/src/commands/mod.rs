use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use quallaa_core::Quallaa;
use quallaa_core::models::ScanConfig;

use crate::cli::Commands;

pub(crate) fn run_from_root(root: &Path, command: Commands) -> Result<()> {
    let config = scan_config_for(&command);
    let app = Quallaa::open_with_config(root, config).context("failed to open workspace")?;

    // The in-memory graph does not outlive the process, so every subcommand
    // starts from a fresh bulk index.
    let report = app.scan_workspace().context("failed to index workspace")?;

    match command {
        Commands::Scan(_) => {
            print_json(&report)?;
        }
        Commands::Suggest(args) => {
            let suggestions = app.suggest_links(&args.prefix, args.limit)?;
            print_json(&suggestions)?;
        }
        Commands::Backlinks(args) => {
            let backlinks = app.backlinks_for(&args.note)?;
            print_json(&backlinks)?;
        }
        Commands::Tags(args) => {
            let snapshot = app.tags_snapshot()?;
            match args.prefix.as_deref() {
                Some(prefix) => print_json(&snapshot.entries_under(prefix))?,
                None => print_json(&snapshot)?,
            }
        }
        Commands::Graph => {
            let snapshot = app.graph_snapshot()?;
            print_json(&snapshot)?;
        }
        Commands::Broken => {
            let broken = app.broken_links()?;
            print_json(&broken)?;
        }
        Commands::Stats => {
            let stats = app.stats()?;
            print_json(&stats)?;
        }
    }
    Ok(())
}

fn scan_config_for(command: &Commands) -> ScanConfig {
    let mut config = ScanConfig::default();
    if let Commands::Scan(args) = command {
        config.include_hidden = args.include_hidden;
        config.exclude_globs.extend(
            args.exclude
                .iter()
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(ToString::to_string),
        );
        config.exclude_globs.sort();
        config.exclude_globs.dedup();
    }
    config
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
