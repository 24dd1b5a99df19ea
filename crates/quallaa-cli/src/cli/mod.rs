use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod args;

#[cfg(test)]
mod tests;

pub use args::{BacklinksArgs, ScanArgs, SuggestArgs, TagsArgs};

#[derive(Debug, Parser)]
#[command(name = "quallaa")]
#[command(about = "Note graph indexing and link resolution", version)]
pub struct Cli {
    /// Workspace root containing the notes.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Index every note under the root and print a scan report.
    Scan(ScanArgs),
    /// Completion candidates for a partially typed wiki link.
    Suggest(SuggestArgs),
    /// Notes that link to the given note, with context snippets.
    Backlinks(BacklinksArgs),
    /// Tag table, optionally narrowed to a hierarchical prefix.
    Tags(TagsArgs),
    /// Full node/edge export of the resolved link graph.
    Graph,
    /// Link occurrences that resolve to no note.
    Broken,
    /// Aggregate index counters.
    Stats,
}
