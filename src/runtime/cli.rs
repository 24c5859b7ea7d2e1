use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tagwright::TagAlias;

#[derive(Debug, Parser)]
#[command(name = "tagwright", version)]
#[command(about = "Keeps tags, cover art and file names of an album or artist tree consistent", long_about = None)]
pub struct Cli {
    /// Log every decision.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Do not read or store watermarks between runs.
    #[arg(long, global = true)]
    pub no_state: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reconcile a tree holding one album
    Album {
        /// Root of the album tree
        root: PathBuf,
        /// Album name enforced on every track
        #[arg(short, long)]
        name: String,
        /// Reconcile every track, not only those new since the last run
        #[arg(long)]
        all: bool,
    },
    /// Reconcile a tree holding one artist's recordings
    Artist {
        /// Root of the artist tree
        root: PathBuf,
        /// Accepted artist names, preferred first (repeatable)
        #[arg(short, long = "name", required = true)]
        names: Vec<String>,
        /// Match names regardless of case
        #[arg(long)]
        ignore_case: bool,
        /// Only fill missing artist tags
        #[arg(long)]
        missed_only: bool,
        /// Reconcile every track, not only those new since the last run
        #[arg(long)]
        all: bool,
    },
    /// Count tracks per value of one tag
    Stats {
        root: PathBuf,
        #[arg(long, default_value = "artist")]
        alias: TagAlias,
    },
}
