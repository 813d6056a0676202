//! CLI module for Hark.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Hark - Podcast Transcript Indexing and Search
///
/// A CLI tool that chunks podcast transcripts, embeds them, and indexes them
/// into OpenSearch for lexical and vector search.
#[derive(Parser, Debug)]
#[command(name = "hark")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Hark: verify connectivity and create the index
    Init,

    /// Chunk, embed, and index transcripts from a directory
    Index {
        /// Directory of transcript files (defaults to the configured one)
        dir: Option<String>,
    },

    /// Embed transcripts and write the records to a JSON checkpoint file
    Export {
        /// Directory of transcript files (defaults to the configured one)
        dir: Option<String>,

        /// Checkpoint file to write
        #[arg(short, long, default_value = "records.json")]
        output: String,
    },

    /// Upload records from a JSON checkpoint file
    Upload {
        /// Checkpoint file written by 'hark export'
        file: String,
    },

    /// Lexical search with highlighted excerpts
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Vector similarity search
    Knn {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
