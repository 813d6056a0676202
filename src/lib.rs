//! Hark - Podcast Transcript Indexing and Search
//!
//! A CLI tool that turns a directory of podcast transcripts into a
//! searchable OpenSearch index.
//!
//! # Overview
//!
//! Hark allows you to:
//! - Chunk transcript bodies into overlapping, sentence-aware pieces
//! - Embed each chunk and bulk-index it with its episode metadata
//! - Search the index lexically (with highlighted excerpts) or by vector
//!   similarity
//! - Export embedded records to a JSON checkpoint and upload them later
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `transcript` - Transcript files and their front matter
//! - `chunking` - Recursive character text splitting
//! - `embedding` - Embedding generation
//! - `index` - Search index abstraction (OpenSearch and in-memory)
//! - `pipeline` - Indexing pipeline coordination
//! - `search` - Lexical and vector query paths
//!
//! # Example
//!
//! ```rust,no_run
//! use hark::config::Settings;
//! use hark::pipeline::Pipeline;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = Pipeline::new(settings)?;
//!
//!     pipeline.ensure_index().await?;
//!     let report = pipeline.index_directory(Path::new("transcripts")).await?;
//!     println!("Indexed {} records", report.records_indexed);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod index;
pub mod pipeline;
pub mod search;
pub mod transcript;

pub use error::{HarkError, Result};
