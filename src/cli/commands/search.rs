//! Search command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::index::{OpenSearchIndex, SearchIndex};
use crate::search::{format_match_results, Searcher};
use anyhow::Result;
use std::sync::Arc;

/// Run the search command (lexical match with highlighting).
pub async fn run_search(query: &str, limit: Option<usize>, mut settings: Settings) -> Result<()> {
    if let Some(limit) = limit {
        settings.search.limit = limit;
    }

    let index: Arc<dyn SearchIndex> = Arc::new(OpenSearchIndex::from_settings(&settings)?);
    let embedder: Arc<dyn Embedder> = Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ));
    let searcher = Searcher::new(index, embedder);

    let spinner = Output::spinner("Searching...");
    let results = searcher.lexical(query).await;
    spinner.finish_and_clear();

    match results {
        Ok(results) => {
            if results.hits.is_empty() {
                Output::warning("No results found matching your query.");
            } else {
                print!("{}", format_match_results(&results));
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(anyhow::anyhow!("{}", e));
        }
    }

    Ok(())
}
