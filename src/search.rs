//! Query paths against the search index.
//!
//! Two independent, stateless modes: lexical match with highlighting, and
//! vector similarity over the chunk embeddings. No fusion between them.

use crate::embedding::Embedder;
use crate::error::Result;
use crate::index::{KnnResults, MatchResults, SearchIndex};
use std::sync::Arc;

/// Runs queries against the search index.
pub struct Searcher {
    index: Arc<dyn SearchIndex>,
    embedder: Arc<dyn Embedder>,
    limit: usize,
}

impl Searcher {
    /// Create a new searcher.
    pub fn new(index: Arc<dyn SearchIndex>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            index,
            embedder,
            limit: 5,
        }
    }

    /// Set the maximum number of hits returned by vector queries.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Lexical match query with highlighted excerpts.
    pub async fn lexical(&self, query: &str) -> Result<MatchResults> {
        self.index.match_query(query).await
    }

    /// Vector similarity query: embeds the query text and returns its
    /// nearest chunks.
    pub async fn vector(&self, query: &str) -> Result<KnnResults> {
        let embedding = self.embedder.embed(query).await?;
        self.index.knn_query(&embedding, self.limit).await
    }
}

/// Format lexical hits for display: a total count, then each hit's title
/// and highlighted excerpts.
pub fn format_match_results(results: &MatchResults) -> String {
    let mut out = format!("Number of results: {}\n", results.total);
    for hit in &results.hits {
        out.push_str(&format!(
            "Title: {}\nResults: {}\n",
            hit.title,
            hit.highlights.join("\n")
        ));
    }
    out
}

/// Format knn hits for display: rank, title, and score, then the chunk text.
pub fn format_knn_results(results: &KnnResults) -> String {
    let mut out = format!("Number of results: {}\n", results.total);
    for (i, hit) in results.hits.iter().enumerate() {
        out.push_str(&format!(
            "[{}] {} (score: {:.3})\n{}\n",
            i + 1,
            hit.title,
            hit.score,
            hit.content
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::FakeEmbedder;
    use crate::index::{IndexedRecord, MemoryIndex, SearchIndex};
    use crate::transcript::Episode;
    use chrono::NaiveDate;

    const DIMS: usize = 8;

    fn record(title: &str, content: &str) -> IndexedRecord {
        let episode = Episode {
            title: title.to_string(),
            description: String::new(),
            url: "https://example.com".to_string(),
            pub_date: NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
            body: String::new(),
        };
        IndexedRecord::new(
            "test",
            &episode,
            content.to_string(),
            FakeEmbedder::vector_for(content, DIMS),
        )
    }

    async fn seeded_index() -> Arc<MemoryIndex> {
        let index = Arc::new(MemoryIndex::new(DIMS));
        index
            .bulk_upload(&[
                record("Episode 1", "creating rules for your inbox"),
                record("Episode 2", "entirely different topic matter"),
            ])
            .await
            .unwrap();
        index
    }

    #[tokio::test]
    async fn test_lexical_search_highlights_the_term() {
        let index = seeded_index().await;
        let searcher = Searcher::new(index, Arc::new(FakeEmbedder::new(DIMS)));

        let results = searcher.lexical("rules").await.unwrap();
        assert_eq!(results.total, 1);
        assert_eq!(results.hits[0].title, "Episode 1");
        assert!(results.hits[0].highlights[0].contains("**rules**"));

        let formatted = format_match_results(&results);
        assert!(formatted.starts_with("Number of results: 1\n"));
        assert!(formatted.contains("Title: Episode 1"));
        assert!(formatted.contains("**rules**"));
    }

    #[tokio::test]
    async fn test_vector_search_ranks_identical_text_first() {
        let index = seeded_index().await;
        let searcher = Searcher::new(index, Arc::new(FakeEmbedder::new(DIMS))).with_limit(1);

        let results = searcher.vector("creating rules for your inbox").await.unwrap();
        assert_eq!(results.hits.len(), 1);
        assert_eq!(results.hits[0].content, "creating rules for your inbox");
        assert!((results.hits[0].score - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_format_knn_results_is_ranked() {
        let index = seeded_index().await;
        let searcher = Searcher::new(index, Arc::new(FakeEmbedder::new(DIMS))).with_limit(2);

        let results = searcher.vector("creating rules for your inbox").await.unwrap();
        let formatted = format_knn_results(&results);

        assert!(formatted.starts_with("Number of results: 2\n"));
        let first = formatted.find("[1] Episode 1").unwrap();
        let second = formatted.find("[2] Episode 2").unwrap();
        assert!(first < second);
    }
}
