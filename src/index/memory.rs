//! In-memory search index implementation.
//!
//! Useful for testing and offline inspection of the pipeline.

use super::{
    cosine_similarity, l2_distance, BulkFailure, BulkSummary, IndexedRecord, KnnHit, KnnResults,
    MatchHit, MatchResults, SearchIndex,
};
use crate::config::SpaceType;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::RwLock;

/// In-memory search index.
pub struct MemoryIndex {
    records: RwLock<Vec<IndexedRecord>>,
    dimension: usize,
    space_type: SpaceType,
    limit: usize,
    highlight_pre: String,
    highlight_post: String,
}

impl MemoryIndex {
    /// Create an empty index expecting vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            dimension,
            space_type: SpaceType::Cosine,
            limit: 5,
            highlight_pre: "**".to_string(),
            highlight_post: "**".to_string(),
        }
    }

    /// Override the distance metric used by knn queries.
    pub fn with_space_type(mut self, space_type: SpaceType) -> Self {
        self.space_type = space_type;
        self
    }

    /// Override the maximum number of match hits returned.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Override the highlight markers.
    pub fn with_highlight(mut self, pre: &str, post: &str) -> Self {
        self.highlight_pre = pre.to_string();
        self.highlight_post = post.to_string();
        self
    }

    /// Number of records currently held.
    pub fn record_count(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Snapshot of all held records.
    pub fn records(&self) -> Vec<IndexedRecord> {
        self.records.read().unwrap().clone()
    }

    fn score(&self, query: &[f32], candidate: &[f32]) -> f32 {
        match self.space_type {
            SpaceType::Cosine => cosine_similarity(query, candidate),
            // Negate so that higher is always closer.
            SpaceType::L2 => -l2_distance(query, candidate),
        }
    }

    fn highlight(&self, content: &str, terms: &[String]) -> String {
        content
            .split_whitespace()
            .map(|word| {
                let core = word.trim_matches(|c: char| !c.is_alphanumeric());
                if !core.is_empty() && terms.iter().any(|t| t.eq_ignore_ascii_case(core)) {
                    word.replacen(
                        core,
                        &format!("{}{}{}", self.highlight_pre, core, self.highlight_post),
                        1,
                    )
                } else {
                    word.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    async fn create_index(&self) -> Result<()> {
        Ok(())
    }

    async fn bulk_upload(&self, records: &[IndexedRecord]) -> Result<BulkSummary> {
        let mut store = self.records.write().unwrap();
        let mut summary = BulkSummary::default();

        for record in records {
            if record.content_vector.len() != self.dimension {
                summary.failed.push(BulkFailure {
                    id: record.id.to_string(),
                    reason: format!(
                        "content_vector has {} dimensions, index expects {}",
                        record.content_vector.len(),
                        self.dimension
                    ),
                });
                continue;
            }
            store.push(record.clone());
            summary.succeeded += 1;
        }

        Ok(summary)
    }

    async fn match_query(&self, text: &str) -> Result<MatchResults> {
        let terms: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
        let records = self.records.read().unwrap();

        let mut hits: Vec<MatchHit> = records
            .iter()
            .filter_map(|record| {
                let matched = terms
                    .iter()
                    .filter(|term| record.content.to_lowercase().contains(*term))
                    .count();
                if matched == 0 {
                    return None;
                }
                Some(MatchHit {
                    title: record.title.clone(),
                    highlights: vec![self.highlight(&record.content, &terms)],
                    score: matched as f32,
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        let total = hits.len() as u64;
        hits.truncate(self.limit);

        Ok(MatchResults { total, hits })
    }

    async fn knn_query(&self, vector: &[f32], k: usize) -> Result<KnnResults> {
        let records = self.records.read().unwrap();

        let mut hits: Vec<KnnHit> = records
            .iter()
            .map(|record| KnnHit {
                title: record.title.clone(),
                content: record.content.clone(),
                score: self.score(vector, &record.content_vector),
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);
        let total = hits.len() as u64;

        Ok(KnnResults { total, hits })
    }
}
