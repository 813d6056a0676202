//! Search index abstraction for Hark.
//!
//! Provides a trait-based interface over the document store: index
//! creation, bulk upload, and the two query modes.

mod memory;
mod opensearch;

pub use memory::MemoryIndex;
pub use opensearch::{ClusterInfo, ClusterVersion, OpenSearchIndex};

use crate::config::{KnnEngine, SpaceType};
use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;
use uuid::Uuid;

/// One indexable record: a transcript chunk with its embedding and the
/// episode metadata it came from.
///
/// Field names mirror the bulk/checkpoint wire format, so a checkpoint file
/// round-trips losslessly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedRecord {
    /// Generated unique identifier.
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Target index name.
    #[serde(rename = "_index")]
    pub index: String,
    /// Episode title.
    pub title: String,
    /// Episode description.
    pub description: String,
    /// Episode URL.
    pub url: String,
    /// Chunk text.
    pub content: String,
    /// Chunk embedding. Must match the index mapping's dimension.
    pub content_vector: Vec<f32>,
    /// Episode publish date (ISO-8601 on the wire).
    pub pub_date: NaiveDate,
}

impl IndexedRecord {
    /// Build a record for one chunk of an episode, with a fresh identifier.
    pub fn new(
        index: &str,
        episode: &crate::transcript::Episode,
        content: String,
        content_vector: Vec<f32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            index: index.to_string(),
            title: episode.title.clone(),
            description: episode.description.clone(),
            url: episode.url.clone(),
            content,
            content_vector,
            pub_date: episode.pub_date,
        }
    }

    /// The record's document fields, without the routing metadata.
    pub fn document_fields(&self) -> Value {
        json!({
            "title": self.title,
            "description": self.description,
            "url": self.url,
            "content": self.content,
            "content_vector": self.content_vector,
            "pub_date": self.pub_date,
        })
    }
}

/// The fixed index mapping: text fields for lexical search plus an
/// HNSW-indexed vector field for knn search.
pub fn index_mapping(dimension: u32, space_type: SpaceType, engine: KnnEngine) -> Value {
    json!({
        "properties": {
            "title": {"type": "text"},
            "description": {"type": "text"},
            "url": {"type": "keyword"},
            "content": {"type": "text"},
            "content_vector": {
                "type": "knn_vector",
                "dimension": dimension,
                "method": {
                    "name": "hnsw",
                    "space_type": space_type.to_string(),
                    "engine": engine.to_string(),
                },
            },
            "pub_date": {"type": "date"},
        }
    })
}

/// Outcome of a bulk upload: per-batch success/failure summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkSummary {
    /// Number of records accepted by the store.
    pub succeeded: usize,
    /// Records the store rejected, with reasons.
    pub failed: Vec<BulkFailure>,
}

impl BulkSummary {
    /// Merge another batch's summary into this one.
    pub fn merge(&mut self, other: BulkSummary) {
        self.succeeded += other.succeeded;
        self.failed.extend(other.failed);
    }
}

/// A single rejected record within a bulk upload.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkFailure {
    /// Identifier of the rejected record.
    pub id: String,
    /// Store-reported reason.
    pub reason: String,
}

/// Results of a lexical match query.
#[derive(Debug, Clone)]
pub struct MatchResults {
    /// Total matching records reported by the store.
    pub total: u64,
    /// Ranked hits.
    pub hits: Vec<MatchHit>,
}

/// One lexical hit: the record's title plus highlighted content excerpts.
#[derive(Debug, Clone)]
pub struct MatchHit {
    pub title: String,
    pub highlights: Vec<String>,
    pub score: f32,
}

/// Results of a knn query.
#[derive(Debug, Clone)]
pub struct KnnResults {
    /// Total hits returned.
    pub total: u64,
    /// Hits ranked by the configured distance metric.
    pub hits: Vec<KnnHit>,
}

/// One vector hit.
#[derive(Debug, Clone)]
pub struct KnnHit {
    pub title: String,
    pub content: String,
    pub score: f32,
}

/// Trait for search index implementations.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Create the index with its fixed mapping. Idempotent: an index that
    /// already exists with the same name is not an error.
    async fn create_index(&self) -> Result<()>;

    /// Submit all records in one batch. Partial failures are reported in the
    /// summary and do not roll back successful writes.
    async fn bulk_upload(&self, records: &[IndexedRecord]) -> Result<BulkSummary>;

    /// Lexical match query on the content field, with highlighted excerpts.
    async fn match_query(&self, text: &str) -> Result<MatchResults>;

    /// Approximate nearest-neighbor query over the vector field, returning
    /// up to `k` hits.
    async fn knn_query(&self, vector: &[f32], k: usize) -> Result<KnnResults>;
}

/// Serialize records to a JSON checkpoint file.
///
/// A later run can upload from the checkpoint without recomputing
/// embeddings.
pub fn write_checkpoint(path: &Path, records: &[IndexedRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load records from a JSON checkpoint file.
pub fn read_checkpoint(path: &Path) -> Result<Vec<IndexedRecord>> {
    let content = std::fs::read_to_string(path)?;
    let records: Vec<IndexedRecord> = serde_json::from_str(&content)?;
    Ok(records)
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Compute Euclidean (L2) distance between two vectors.
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::MAX;
    }
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Episode;

    fn sample_episode() -> Episode {
        Episode {
            title: "Episode 1".to_string(),
            description: "The first episode".to_string(),
            url: "https://example.com/1".to_string(),
            pub_date: NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
            body: String::new(),
        }
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_l2_distance() {
        let a = vec![0.0, 0.0];
        let b = vec![3.0, 4.0];
        assert!((l2_distance(&a, &b) - 5.0).abs() < 0.001);
        assert_eq!(l2_distance(&a, &a), 0.0);
    }

    #[test]
    fn test_record_serializes_wire_field_names() {
        let record = IndexedRecord::new(
            "embedded_transcripts",
            &sample_episode(),
            "chunk text".to_string(),
            vec![0.1, 0.2],
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["_index"], "embedded_transcripts");
        assert!(value["_id"].is_string());
        assert_eq!(value["pub_date"], "2023-01-05");
        assert_eq!(value["content"], "chunk text");
    }

    #[test]
    fn test_fresh_identifiers_per_record() {
        let episode = sample_episode();
        let a = IndexedRecord::new("idx", &episode, "a".to_string(), vec![]);
        let b = IndexedRecord::new("idx", &episode, "a".to_string(), vec![]);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_index_mapping_shape() {
        let mapping = index_mapping(768, SpaceType::Cosine, KnnEngine::Nmslib);
        assert_eq!(mapping["properties"]["content_vector"]["dimension"], 768);
        assert_eq!(
            mapping["properties"]["content_vector"]["method"]["space_type"],
            "cosinesimil"
        );
        assert_eq!(
            mapping["properties"]["content_vector"]["method"]["engine"],
            "nmslib"
        );
        assert_eq!(mapping["properties"]["url"]["type"], "keyword");
        assert_eq!(mapping["properties"]["pub_date"]["type"], "date");
    }

    #[test]
    fn test_checkpoint_roundtrip() {
        let episode = sample_episode();
        let records = vec![
            IndexedRecord::new("idx", &episode, "first chunk".to_string(), vec![0.5, -0.5]),
            IndexedRecord::new("idx", &episode, "second chunk".to_string(), vec![1.0, 0.0]),
        ];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        write_checkpoint(&path, &records).unwrap();

        let reloaded = read_checkpoint(&path).unwrap();
        assert_eq!(reloaded, records);
    }
}
