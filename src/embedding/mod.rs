//! Embedding generation for indexing and semantic search.

mod openai;

pub use openai::OpenAIEmbedder;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get the embedding dimensions.
    fn dimensions(&self) -> usize;
}

/// Deterministic embedder for tests: a seeded hash of the text per dimension,
/// so identical texts map to identical vectors and distinct texts differ.
#[cfg(test)]
pub struct FakeEmbedder {
    dimensions: usize,
}

#[cfg(test)]
impl FakeEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    pub fn vector_for(text: &str, dimensions: usize) -> Vec<f32> {
        (0..dimensions)
            .map(|dim| {
                let mut h: u64 = 0xcbf29ce484222325 ^ (dim as u64).wrapping_mul(0x100000001b3);
                for b in text.bytes() {
                    h ^= u64::from(b);
                    h = h.wrapping_mul(0x100000001b3);
                }
                ((h % 2000) as f32 / 1000.0) - 1.0
            })
            .collect()
    }
}

#[cfg(test)]
#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(Self::vector_for(text, self.dimensions))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| Self::vector_for(t, self.dimensions))
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_embedder_is_deterministic() {
        let embedder = FakeEmbedder::new(8);
        let a = embedder.embed("creating rules").await.unwrap();
        let b = embedder.embed("creating rules").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
    }

    #[tokio::test]
    async fn test_fake_embedder_distinct_texts_differ() {
        let embedder = FakeEmbedder::new(8);
        let vectors = embedder
            .embed_batch(&["first text".to_string(), "second text".to_string()])
            .await
            .unwrap();
        assert_eq!(vectors.len(), 2);
        assert_ne!(vectors[0], vectors[1]);
    }
}
