//! Configuration settings for Hark.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub opensearch: OpenSearchSettings,
    pub embedding: EmbeddingSettings,
    pub chunking: ChunkingSettings,
    pub search: SearchSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Default directory containing transcript files.
    pub transcripts_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            transcripts_dir: "transcripts".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Distance metric used by the vector field's HNSW method.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SpaceType {
    /// Cosine similarity ("cosinesimil" on the wire).
    #[default]
    #[serde(rename = "cosinesimil", alias = "cosine")]
    Cosine,
    /// Euclidean distance.
    L2,
}

impl std::str::FromStr for SpaceType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cosinesimil" | "cosine" => Ok(SpaceType::Cosine),
            "l2" | "euclidean" => Ok(SpaceType::L2),
            _ => Err(format!("Unknown space type: {}", s)),
        }
    }
}

impl std::fmt::Display for SpaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpaceType::Cosine => write!(f, "cosinesimil"),
            SpaceType::L2 => write!(f, "l2"),
        }
    }
}

/// ANN backend for the vector field's HNSW method.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KnnEngine {
    #[default]
    Nmslib,
    Faiss,
}

impl std::str::FromStr for KnnEngine {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nmslib" => Ok(KnnEngine::Nmslib),
            "faiss" => Ok(KnnEngine::Faiss),
            _ => Err(format!("Unknown knn engine: {}", s)),
        }
    }
}

impl std::fmt::Display for KnnEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KnnEngine::Nmslib => write!(f, "nmslib"),
            KnnEngine::Faiss => write!(f, "faiss"),
        }
    }
}

/// OpenSearch connection and index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenSearchSettings {
    /// Connection URI. Falls back to the OPENSEARCH_SERVICE_URI environment
    /// variable when unset.
    pub url: Option<String>,
    /// Target index name.
    pub index: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Distance metric for the vector field.
    pub space_type: SpaceType,
    /// ANN engine for the vector field.
    pub engine: KnnEngine,
}

impl Default for OpenSearchSettings {
    fn default() -> Self {
        Self {
            url: None,
            index: "embedded_transcripts".to_string(),
            timeout_seconds: 100,
            space_type: SpaceType::Cosine,
            engine: KnnEngine::Nmslib,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding provider (openai).
    pub provider: String,
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions. Must match the index mapping.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 768,
        }
    }
}

/// Transcript chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Maximum chunk size in characters.
    pub max_chars: usize,
    /// Characters of context shared between consecutive chunks.
    pub overlap: usize,
    /// Separators tried in priority order when splitting.
    pub separators: Vec<String>,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            max_chars: 64,
            overlap: 20,
            separators: vec![
                ".".to_string(),
                "!".to_string(),
                "?".to_string(),
                "\n".to_string(),
            ],
        }
    }
}

/// Query settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Neighbors explored by the knn query.
    pub k: usize,
    /// Maximum hits returned per query.
    pub limit: usize,
    /// Marker inserted before a highlighted term.
    pub highlight_pre: String,
    /// Marker inserted after a highlighted term.
    pub highlight_post: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            k: 10,
            limit: 5,
            highlight_pre: "**".to_string(),
            highlight_post: "**".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::HarkError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hark")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded default transcripts directory.
    pub fn transcripts_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.transcripts_dir)
    }

    /// Resolve the OpenSearch connection URI.
    ///
    /// Prefers the config value; falls back to the OPENSEARCH_SERVICE_URI
    /// environment variable.
    pub fn opensearch_url(&self) -> crate::error::Result<String> {
        if let Some(url) = &self.opensearch.url {
            if !url.is_empty() {
                return Ok(url.clone());
            }
        }
        std::env::var("OPENSEARCH_SERVICE_URI").map_err(|_| {
            crate::error::HarkError::Config(
                "No OpenSearch connection URI configured. Set opensearch.url in the config \
                 file or the OPENSEARCH_SERVICE_URI environment variable."
                    .to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline() {
        let settings = Settings::default();
        assert_eq!(settings.opensearch.index, "embedded_transcripts");
        assert_eq!(settings.embedding.dimensions, 768);
        assert_eq!(settings.chunking.max_chars, 64);
        assert_eq!(settings.chunking.overlap, 20);
        assert_eq!(settings.chunking.separators, vec![".", "!", "?", "\n"]);
        assert_eq!(settings.opensearch.space_type, SpaceType::Cosine);
        assert_eq!(settings.opensearch.engine, KnnEngine::Nmslib);
    }

    #[test]
    fn test_space_type_parsing() {
        assert_eq!("cosinesimil".parse::<SpaceType>().unwrap(), SpaceType::Cosine);
        assert_eq!("cosine".parse::<SpaceType>().unwrap(), SpaceType::Cosine);
        assert_eq!("l2".parse::<SpaceType>().unwrap(), SpaceType::L2);
        assert!("manhattan".parse::<SpaceType>().is_err());
        assert_eq!(SpaceType::Cosine.to_string(), "cosinesimil");
    }

    #[test]
    fn test_settings_roundtrip() {
        let mut settings = Settings::default();
        settings.opensearch.index = "test_index".to_string();
        settings.search.k = 10000;

        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let reloaded: Settings = toml::from_str(&toml_str).unwrap();

        assert_eq!(reloaded.opensearch.index, "test_index");
        assert_eq!(reloaded.search.k, 10000);
        assert_eq!(reloaded.opensearch.space_type, SpaceType::Cosine);
    }
}
