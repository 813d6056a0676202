//! Configuration module for Hark.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    ChunkingSettings, EmbeddingSettings, GeneralSettings, KnnEngine, OpenSearchSettings,
    SearchSettings, Settings, SpaceType,
};
