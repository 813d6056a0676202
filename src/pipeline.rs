//! Indexing pipeline for Hark.
//!
//! Coordinates the flow from transcript files to indexed records: parse
//! front matter, chunk the body, embed each chunk, and bulk-upload.

use crate::chunking::TextSplitter;
use crate::config::Settings;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::Result;
use crate::index::{
    read_checkpoint, write_checkpoint, BulkFailure, BulkSummary, IndexedRecord, OpenSearchIndex,
    SearchIndex,
};
use crate::transcript::Episode;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The indexing pipeline.
pub struct Pipeline {
    settings: Settings,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn SearchIndex>,
    splitter: TextSplitter,
}

/// Result of indexing a directory of transcripts.
#[derive(Debug, Default)]
pub struct IndexReport {
    /// Transcript files fully processed.
    pub files_indexed: usize,
    /// Files skipped because their front matter could not be parsed.
    pub files_skipped: usize,
    /// Records accepted by the index.
    pub records_indexed: usize,
    /// Records the index rejected.
    pub failures: Vec<BulkFailure>,
}

/// Result of exporting records to a checkpoint file.
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Transcript files fully processed.
    pub files_exported: usize,
    /// Files skipped because their front matter could not be parsed.
    pub files_skipped: usize,
    /// Records written to the checkpoint.
    pub records_written: usize,
}

impl Pipeline {
    /// Create a pipeline with the default components: the OpenAI embedder
    /// and an OpenSearch index resolved from settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let embedder: Arc<dyn Embedder> = Arc::new(OpenAIEmbedder::with_config(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        ));
        let index: Arc<dyn SearchIndex> = Arc::new(OpenSearchIndex::from_settings(&settings)?);
        Ok(Self::with_components(settings, embedder, index))
    }

    /// Create a pipeline with custom components.
    pub fn with_components(
        settings: Settings,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn SearchIndex>,
    ) -> Self {
        let splitter = TextSplitter::from_settings(&settings.chunking);
        Self {
            settings,
            embedder,
            index,
            splitter,
        }
    }

    /// Create the target index with its mapping. Safe to call repeatedly.
    pub async fn ensure_index(&self) -> Result<()> {
        self.index.create_index().await
    }

    /// Index every transcript file under `dir`, one bulk upload per file.
    ///
    /// Files are visited in name order. A file whose front matter does not
    /// parse is skipped with a warning; embedding and upload errors abort
    /// the run.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub async fn index_directory(&self, dir: &Path) -> Result<IndexReport> {
        let mut report = IndexReport::default();

        for file in transcript_files(dir)? {
            let episode = match Episode::from_file(&file) {
                Ok(episode) => episode,
                Err(e) => {
                    warn!("Skipping {}: {}", file.display(), e);
                    report.files_skipped += 1;
                    continue;
                }
            };

            info!("Indexing {}", episode.title);
            let records = self.build_records(&episode).await?;
            let summary = self.index.bulk_upload(&records).await?;

            report.files_indexed += 1;
            report.records_indexed += summary.succeeded;
            report.failures.extend(summary.failed);
        }

        Ok(report)
    }

    /// Chunk and embed one episode, producing a record per chunk.
    pub async fn build_records(&self, episode: &Episode) -> Result<Vec<IndexedRecord>> {
        let chunks = self.splitter.split(&episode.body);
        if chunks.is_empty() {
            warn!("No content to index for {}", episode.title);
            return Ok(Vec::new());
        }

        let embeddings = self.embedder.embed_batch(&chunks).await?;

        let records = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(content, vector)| {
                IndexedRecord::new(&self.settings.opensearch.index, episode, content, vector)
            })
            .collect();

        Ok(records)
    }

    /// Build records for every transcript under `dir` and write them to a
    /// JSON checkpoint file instead of uploading.
    #[instrument(skip(self), fields(dir = %dir.display(), output = %output.display()))]
    pub async fn export_records(&self, dir: &Path, output: &Path) -> Result<ExportReport> {
        let mut report = ExportReport::default();
        let mut records = Vec::new();

        for file in transcript_files(dir)? {
            let episode = match Episode::from_file(&file) {
                Ok(episode) => episode,
                Err(e) => {
                    warn!("Skipping {}: {}", file.display(), e);
                    report.files_skipped += 1;
                    continue;
                }
            };

            info!("Embedding {}", episode.title);
            records.extend(self.build_records(&episode).await?);
            report.files_exported += 1;
        }

        write_checkpoint(output, &records)?;
        report.records_written = records.len();
        info!(
            "Wrote {} records to {}",
            report.records_written,
            output.display()
        );

        Ok(report)
    }

    /// Upload records from a checkpoint file written by [`export_records`].
    ///
    /// Embeddings are reused as stored, so no embedding calls are made.
    ///
    /// [`export_records`]: Pipeline::export_records
    pub async fn upload_from_file(&self, path: &Path) -> Result<BulkSummary> {
        let records = read_checkpoint(path)?;
        info!("Uploading {} records from {}", records.len(), path.display());
        self.index.bulk_upload(&records).await
    }
}

/// Regular files under `dir`, sorted by name.
fn transcript_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::FakeEmbedder;
    use crate::error::HarkError;
    use crate::index::MemoryIndex;
    use chrono::NaiveDate;

    const DIMS: usize = 8;

    fn test_pipeline() -> (Pipeline, Arc<MemoryIndex>) {
        let mut settings = Settings::default();
        settings.embedding.dimensions = DIMS as u32;

        let embedder = Arc::new(FakeEmbedder::new(DIMS));
        let index = Arc::new(MemoryIndex::new(DIMS));
        let pipeline = Pipeline::with_components(settings, embedder, index.clone());
        (pipeline, index)
    }

    fn write_transcript(dir: &Path, name: &str, title: &str, body: &str) {
        let text = format!(
            "---\ntitle: {}\ndescription: Test episode\nurl: https://example.com/{}\npub_date: January 5, 2023\n---\n{}",
            title, name, body
        );
        std::fs::write(dir.join(name), text).unwrap();
    }

    /// Eight 25-char sentences; the default 64/20 chunking packs two per
    /// chunk, giving exactly four.
    fn two_hundred_char_body() -> String {
        (1..=8)
            .map(|i| format!("Sentence number {:02} filed.", i))
            .collect()
    }

    #[tokio::test]
    async fn test_build_records_one_per_chunk() {
        let (pipeline, _) = test_pipeline();
        let episode = Episode {
            title: "Episode 1".to_string(),
            description: "The first episode".to_string(),
            url: "https://example.com/1".to_string(),
            pub_date: NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
            body: two_hundred_char_body(),
        };

        let records = pipeline.build_records(&episode).await.unwrap();
        assert_eq!(records.len(), 4);
        for record in &records {
            assert_eq!(record.index, "embedded_transcripts");
            assert_eq!(record.title, "Episode 1");
            assert_eq!(record.pub_date, episode.pub_date);
            assert_eq!(record.content_vector.len(), DIMS);
            assert!(!record.content.is_empty());
        }
    }

    #[tokio::test]
    async fn test_index_directory_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write_transcript(dir.path(), "episode-1.txt", "Episode 1", &two_hundred_char_body());

        let (pipeline, index) = test_pipeline();
        let report = pipeline.index_directory(dir.path()).await.unwrap();

        assert_eq!(report.files_indexed, 1);
        assert_eq!(report.files_skipped, 0);
        assert_eq!(report.records_indexed, 4);
        assert!(report.failures.is_empty());
        assert_eq!(index.record_count(), 4);
    }

    #[tokio::test]
    async fn test_index_directory_skips_unparseable_files() {
        let dir = tempfile::tempdir().unwrap();
        write_transcript(dir.path(), "good.txt", "Good Episode", "Some content here.");
        std::fs::write(dir.path().join("bad.txt"), "no front matter at all").unwrap();

        let (pipeline, index) = test_pipeline();
        let report = pipeline.index_directory(dir.path()).await.unwrap();

        assert_eq!(report.files_indexed, 1);
        assert_eq!(report.files_skipped, 1);
        assert!(index.record_count() > 0);
    }

    #[tokio::test]
    async fn test_index_directory_empty_dir_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let (pipeline, index) = test_pipeline();

        let report = pipeline.index_directory(dir.path()).await.unwrap();
        assert_eq!(report.files_indexed, 0);
        assert_eq!(report.records_indexed, 0);
        assert_eq!(index.record_count(), 0);
    }

    #[tokio::test]
    async fn test_index_directory_missing_dir_is_io_error() {
        let (pipeline, _) = test_pipeline();
        let err = pipeline
            .index_directory(Path::new("/nonexistent/transcripts"))
            .await
            .unwrap_err();
        assert!(matches!(err, HarkError::Io(_)));
    }

    #[tokio::test]
    async fn test_export_then_upload_reproduces_records() {
        let dir = tempfile::tempdir().unwrap();
        write_transcript(dir.path(), "episode-1.txt", "Episode 1", &two_hundred_char_body());
        let checkpoint = dir.path().join("records.json");

        let (pipeline, _) = test_pipeline();
        let report = pipeline
            .export_records(dir.path(), &checkpoint)
            .await
            .unwrap();
        assert_eq!(report.files_exported, 1);
        assert_eq!(report.records_written, 4);

        // The checkpoint carries the wire field names.
        let raw = std::fs::read_to_string(&checkpoint).unwrap();
        assert!(raw.contains("\"_id\""));
        assert!(raw.contains("\"_index\""));

        let exported = read_checkpoint(&checkpoint).unwrap();

        let (pipeline, index) = test_pipeline();
        let summary = pipeline.upload_from_file(&checkpoint).await.unwrap();
        assert_eq!(summary.succeeded, 4);
        assert!(summary.failed.is_empty());
        assert_eq!(index.records(), exported);
    }

    #[tokio::test]
    async fn test_files_visited_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write_transcript(dir.path(), "b-second.txt", "Second", "Beta content.");
        write_transcript(dir.path(), "a-first.txt", "First", "Alpha content.");

        let (pipeline, index) = test_pipeline();
        pipeline.index_directory(dir.path()).await.unwrap();

        let records = index.records();
        assert_eq!(records[0].title, "First");
        assert_eq!(records[records.len() - 1].title, "Second");
    }
}
