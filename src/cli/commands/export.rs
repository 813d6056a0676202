//! Export command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::OpenAIEmbedder;
use crate::index::MemoryIndex;
use crate::pipeline::Pipeline;
use anyhow::Result;
use std::sync::Arc;

/// Run the export command.
///
/// Export never talks to OpenSearch, so the pipeline is wired with an
/// in-memory index that is simply never uploaded to.
pub async fn run_export(dir: Option<&str>, output: &str, settings: Settings) -> Result<()> {
    let dir = match dir {
        Some(dir) => Settings::expand_path(dir),
        None => settings.transcripts_dir(),
    };
    let output = Settings::expand_path(output);

    let embedder = Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ));
    let index = Arc::new(MemoryIndex::new(settings.embedding.dimensions as usize));
    let pipeline = Pipeline::with_components(settings, embedder, index);

    Output::info(&format!("Embedding transcripts from {}", dir.display()));

    let spinner = Output::spinner("Chunking and embedding...");
    let report = pipeline.export_records(&dir, &output).await;
    spinner.finish_and_clear();

    match report {
        Ok(report) => {
            Output::success(&format!(
                "Wrote {} records from {} files to {}",
                report.records_written,
                report.files_exported,
                output.display()
            ));
            if report.files_skipped > 0 {
                Output::warning(&format!(
                    "Skipped {} files with unreadable front matter",
                    report.files_skipped
                ));
            }
        }
        Err(e) => {
            Output::error(&format!("Export failed: {}", e));
            return Err(anyhow::anyhow!("{}", e));
        }
    }

    Ok(())
}
