//! Index command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::Pipeline;
use anyhow::Result;

/// Run the index command.
pub async fn run_index(dir: Option<&str>, settings: Settings) -> Result<()> {
    let dir = match dir {
        Some(dir) => Settings::expand_path(dir),
        None => settings.transcripts_dir(),
    };

    let pipeline = Pipeline::new(settings)?;
    pipeline.ensure_index().await?;

    Output::info(&format!("Indexing transcripts from {}", dir.display()));

    let spinner = Output::spinner("Chunking, embedding, and uploading...");
    let report = pipeline.index_directory(&dir).await;
    spinner.finish_and_clear();

    match report {
        Ok(report) => {
            if report.files_indexed == 0 && report.files_skipped == 0 {
                Output::warning(&format!(
                    "No transcript files found in {}",
                    dir.display()
                ));
                return Ok(());
            }

            Output::success(&format!(
                "Indexed {} records from {} files",
                report.records_indexed, report.files_indexed
            ));

            if report.files_skipped > 0 {
                Output::warning(&format!(
                    "Skipped {} files with unreadable front matter",
                    report.files_skipped
                ));
            }

            if !report.failures.is_empty() {
                Output::warning(&format!(
                    "{} records were rejected by the index:",
                    report.failures.len()
                ));
                for failure in report.failures.iter().take(5) {
                    Output::kv(&failure.id, &failure.reason);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Indexing failed: {}", e));
            return Err(anyhow::anyhow!("{}", e));
        }
    }

    Ok(())
}
