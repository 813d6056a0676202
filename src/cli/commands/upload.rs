//! Upload command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::Pipeline;
use anyhow::Result;

/// Run the upload command.
pub async fn run_upload(file: &str, settings: Settings) -> Result<()> {
    let path = Settings::expand_path(file);

    let pipeline = Pipeline::new(settings)?;
    pipeline.ensure_index().await?;

    let spinner = Output::spinner("Uploading records...");
    let summary = pipeline.upload_from_file(&path).await;
    spinner.finish_and_clear();

    match summary {
        Ok(summary) => {
            Output::success(&format!(
                "Uploaded {} records from {}",
                summary.succeeded,
                path.display()
            ));
            if !summary.failed.is_empty() {
                Output::warning(&format!(
                    "{} records were rejected by the index:",
                    summary.failed.len()
                ));
                for failure in summary.failed.iter().take(5) {
                    Output::kv(&failure.id, &failure.reason);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Upload failed: {}", e));
            return Err(anyhow::anyhow!("{}", e));
        }
    }

    Ok(())
}
