use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::commands::archive_name;
use crate::executor;
use crate::package;
use crate::pdf::PdfDocument;
use crate::plan::{build_plan, SplitMode};

/// Split a document into one PDF per page, writing either loose files into a
/// directory or a single ZIP archive.
pub async fn run(input: &Path, output_dir: Option<&Path>, zip: Option<&Path>) -> Result<()> {
    let source = std::fs::read(input)
        .with_context(|| format!("Failed to read PDF: {}", input.display()))?;
    let doc = PdfDocument::from_bytes(&source)
        .with_context(|| format!("Failed to parse PDF: {}", input.display()))?;
    let total_pages = doc.page_count();

    if total_pages == 0 {
        anyhow::bail!("Document has no pages");
    }

    let plan = build_plan(&SplitMode::EveryPage, total_pages)?;
    info!(pages = total_pages, "splitting every page");
    let outputs = executor::execute(Arc::new(source), &plan).await?;

    match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            for output in &outputs {
                std::fs::write(dir.join(&output.name), &output.bytes)
                    .with_context(|| format!("Failed to write: {}", output.name))?;
            }
            println!("Split {} pages into {}", total_pages, dir.display());
        }
        None => {
            let archive_path = zip
                .map(Path::to_path_buf)
                .unwrap_or_else(|| archive_name(input, "_all_pages"));
            let archive = package::write_zip(&outputs)?;
            std::fs::write(&archive_path, archive)
                .with_context(|| format!("Failed to write: {}", archive_path.display()))?;
            println!("Split {} pages into {}", total_pages, archive_path.display());
        }
    }

    Ok(())
}
