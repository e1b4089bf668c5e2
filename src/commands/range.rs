use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::executor;
use crate::pdf::PdfDocument;
use crate::plan::{build_plan, SplitMode};

pub async fn run<P: AsRef<Path>, Q: AsRef<Path>>(input: P, pages: &str, output: Q) -> Result<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    let source = std::fs::read(input)
        .with_context(|| format!("Failed to read PDF: {}", input.display()))?;
    let doc = PdfDocument::from_bytes(&source)
        .with_context(|| format!("Failed to parse PDF: {}", input.display()))?;
    let total_pages = doc.page_count();

    let plan = build_plan(&SplitMode::Range(pages.to_string()), total_pages)?;
    let page_count = plan.entries[0].pages.len();
    if page_count == 0 {
        anyhow::bail!("No pages specified");
    }

    info!(pages = page_count, "extracting page range");
    let outputs = executor::execute(Arc::new(source), &plan).await?;
    let out = outputs.into_iter().next().context("No output produced")?;

    std::fs::write(output, &out.bytes)
        .with_context(|| format!("Failed to write: {}", output.display()))?;

    println!("Extracted {} page(s) to {}", page_count, output.display());

    Ok(())
}
