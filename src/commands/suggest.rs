use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::groups::{validate_groups, GroupSet};
use crate::pdf::text::extract_page_texts;
use crate::pdf::PdfDocument;
use crate::suggest::suggest_groups;

/// Ask the model for chapter groups and emit them in the groups-file JSON
/// shape, either to stdout or to a file usable with `groups --groups-file`.
pub async fn run(
    input: &Path,
    model: &str,
    api_key: Option<String>,
    output: Option<&Path>,
) -> Result<()> {
    let api_key = api_key
        .or_else(|| std::env::var("GEMINI_API_KEY").ok())
        .context("No API key; pass --api-key or set GEMINI_API_KEY")?;

    let source = std::fs::read(input)
        .with_context(|| format!("Failed to read PDF: {}", input.display()))?;
    let doc = PdfDocument::from_bytes(&source)
        .with_context(|| format!("Failed to parse PDF: {}", input.display()))?;
    let total_pages = doc.page_count();

    let pages = extract_page_texts(&source)?;
    if pages.is_empty() {
        anyhow::bail!("No extractable text in {}", input.display());
    }

    info!(pages = pages.len(), %model, "requesting chapter suggestions");
    let client = reqwest::Client::new();
    let specs = suggest_groups(&client, &api_key, model, &pages).await?;
    if specs.is_empty() {
        anyhow::bail!("No clear chapter structure detected");
    }

    // Suggestions are untrusted: run them through the same ingestion and
    // validation path as user-entered groups.
    let set = GroupSet::from_specs(specs.iter().cloned());
    let validation = validate_groups(set.groups(), total_pages);
    if !validation.valid {
        match validation.overlapping_pages {
            // Overlapping suggestions are usable (the split can allow
            // overlaps), so surface them without rejecting the output.
            Some(_) => warn!(
                "{}",
                validation.error.as_deref().unwrap_or("overlapping groups")
            ),
            None => anyhow::bail!(
                "Suggested group rejected: {}",
                validation.error.unwrap_or_else(|| "invalid range".to_string())
            ),
        }
    }

    let json = serde_json::to_string_pretty(&specs).context("Failed to serialize groups")?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write: {}", path.display()))?;
            println!("Wrote {} suggested group(s) to {}", specs.len(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
