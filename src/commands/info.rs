use crate::pdf::PdfDocument;
use anyhow::{Context, Result};
use std::path::Path;

pub fn run<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let size = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat: {}", path.display()))?
        .len();
    let doc = PdfDocument::open(path)?;

    println!("File: {}", path.display());
    println!("Size: {} bytes", size);
    println!("Pages: {}", doc.page_count());

    Ok(())
}
