use anyhow::{Context, Result};
use lopdf::Document;
use std::collections::HashSet;
use std::path::Path;

/// Thin boundary over the PDF library. The rest of the crate only ever asks
/// for a page count and for copies of 0-based page index lists; document
/// internals stay in here.
pub struct PdfDocument {
    doc: Document,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read PDF: {}", path.display()))?;
        Self::from_bytes(&bytes)
            .with_context(|| format!("Failed to parse PDF: {}", path.display()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes).context("Failed to parse PDF")?;
        Ok(PdfDocument { doc })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Copy the given 0-based page indices into a new independent document,
    /// preserving source page order and content.
    ///
    /// Works by deleting the complement from a clone of the source, so the
    /// kept pages stay in ascending document order. Orphaned objects are
    /// pruned before the copy is handed back.
    pub fn copy_pages(&self, indices: &[u32]) -> Result<Document> {
        let total = self.page_count();

        for &index in indices {
            if index >= total {
                anyhow::bail!(
                    "Page index {} is out of range (document has {} pages)",
                    index,
                    total
                );
            }
        }

        // lopdf numbers pages from 1.
        let keep: HashSet<u32> = indices.iter().map(|&index| index + 1).collect();
        let to_delete: Vec<u32> = (1..=total).filter(|n| !keep.contains(n)).collect();

        let mut new_doc = self.doc.clone();
        if !to_delete.is_empty() {
            new_doc.delete_pages(&to_delete);
        }
        new_doc.prune_objects();
        new_doc.compress();

        Ok(new_doc)
    }

    /// Serialize a document into an in-memory buffer.
    pub fn save_to_bytes(doc: &mut Document) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .context("Failed to serialize PDF")?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::pdf_with_pages;

    #[test]
    fn test_page_count() {
        let doc = PdfDocument::from_bytes(&pdf_with_pages(4)).unwrap();
        assert_eq!(doc.page_count(), 4);
    }

    #[test]
    fn test_copy_pages_round_trip() {
        let doc = PdfDocument::from_bytes(&pdf_with_pages(5)).unwrap();
        let mut copy = doc.copy_pages(&[1, 2, 4]).unwrap();

        let bytes = PdfDocument::save_to_bytes(&mut copy).unwrap();
        let reloaded = PdfDocument::from_bytes(&bytes).unwrap();
        assert_eq!(reloaded.page_count(), 3);
    }

    #[test]
    fn test_copy_single_page() {
        let doc = PdfDocument::from_bytes(&pdf_with_pages(3)).unwrap();
        let mut copy = doc.copy_pages(&[0]).unwrap();

        let bytes = PdfDocument::save_to_bytes(&mut copy).unwrap();
        assert_eq!(PdfDocument::from_bytes(&bytes).unwrap().page_count(), 1);
    }

    #[test]
    fn test_copy_rejects_out_of_range_index() {
        let doc = PdfDocument::from_bytes(&pdf_with_pages(3)).unwrap();
        assert!(doc.copy_pages(&[3]).is_err());
    }

    #[test]
    fn test_open_missing_file() {
        assert!(PdfDocument::open("/nonexistent/missing.pdf").is_err());
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(PdfDocument::from_bytes(b"not a pdf").is_err());
    }
}
