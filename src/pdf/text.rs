use anyhow::{Context, Result};

/// Text content of one page, 1-based.
#[derive(Debug, Clone)]
pub struct PageText {
    pub page: u32,
    pub text: String,
}

/// Extract per-page text from a PDF, dropping pages with no text content.
///
/// Textless pages carry no signal for chapter detection and only inflate the
/// prompt, so they are filtered out here rather than by every caller.
pub fn extract_page_texts(bytes: &[u8]) -> Result<Vec<PageText>> {
    let full_text = pdf_extract::extract_text_from_mem(bytes)
        .context("Failed to extract text from PDF")?;
    Ok(paginate(&full_text))
}

/// pdf-extract separates pages with form feed characters.
fn paginate(full_text: &str) -> Vec<PageText> {
    full_text
        .split('\x0C')
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(index, text)| PageText {
            page: index as u32 + 1,
            text: text.trim().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_splits_on_form_feed() {
        let pages = paginate("first\x0Csecond\x0Cthird");
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].page, 1);
        assert_eq!(pages[0].text, "first");
        assert_eq!(pages[2].page, 3);
        assert_eq!(pages[2].text, "third");
    }

    #[test]
    fn test_paginate_skips_blank_pages_but_keeps_numbering() {
        let pages = paginate("intro\x0C   \x0Cbody");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page, 1);
        assert_eq!(pages[1].page, 3);
        assert_eq!(pages[1].text, "body");
    }

    #[test]
    fn test_paginate_empty_document() {
        assert!(paginate("").is_empty());
    }
}
