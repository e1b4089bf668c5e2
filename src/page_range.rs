use std::collections::BTreeSet;
use thiserror::Error;

/// Failure classes for a page-range expression. Each carries the offending
/// token so callers can echo it back to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("invalid range format: \"{token}\"")]
    InvalidFormat { token: String },

    #[error("invalid page number: \"{token}\"")]
    InvalidNumber { token: String },

    #[error("page numbers must be positive: \"{token}\"")]
    NonPositive { token: String },

    #[error("page range out of bounds (max {max}): \"{token}\"")]
    OutOfBounds { token: String, max: u32 },

    #[error("invalid range order (start > end): \"{token}\"")]
    Inverted { token: String },
}

/// Parse a page-range expression like "1-3, 5, 8-10" into a sorted list of
/// unique 0-based page indices.
///
/// Tokens are comma-separated, 1-based, and either a single page ("5") or an
/// inclusive span ("8-10"). Whitespace around tokens and around the `-` is
/// ignored, as are empty tokens from stray commas. An empty expression parses
/// to an empty list. Pages referenced more than once collapse to a single
/// index. Any malformed or out-of-bounds token aborts the whole parse.
pub fn parse_page_range(input: &str, total_pages: u32) -> Result<Vec<u32>, RangeError> {
    let mut pages = BTreeSet::new();

    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        // Split on the first `-` only: "1-3-5" is malformed, not "1-3".
        if let Some((start_str, end_str)) = token.split_once('-') {
            let start = parse_endpoint(start_str, token)?;
            let end = parse_endpoint(end_str, token)?;

            if start < 1 || end < 1 {
                return Err(RangeError::NonPositive {
                    token: token.to_string(),
                });
            }
            if start > i64::from(total_pages) || end > i64::from(total_pages) {
                return Err(RangeError::OutOfBounds {
                    token: token.to_string(),
                    max: total_pages,
                });
            }
            if start > end {
                return Err(RangeError::Inverted {
                    token: token.to_string(),
                });
            }

            for page in start..=end {
                pages.insert(page as u32 - 1);
            }
        } else {
            let page: i64 = token.parse().map_err(|_| RangeError::InvalidNumber {
                token: token.to_string(),
            })?;

            if page < 1 {
                return Err(RangeError::NonPositive {
                    token: token.to_string(),
                });
            }
            if page > i64::from(total_pages) {
                return Err(RangeError::OutOfBounds {
                    token: token.to_string(),
                    max: total_pages,
                });
            }

            pages.insert(page as u32 - 1);
        }
    }

    Ok(pages.into_iter().collect())
}

/// Parse one endpoint of a `N-M` token as a signed base-10 integer, so that
/// "2--3" reaches the non-positive check instead of failing as a format
/// error.
fn parse_endpoint(s: &str, token: &str) -> Result<i64, RangeError> {
    s.trim().parse().map_err(|_| RangeError::InvalidFormat {
        token: token.to_string(),
    })
}
