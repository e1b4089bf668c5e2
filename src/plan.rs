use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::groups::SplitGroup;
use crate::page_range::{parse_page_range, RangeError};

/// How the source document should be carved up.
#[derive(Debug, Clone)]
pub enum SplitMode {
    /// One output built from a single range expression.
    Range(String),
    /// One single-page output per source page.
    EveryPage,
    /// One output per named group.
    Groups(Vec<SplitGroup>),
}

/// One output document: its bare name (no extension) and the 0-based source
/// pages it contains, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub output_name: String,
    pub pages: Vec<u32>,
}

/// Ordered list of outputs, derived fresh for each execution.
#[derive(Debug, Clone)]
pub struct SplitPlan {
    pub entries: Vec<PlanEntry>,
}

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-zA-Z0-9]").expect("fixed pattern"));

/// Map a display name onto a filesystem-safe output name: every
/// non-alphanumeric character becomes `_` and the rest is lowercased.
fn sanitize_name(name: &str) -> String {
    NON_ALPHANUMERIC.replace_all(name, "_").to_lowercase()
}

/// Build the split plan for a mode. Pure: same mode and page count always
/// yield the same plan.
///
/// Range mode produces its single entry even when the expression selects no
/// pages; rejecting an empty selection is the caller's job, before anything
/// is executed. Groups whose range parses to an empty set are skipped and
/// contribute no output.
pub fn build_plan(mode: &SplitMode, total_pages: u32) -> Result<SplitPlan, RangeError> {
    let entries = match mode {
        SplitMode::Range(input) => {
            vec![PlanEntry {
                output_name: "split".to_string(),
                pages: parse_page_range(input, total_pages)?,
            }]
        }
        SplitMode::EveryPage => (0..total_pages)
            .map(|index| PlanEntry {
                output_name: format!("page_{}", index + 1),
                pages: vec![index],
            })
            .collect(),
        SplitMode::Groups(groups) => {
            let mut taken: HashMap<String, u32> = HashMap::new();
            let mut entries = Vec::new();

            for group in groups {
                let pages = parse_page_range(&group.range, total_pages)?;
                if pages.is_empty() {
                    continue;
                }

                // Two groups can normalize to the same name; disambiguate
                // with a plan-order suffix so no archive entry is clobbered.
                let base = format!("{}_pages", sanitize_name(&group.name));
                let seen = taken.entry(base.clone()).or_insert(0);
                *seen += 1;
                let output_name = if *seen == 1 {
                    base
                } else {
                    format!("{}_{}", base, *seen)
                };

                entries.push(PlanEntry { output_name, pages });
            }
            entries
        }
    };

    Ok(SplitPlan { entries })
}
