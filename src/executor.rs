use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::pdf::PdfDocument;
use crate::plan::SplitPlan;

/// One finished output: file name (with extension) and document bytes.
#[derive(Debug, Clone)]
pub struct OutputDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Execute a split plan against the source document bytes.
///
/// Each plan entry becomes its own blocking page-copy task; the tasks share
/// the source buffer read-only and have no ordering dependency between them.
/// Results are collected in plan order, not completion order, so output
/// naming stays deterministic. If any entry fails, the whole execution fails
/// and already-produced outputs are discarded.
pub async fn execute(source: Arc<Vec<u8>>, plan: &SplitPlan) -> Result<Vec<OutputDocument>> {
    let mut tasks = Vec::with_capacity(plan.entries.len());

    for entry in &plan.entries {
        let source = Arc::clone(&source);
        let entry = entry.clone();
        let name = entry.output_name.clone();
        tasks.push((
            name,
            tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
                let doc = PdfDocument::from_bytes(&source)?;
                let mut copy = doc.copy_pages(&entry.pages)?;
                PdfDocument::save_to_bytes(&mut copy)
            }),
        ));
    }

    let mut outputs = Vec::with_capacity(tasks.len());
    for (name, task) in tasks {
        let bytes = task
            .await
            .context("page-copy task panicked")?
            .with_context(|| format!("Failed to assemble output \"{name}\""))?;
        debug!(output = %name, bytes = bytes.len(), "assembled split output");
        outputs.push(OutputDocument {
            name: format!("{name}.pdf"),
            bytes,
        });
    }

    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::pdf_with_pages;
    use crate::plan::{PlanEntry, SplitPlan};

    fn plan_of(entries: Vec<PlanEntry>) -> SplitPlan {
        SplitPlan { entries }
    }

    #[tokio::test]
    async fn test_outputs_in_plan_order_with_expected_pages() {
        let source = Arc::new(pdf_with_pages(5));
        let plan = plan_of(vec![
            PlanEntry {
                output_name: "front".to_string(),
                pages: vec![0, 1],
            },
            PlanEntry {
                output_name: "back".to_string(),
                pages: vec![2, 3, 4],
            },
        ]);

        let outputs = execute(source, &plan).await.unwrap();

        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].name, "front.pdf");
        assert_eq!(outputs[1].name, "back.pdf");

        let front = PdfDocument::from_bytes(&outputs[0].bytes).unwrap();
        assert_eq!(front.page_count(), 2);
        let back = PdfDocument::from_bytes(&outputs[1].bytes).unwrap();
        assert_eq!(back.page_count(), 3);
    }

    #[tokio::test]
    async fn test_empty_plan_yields_no_outputs() {
        let source = Arc::new(pdf_with_pages(2));
        let outputs = execute(source, &plan_of(vec![])).await.unwrap();
        assert!(outputs.is_empty());
    }

    #[tokio::test]
    async fn test_any_failure_discards_all_outputs() {
        let source = Arc::new(pdf_with_pages(3));
        // Index 7 is out of range; the parser never produces this, but the
        // executor must still fail closed rather than deliver partials.
        let plan = plan_of(vec![
            PlanEntry {
                output_name: "good".to_string(),
                pages: vec![0],
            },
            PlanEntry {
                output_name: "bad".to_string(),
                pages: vec![7],
            },
        ]);

        assert!(execute(source, &plan).await.is_err());
    }

    #[tokio::test]
    async fn test_unparsable_source_fails() {
        let source = Arc::new(b"not a pdf".to_vec());
        let plan = plan_of(vec![PlanEntry {
            output_name: "out".to_string(),
            pages: vec![0],
        }]);

        assert!(execute(source, &plan).await.is_err());
    }
}
