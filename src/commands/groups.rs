use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::commands::archive_name;
use crate::executor;
use crate::groups::{validate_groups, GroupSet, GroupSpec};
use crate::package;
use crate::pdf::PdfDocument;
use crate::plan::{build_plan, SplitMode};

/// Split a document into named groups, packaged as a ZIP archive.
///
/// Groups come from a JSON file (the shape `suggest` emits), from repeated
/// `--group NAME=RANGE` flags, or both; file entries come first. Overlap
/// validation runs unless the caller allows overlaps, in which case it is
/// bypassed entirely.
pub async fn run(
    input: &Path,
    group_flags: &[String],
    groups_file: Option<&Path>,
    allow_overlaps: bool,
    output: Option<&Path>,
) -> Result<()> {
    let mut specs = Vec::new();
    if let Some(file) = groups_file {
        specs.extend(read_groups_file(file)?);
    }
    for flag in group_flags {
        specs.push(parse_group_flag(flag)?);
    }
    if specs.is_empty() {
        anyhow::bail!("No groups specified; pass --group or --groups-file");
    }

    let set = GroupSet::from_specs(specs);

    let source = std::fs::read(input)
        .with_context(|| format!("Failed to read PDF: {}", input.display()))?;
    let doc = PdfDocument::from_bytes(&source)
        .with_context(|| format!("Failed to parse PDF: {}", input.display()))?;
    let total_pages = doc.page_count();

    if !allow_overlaps {
        let validation = validate_groups(set.groups(), total_pages);
        if !validation.valid {
            anyhow::bail!(
                "{}",
                validation.error.unwrap_or_else(|| "Invalid groups".to_string())
            );
        }
    }

    let plan = build_plan(&SplitMode::Groups(set.groups().to_vec()), total_pages)?;
    if plan.entries.is_empty() {
        anyhow::bail!("None of the groups selected any pages");
    }

    info!(groups = set.len(), outputs = plan.entries.len(), "splitting groups");
    let outputs = executor::execute(Arc::new(source), &plan).await?;

    let archive_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| archive_name(input, "_groups"));
    let archive = package::write_zip(&outputs)?;
    std::fs::write(&archive_path, archive)
        .with_context(|| format!("Failed to write: {}", archive_path.display()))?;

    println!(
        "Wrote {} group(s) to {}",
        outputs.len(),
        archive_path.display()
    );

    Ok(())
}

fn read_groups_file(path: &Path) -> Result<Vec<GroupSpec>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read groups file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid groups file: {}", path.display()))
}

/// Parse a `NAME=RANGE` flag value.
fn parse_group_flag(flag: &str) -> Result<GroupSpec> {
    let (name, range) = flag
        .split_once('=')
        .with_context(|| format!("Invalid group \"{flag}\"; expected NAME=RANGE"))?;
    Ok(GroupSpec {
        name: name.trim().to_string(),
        range: range.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_group_flag() {
        let spec = parse_group_flag("Chapter 1=1-5, 8").unwrap();
        assert_eq!(spec.name, "Chapter 1");
        assert_eq!(spec.range, "1-5, 8");
    }

    #[test]
    fn test_parse_group_flag_without_equals() {
        assert!(parse_group_flag("Chapter 1").is_err());
    }

    #[test]
    fn test_read_groups_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.json");
        std::fs::write(
            &path,
            r#"[{"name": "Intro", "range": "1-2"}, {"name": "Body", "range": "3-9"}]"#,
        )
        .unwrap();

        let specs = read_groups_file(&path).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].name, "Intro");
        assert_eq!(specs[1].range, "3-9");
    }

    #[test]
    fn test_read_groups_file_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(read_groups_file(&path).is_err());
    }
}
