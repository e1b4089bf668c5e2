pub mod every;
pub mod groups;
pub mod info;
pub mod range;
pub mod suggest;

use std::path::{Path, PathBuf};

/// Default archive path for multi-output splits: `<stem><suffix>.zip` in the
/// current directory.
pub(crate) fn archive_name(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    PathBuf::from(format!("{stem}{suffix}.zip"))
}
