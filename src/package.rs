use std::io::Cursor;

use anyhow::{Context, Result};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::executor::OutputDocument;

/// Bundle split outputs into one in-memory ZIP archive, entries in the order
/// given.
pub fn write_zip(outputs: &[OutputDocument]) -> Result<Vec<u8>> {
    use std::io::Write;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for output in outputs {
        writer
            .start_file(output.name.as_str(), options)
            .with_context(|| format!("Failed to add \"{}\" to archive", output.name))?;
        writer
            .write_all(&output.bytes)
            .with_context(|| format!("Failed to write \"{}\" to archive", output.name))?;
    }

    let cursor = writer.finish().context("Failed to finalize archive")?;
    Ok(cursor.into_inner())
}
