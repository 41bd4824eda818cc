//! Zip extraction.

use crate::error::{CollageError, Result};
use std::io::Cursor;
use std::path::Path;

/// Extracts every entry of the zip in `bytes` under `dest`, creating it if
/// needed. Entries whose names would escape `dest` are rejected by the zip
/// reader rather than written.
pub fn extract_zip(bytes: &[u8], dest: &Path) -> Result<usize> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let entries = archive.len();
    std::fs::create_dir_all(dest).map_err(|e| CollageError::io(dest, e))?;
    archive.extract(dest)?;
    tracing::info!(entries, dest = %dest.display(), "archive extracted");
    Ok(entries)
}
