//! CSV writing.
//!
//! Output goes to a sibling `.tmp` file first and is renamed into place only
//! once fully written, so a failed run never leaves a truncated destination.

use crate::error::{ProcessingError, Result};
use polars::prelude::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Write `df` as comma-separated text with a header row and no index.
///
/// # Errors
///
/// Returns `Write` when the destination (or its directory) is not writable.
/// The destination is left untouched on failure.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| ProcessingError::write(path, e))?;
    }

    let tmp_path = temp_path_for(path);
    debug!("Writing {} rows to {}", df.height(), tmp_path.display());

    if let Err(e) = write_to(df, &tmp_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(ProcessingError::write(path, e));
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(ProcessingError::write(path, e));
    }

    info!("Dataset saved: {}", path.display());
    Ok(())
}

fn write_to(df: &mut DataFrame, path: &Path) -> std::result::Result<(), String> {
    let file = File::create(path).map_err(|e| e.to_string())?;
    let mut writer = BufWriter::new(file);

    CsvWriter::new(&mut writer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)
        .map_err(|e| e.to_string())?;

    writer.flush().map_err(|e| e.to_string())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "output".into());
    name.push(".tmp");
    path.with_file_name(name)
}
