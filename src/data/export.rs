//! Filtered View Export
//! Writes the current view back to CSV in the same shape it was loaded from.

use super::model::{FilteredView, DATE, ROW_ID};
use polars::prelude::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_EXPORT_PATH: &str = "filtered_data.csv";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Write `view` to `path`, replacing any existing file.
///
/// Dates are formatted with `date_format` so the file loads back through
/// the same loader. Rows go to a sibling temporary file that is renamed
/// over `path` once complete, so a failed export leaves the previous file
/// in place. Returns the number of rows written.
pub fn write_csv(view: &FilteredView, path: &Path, date_format: &str) -> Result<usize, ExportError> {
    let mut df = view
        .frame()
        .drop(ROW_ID)?
        .lazy()
        .with_column(col(DATE).dt().strftime(date_format).alias(DATE))
        .collect()?;

    let staging = staging_path(path);
    if let Err(e) = write_frame(&mut df, &staging).and_then(|()| {
        fs::rename(&staging, path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }) {
        if let Err(cleanup) = fs::remove_file(&staging) {
            log::debug!("Leaving {}: {cleanup}", staging.display());
        }
        return Err(e);
    }

    log::info!("Exported {} rows to {}", df.height(), path.display());
    Ok(df.height())
}

/// Hidden sibling of `path` in the same directory.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_EXPORT_PATH.to_string());
    path.with_file_name(format!(".{name}.partial"))
}

fn write_frame(df: &mut DataFrame, path: &Path) -> Result<(), ExportError> {
    let io_error = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    CsvWriter::new(&mut writer).include_header(true).finish(df)?;
    writer.flush().map_err(io_error)?;
    Ok(())
}
