//! Persisting rendered reports.

use crate::error::ReportError;
use std::path::Path;

/// Write `contents` to `path`, creating missing parent directories.
pub fn write_report(path: &Path, contents: &str) -> Result<(), ReportError> {
    let io = |e: std::io::Error| ReportError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io)?;
    }
    std::fs::write(path, contents).map_err(io)
}
