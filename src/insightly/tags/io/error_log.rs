use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::insightly::tags::error::Result;

/// File name of the error log for a data source, e.g.
/// `Insightly_Data_File_Error_Log_<timestamp>.txt`.
pub fn error_log_file_name(source_label: &str, timestamp: &str) -> String {
    let stem: String = source_label
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect();
    format!("{stem}_Error_Log_{timestamp}.txt")
}

/// Writes one fatal message per line and returns the path of the log.
pub fn write_error_log(
    dir: &Path,
    source_label: &str,
    errors: &[String],
    timestamp: &str,
) -> Result<PathBuf> {
    let path = dir.join(error_log_file_name(source_label, timestamp));
    let mut contents = format!("{source_label} Errors:\n");
    for error in errors {
        contents.push_str(error);
        contents.push('\n');
    }
    fs::write(&path, contents)?;
    warn!(
        source = source_label,
        error_count = errors.len(),
        path = %path.display(),
        "error log written"
    );
    Ok(path)
}
