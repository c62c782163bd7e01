use std::fs;
use std::path::Path;

use tracing::debug;

use crate::insightly::tags::error::{Result, ToolError};
use crate::insightly::tags::model::Vocabulary;

/// Loads a comma-separated list such as `courses.txt` or `tutors.txt`.
pub fn load_vocabulary(path: &Path) -> Result<Vocabulary> {
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }
    let data = fs::read_to_string(path)?;
    let vocabulary = parse_vocabulary(&data);
    debug!(path = %path.display(), entry_count = vocabulary.len(), "loaded vocabulary");
    Ok(vocabulary)
}

/// Splits on commas and trims each entry. Line breaks count as whitespace so
/// a trailing newline or one-entry-per-line layout still works.
pub fn parse_vocabulary(data: &str) -> Vocabulary {
    Vocabulary::new(data.split([',', '\n']).map(str::trim))
}
