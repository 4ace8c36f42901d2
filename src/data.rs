use crate::errors::{Result, SuiteError};
use std::fs;
use std::path::Path;
use tracing::info;

/// Reads the line-delimited keyword file: one opaque UTF-8 token per line,
/// no escaping rules. Blank lines are skipped.
pub fn load_keywords(path: &Path) -> Result<Vec<String>> {
    let contents =
        fs::read_to_string(path).map_err(|source| SuiteError::DataSourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

    let keywords: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    info!(path = %path.display(), count = keywords.len(), "loaded search keywords");
    Ok(keywords)
}
