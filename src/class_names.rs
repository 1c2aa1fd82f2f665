//! Loads class-name lists and resolves label indices against them.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ClassNamesError {
    #[error("failed to read class names: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse class names JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("class name list is empty")]
    Empty,

    #[error("label {label} is out of range for {count} class names")]
    LabelOutOfRange { label: usize, count: usize },
}

/// Reads class names from a file.
///
/// A `.json` file must hold a JSON array of strings; anything else is read
/// as newline-separated names with blank lines skipped.
pub fn load_class_names(path: &Path) -> Result<Vec<String>, ClassNamesError> {
    let text = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let names: Vec<String> = if is_json {
        serde_json::from_str(&text)?
    } else {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    };

    if names.is_empty() {
        return Err(ClassNamesError::Empty);
    }
    Ok(names)
}

/// Resolves a label index to its class name, rejecting out-of-range labels.
pub fn name_for_label(names: &[String], label: usize) -> Result<&str, ClassNamesError> {
    names
        .get(label)
        .map(String::as_str)
        .ok_or(ClassNamesError::LabelOutOfRange {
            label,
            count: names.len(),
        })
}
