//! Class label table loading.

use crate::core::errors::{OffloadError, OffloadResult};
use std::path::Path;

/// Loads a label table from a text file, one name per line.
///
/// Line `i` names the class with output index `i + 1`; the model's background
/// entry at index 0 has no line. Surrounding whitespace is trimmed, blank
/// lines are rejected so indices stay aligned.
pub fn load_labels(path: &Path) -> OffloadResult<Vec<String>> {
    let raw = std::fs::read_to_string(path)?;
    let mut labels = Vec::new();
    for (lineno, line) in raw.lines().enumerate() {
        let name = line.trim();
        if name.is_empty() {
            return Err(OffloadError::invalid_input(format!(
                "label file {}: blank line {} would misalign class indices",
                path.display(),
                lineno + 1
            )));
        }
        labels.push(name.to_string());
    }
    if labels.is_empty() {
        return Err(OffloadError::invalid_input(format!(
            "label file {} is empty",
            path.display()
        )));
    }
    Ok(labels)
}
