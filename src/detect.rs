//! Source format detection.
//!
//! A document is rich text if any one of these appears anywhere in it:
//!
//! - a `[text](target)` link
//! - a line starting with one to six `#` followed by whitespace
//! - a `**bold**` span
//! - a ` ``` ` fence marker
//!
//! Otherwise it is plain text. A plain file that happens to contain one of
//! these (say, a `**` inside a URL) is classified as rich.

use crate::convert::{count_links, has_bold_span, heading_level};
use crate::types::Format;
use std::path::Path;

/// Classify a document body.
pub fn detect(content: &str) -> Format {
    let rich = content.contains("```")
        || content.lines().any(|line| {
            heading_level(line).is_some_and(|level| level <= 6)
                || count_links(line) > 0
                || has_bold_span(line)
        });
    if rich { Format::Rich } else { Format::Plain }
}

/// Format implied by a file extension, if the extension declares one.
pub fn declared(path: &Path) -> Option<Format> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "txt" => Some(Format::Plain),
        "md" | "markdown" => Some(Format::Rich),
        _ => None,
    }
}

/// Declared format when the extension has one, detected otherwise.
pub fn resolve(path: &Path, content: &str) -> Format {
    declared(path).unwrap_or_else(|| detect(content))
}
