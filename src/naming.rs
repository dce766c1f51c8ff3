//! Output names and display labels derived from source filenames.
//!
//! Two derivations are made from every source file name:
//!
//! - the **output name**, a URL-safe token used for the `.gmi` file:
//!   `"My Letter (draft).md"` → `"My_Letter_draft"`
//! - the **display name**, used for link labels:
//!   `"first_letter.md"` → `"First Letter"`
//!
//! Neither derivation checks for collisions. The scan stage owns that.

use std::path::Path;

/// Extensions that are stripped before deriving names.
pub const RECOGNIZED_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "gmi"];

/// Base name of a source file: its stem when the extension is recognized,
/// otherwise the full file name.
pub fn base_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let recognized = path
        .extension()
        .map(|e| {
            let ext = e.to_string_lossy().to_lowercase();
            RECOGNIZED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false);
    if recognized {
        path.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or(file_name)
    } else {
        file_name
    }
}

/// Map a base name to an output token.
///
/// Spaces become underscores, then every character other than an
/// alphanumeric, `_`, `-` or `.` is dropped.
pub fn sanitize(name: &str) -> String {
    name.replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect()
}

/// Whether a directory name can appear unchanged in a capsule link target.
pub fn is_path_segment(name: &str) -> bool {
    !name.is_empty() && sanitize(name) == name
}

/// Title-case every alphabetic run: first letter upper, rest lower.
///
/// Any non-alphabetic character starts a new word, so `"o'neil"` becomes
/// `"O'Neil"` and `"2nd letter"` becomes `"2Nd Letter"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Human label for a stem or key: underscores to spaces, title-cased.
pub fn display_name(stem: &str) -> String {
    title_case(&stem.replace('_', " "))
}
