//! Previous / up / next links between documents of a collection.
//!
//! Documents are chained in the collection's flattened order: every section
//! in section order, every document in filename order. Adjacency crosses
//! section boundaries, so the last letter of one section points at the first
//! letter of the next.
//!
//! Each document gets one block, inserted right after its first heading line
//! (or at the very top when it has none):
//!
//! ```text
//! # Letter Two
//!
//! => /collections/cartas/a/letter_one.gmi ← Letter One
//! => /collections/cartas/a/index.gmi ↑ Section index
//! => /collections/cartas/b/letter_three.gmi Letter Three →
//!
//! ---
//!
//! ...body...
//! ```

use crate::types::{Collection, Document, Section};

pub const PREV_GLYPH: &str = "←";
pub const UP_GLYPH: &str = "↑";
pub const NEXT_GLYPH: &str = "→";

/// One position in the flattened navigation sequence.
#[derive(Debug, Clone, Copy)]
pub struct NavEntry<'a> {
    pub section: &'a Section,
    pub document: &'a Document,
}

/// Flatten a collection into its navigation order.
pub fn flatten(collection: &Collection) -> Vec<NavEntry<'_>> {
    collection
        .sections
        .iter()
        .flat_map(|section| {
            section
                .documents
                .iter()
                .map(move |document| NavEntry { section, document })
        })
        .collect()
}

/// Build the navigation block for the entry at `idx`.
pub fn navigation_block(
    collection: &Collection,
    sequence: &[NavEntry],
    idx: usize,
) -> Vec<String> {
    let current = sequence[idx];
    let mut block = vec![String::new()];

    if let Some(prev) = idx.checked_sub(1).and_then(|i| sequence.get(i)) {
        block.push(format!(
            "=> {} {} {}",
            collection.document_url(&prev.section.key, prev.document),
            PREV_GLYPH,
            prev.document.display_name
        ));
    }

    block.push(format!(
        "=> {} {} Section index",
        collection.section_index_url(&current.section.key),
        UP_GLYPH
    ));

    if let Some(next) = sequence.get(idx + 1) {
        block.push(format!(
            "=> {} {} {}",
            collection.document_url(&next.section.key, next.document),
            next.document.display_name,
            NEXT_GLYPH
        ));
    }

    block.extend([String::new(), "---".to_string(), String::new()]);
    block
}

/// Insert a block after the first heading line, or prepend it.
pub fn insert_block(body: &str, block: &[String]) -> String {
    let lines: Vec<&str> = body.split('\n').collect();
    let at = lines
        .iter()
        .position(|line| line.trim().starts_with('#'))
        .map(|heading| heading + 1)
        .unwrap_or(0);
    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + block.len());
    out.extend_from_slice(&lines[..at]);
    out.extend(block.iter().map(String::as_str));
    out.extend_from_slice(&lines[at..]);
    out.join("\n")
}

/// Insert the navigation block for entry `idx` into its converted body.
pub fn link(collection: &Collection, sequence: &[NavEntry], idx: usize, body: &str) -> String {
    insert_block(body, &navigation_block(collection, sequence, idx))
}
