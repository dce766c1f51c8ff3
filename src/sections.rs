//! Section structure of a collection.
//!
//! The scan stage buckets a collection's documents by directory: one bucket
//! per section subdirectory, or a single `main` bucket when the files sit
//! directly in the collection. This module turns those buckets into an
//! ordered [`Collection`].
//!
//! ## With `sections.json`
//!
//! The file is authoritative. Its `order` decides which sections are
//! published and in what order; a bucket whose key isn't listed is left out
//! of the capsule (a warning names it). Missing fields fall back one by one:
//!
//! | Field          | Fallback                              |
//! |----------------|---------------------------------------|
//! | `mainMenuName` | synthesized label (below)             |
//! | `sections[k]`  | the key itself                        |
//! | `order`        | bucket discovery order                |
//!
//! ## Without it
//!
//! - label: collection name, underscores as spaces, title-cased, unless
//!   [`LABEL_OVERRIDES`] has an entry for the exact name
//! - section names: key, underscores as spaces, title-cased
//! - order: bucket discovery order (sorted directory names)
//!
//! Either way the label then goes through [`LEGACY_LABELS`], a fixed
//! Portuguese → English table kept for the letters collection.
//! Labels not in the table pass through untouched.

use crate::config::SectionsFile;
use crate::naming::display_name;
use crate::types::{Collection, Document, Section};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// Key of the implicit section of a flat collection.
pub const MAIN_SECTION: &str = "main";

/// Collection directory name → label, for names title-casing gets wrong.
pub const LABEL_OVERRIDES: &[(&str, &str)] = &[
    ("cartas", "Cartas para Pablo"),
    ("webring", "Web Ring"),
    ("faq", "FAQ"),
];

/// Legacy main labels and their published replacement.
pub const LEGACY_LABELS: &[(&str, &str)] = &[
    ("Cartas para Pablo", "Letters to Pablo"),
    ("Cartas", "Letters"),
];

/// Documents found in one section directory, sorted by filename.
#[derive(Debug, Clone)]
pub struct Bucket {
    pub key: String,
    pub documents: Vec<Document>,
}

/// Resolved configuration record for a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRecord {
    pub main_label: String,
    pub names: BTreeMap<String, String>,
    pub order: Vec<String>,
    /// Whether the record came from a configuration file.
    pub configured: bool,
}

impl SectionRecord {
    pub fn section_name(&self, key: &str) -> String {
        self.names
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

/// Label for a collection without an explicit `mainMenuName`.
pub fn synthesized_label(collection_name: &str) -> String {
    LABEL_OVERRIDES
        .iter()
        .find(|(name, _)| *name == collection_name)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| display_name(collection_name))
}

/// Apply the legacy label table.
pub fn translate_label(label: &str) -> String {
    LEGACY_LABELS
        .iter()
        .find(|(from, _)| *from == label)
        .map(|(_, to)| to.to_string())
        .unwrap_or_else(|| label.to_string())
}

/// Synthesize a record from the discovered bucket keys.
pub fn synthesize(collection_name: &str, bucket_keys: &[String]) -> SectionRecord {
    SectionRecord {
        main_label: synthesized_label(collection_name),
        names: bucket_keys
            .iter()
            .map(|key| (key.clone(), display_name(key)))
            .collect(),
        order: bucket_keys.to_vec(),
        configured: false,
    }
}

/// Resolve a record from an explicit file, or synthesize one.
pub fn resolve(
    collection_name: &str,
    bucket_keys: &[String],
    explicit: Option<SectionsFile>,
) -> SectionRecord {
    let Some(file) = explicit else {
        return synthesize(collection_name, bucket_keys);
    };

    let order = file.order.unwrap_or_else(|| bucket_keys.to_vec());
    let omitted: Vec<&str> = bucket_keys
        .iter()
        .filter(|k| !order.contains(*k))
        .map(String::as_str)
        .collect();
    if !omitted.is_empty() {
        warn!(
            collection = collection_name,
            sections = ?omitted,
            "sections missing from the configured order are not published"
        );
    }

    let mut seen = HashSet::new();
    let order: Vec<String> = order
        .into_iter()
        .filter(|key| {
            let first = seen.insert(key.clone());
            if !first {
                warn!(
                    collection = collection_name,
                    section = %key,
                    "section listed twice in order"
                );
            }
            first
        })
        .collect();

    SectionRecord {
        main_label: file
            .main_menu_name
            .unwrap_or_else(|| synthesized_label(collection_name)),
        names: file.sections,
        order,
        configured: true,
    }
}

/// Build the published collection from a record and its buckets.
///
/// Sections are emitted in record order. Sections with no documents are
/// dropped; a collection left with no sections yields `None`.
pub fn assemble(
    collection_name: &str,
    record: &SectionRecord,
    buckets: Vec<Bucket>,
) -> Option<Collection> {
    let mut by_key: BTreeMap<String, Vec<Document>> = buckets
        .into_iter()
        .map(|b| (b.key, b.documents))
        .collect();

    let mut sections = Vec::new();
    for key in &record.order {
        match by_key.remove(key) {
            Some(documents) if !documents.is_empty() => sections.push(Section {
                key: key.clone(),
                display_name: record.section_name(key),
                documents,
            }),
            _ => warn!(
                collection = collection_name,
                section = %key,
                "section has no documents, skipping"
            ),
        }
    }

    if sections.is_empty() {
        warn!(
            collection = collection_name,
            "collection has no documents, not publishing"
        );
        return None;
    }

    Some(Collection {
        name: collection_name.to_string(),
        label: translate_label(&record.main_label),
        sections,
        configured: record.configured,
    })
}
