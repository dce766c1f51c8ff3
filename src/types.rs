//! Shared types produced by the scan stage and consumed by generation.
//!
//! Everything here is plain data. The scan stage builds it from the
//! filesystem once; the generate stage only reads it.

use serde::Serialize;
use std::path::PathBuf;

/// Source markup flavour of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Plain text: headings and `- https://` link bullets only.
    Plain,
    /// Lightweight markdown: links, lists, emphasis, fences.
    Rich,
}

/// One source file, read and classified.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Path relative to the source root.
    pub source_path: PathBuf,
    /// Raw text as read from disk.
    #[serde(skip)]
    pub content: String,
    pub format: Format,
    /// Owning collection, `None` for standalone pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    /// Section key inside the owning collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// File stem (or full name when the extension isn't recognized).
    pub stem: String,
    /// Sanitized output token, without the `.gmi` extension.
    pub output_name: String,
    /// Human label: stem with underscores as spaces, title-cased.
    pub display_name: String,
}

/// An ordered bucket of documents inside a collection.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub key: String,
    pub display_name: String,
    /// Sorted by source filename.
    pub documents: Vec<Document>,
}

/// A named, sectioned group of documents.
///
/// `sections` is stored in section order, which is authoritative for both
/// navigation adjacency and index layout.
#[derive(Debug, Clone, Serialize)]
pub struct Collection {
    /// Directory name under the source root.
    pub name: String,
    /// Main label, after legacy translation.
    pub label: String,
    pub sections: Vec<Section>,
    /// Whether the section layout came from a configuration file.
    pub configured: bool,
}

impl Collection {
    pub fn section(&self, key: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.key == key)
    }

    pub fn section_order(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.key.as_str()).collect()
    }

    pub fn document_count(&self) -> usize {
        self.sections.iter().map(|s| s.documents.len()).sum()
    }

    /// Capsule path of the collection index.
    pub fn index_url(&self) -> String {
        format!("/collections/{}/index.gmi", self.name)
    }

    /// Capsule path of a section index.
    pub fn section_index_url(&self, section_key: &str) -> String {
        format!("/collections/{}/{}/index.gmi", self.name, section_key)
    }

    /// Capsule path of a converted document.
    pub fn document_url(&self, section_key: &str, doc: &Document) -> String {
        format!(
            "/collections/{}/{}/{}.gmi",
            self.name, section_key, doc.output_name
        )
    }

    /// Where the home page should point for this collection.
    ///
    /// Single-section collections skip their collection index and link
    /// straight to the section listing.
    pub fn entry_url(&self) -> String {
        match self.sections.as_slice() {
            [only] => self.section_index_url(&only.key),
            _ => self.index_url(),
        }
    }
}

/// Capsule path of a standalone page.
pub fn page_url(page: &Document) -> String {
    format!("/pages/{}.gmi", page.output_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str) -> Document {
        Document {
            source_path: PathBuf::from(format!("{name}.md")),
            content: String::new(),
            format: Format::Rich,
            collection: Some("cartas".into()),
            section: Some("a".into()),
            stem: name.into(),
            output_name: name.into(),
            display_name: name.into(),
        }
    }

    fn section(key: &str, docs: &[&str]) -> Section {
        Section {
            key: key.into(),
            display_name: key.to_uppercase(),
            documents: docs.iter().map(|d| doc(d)).collect(),
        }
    }

    #[test]
    fn single_section_entry_points_at_section_index() {
        let c = Collection {
            name: "cartas".into(),
            label: "Letters".into(),
            sections: vec![section("main", &["a1"])],
            configured: false,
        };
        assert_eq!(c.entry_url(), "/collections/cartas/main/index.gmi");
    }

    #[test]
    fn multi_section_entry_points_at_collection_index() {
        let c = Collection {
            name: "cartas".into(),
            label: "Letters".into(),
            sections: vec![section("a", &["a1", "a2"]), section("b", &["b1"])],
            configured: true,
        };
        assert_eq!(c.entry_url(), "/collections/cartas/index.gmi");
        assert_eq!(c.document_count(), 3);
        assert_eq!(c.section_order(), vec!["a", "b"]);
        assert!(c.section("b").is_some());
        assert!(c.section("c").is_none());
    }

    #[test]
    fn document_url_uses_output_name() {
        let c = Collection {
            name: "cartas".into(),
            label: "Letters".into(),
            sections: vec![],
            configured: false,
        };
        let mut d = doc("first letter");
        d.output_name = "first_letter".into();
        assert_eq!(
            c.document_url("a", &d),
            "/collections/cartas/a/first_letter.gmi"
        );
    }
}
