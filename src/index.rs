//! Index pages: home, collection, and section listings.
//!
//! All three are rendered from the scan manifest alone, as plain gemtext
//! strings. The generate stage appends the footer and writes them.
//!
//! ```text
//! index.gmi                               home
//! collections/cartas/index.gmi            collection: one heading + link per section
//! collections/cartas/01_inicio/index.gmi  section: one link per document
//! ```

use crate::config::SiteConfig;
use crate::types::{Collection, Document, Section, page_url};

/// Collection-name keywords and the shortcut phrase used for them on the
/// home page. Checked in order against the lower-cased name.
const SHORTCUT_PHRASES: &[(&str, &str)] = &[
    ("carta", "Read the letters"),
    ("letter", "Read the letters"),
    ("receita", "Cook something from"),
    ("recipe", "Cook something from"),
];

/// Listing of one section's documents.
pub fn section_index(collection: &Collection, section: &Section) -> String {
    let mut out = format!(
        "# {}\n\n=> {} ← Back to {}\n\n## Documents\n\n",
        section.display_name,
        collection.index_url(),
        collection.label
    );
    for doc in &section.documents {
        out.push_str(&format!(
            "=> {} {}\n",
            collection.document_url(&section.key, doc),
            doc.display_name
        ));
    }
    out
}

/// Listing of a collection's sections, in section order.
pub fn collection_index(collection: &Collection) -> String {
    let mut out = format!("# {}\n\n", collection.label);
    for section in &collection.sections {
        out.push_str(&format!(
            "## {name}\n\n=> {url} Browse {name}\n\n",
            name = section.display_name,
            url = collection.section_index_url(&section.key)
        ));
    }
    out
}

/// Home-page label of a page: upper-cased unless configured otherwise.
pub fn page_label(config: &SiteConfig, page: &Document) -> String {
    config
        .home
        .page_labels
        .get(&page.stem)
        .cloned()
        .unwrap_or_else(|| page.stem.to_uppercase())
}

/// Quick-start description of a collection, chosen by name keyword.
pub fn shortcut_label(collection: &Collection) -> String {
    let name = collection.name.to_lowercase();
    match SHORTCUT_PHRASES
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
    {
        Some((_, phrase)) => format!("{phrase}: {}", collection.label),
        None => format!("Browse {}", collection.label),
    }
}

fn availability(count: usize) -> String {
    match count {
        1 => "There is 1 page available.".to_string(),
        n => format!("There are {n} pages available."),
    }
}

fn push_paragraphs(out: &mut String, paragraphs: &[String]) {
    for paragraph in paragraphs {
        out.push_str(paragraph);
        out.push_str("\n\n");
    }
}

/// The capsule's home page.
pub fn home_page(config: &SiteConfig, pages: &[Document], collections: &[Collection]) -> String {
    let home = &config.home;
    let mut out = format!("# {}\n\n", home.title);
    if !home.banner.is_empty() {
        out.push_str(&format!("{}\n\n", home.banner));
    }
    push_paragraphs(&mut out, &home.intro);

    if !pages.is_empty() {
        out.push_str("## Pages\n\n");
        for page in pages {
            out.push_str(&format!("=> {} {}\n", page_url(page), page_label(config, page)));
        }
        out.push('\n');
    }

    if !collections.is_empty() {
        out.push_str("## Collections\n\n");
        for collection in collections {
            out.push_str(&format!(
                "=> {} {}\n",
                collection.entry_url(),
                collection.label.to_uppercase()
            ));
        }
        out.push('\n');
    }

    out.push_str("## Quick Start\n\n");
    out.push_str(&availability(pages.len()));
    out.push_str("\n\n");
    for collection in collections {
        out.push_str(&format!(
            "=> {} {}\n",
            collection.entry_url(),
            shortcut_label(collection)
        ));
    }
    if !collections.is_empty() {
        out.push('\n');
    }

    push_paragraphs(&mut out, &home.closing);
    out
}
