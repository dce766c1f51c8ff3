//! CLI output formatting for the scan and build stages.
//!
//! Output is a content inventory: every entity leads with its positional
//! index and name, with source paths as indented `Source:` lines.
//!
//! ## Scan
//!
//! ```text
//! Pages
//!     001 links (plain)
//!         Source: links.txt
//!
//! Collections
//! 001 Letters to Pablo (3 documents)
//!     Source: cartas/
//!     001 Início
//!         001 Primeira Carta (rich)
//!             Source: cartas/01_inicio/primeira_carta.md
//!
//! Stale
//!     pages/index.gmi
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.gmi
//!
//! Pages
//!     001 links → pages/links.gmi
//!
//! Collections
//! 001 Letters to Pablo → collections/cartas/index.gmi
//!     001 Início → collections/cartas/01_inicio/index.gmi
//!         001 Primeira Carta → collections/cartas/01_inicio/primeira_carta.gmi
//!
//! Removed pages/index.gmi
//! Generated 1 page, 1 collection, 3 documents
//! ```
//!
//! Each stage has a `format_*` function returning `Vec<String>` and a
//! `print_*` wrapper that writes to stdout. Format functions do no I/O.

use crate::generate::{BuildReport, OutputKind, WrittenFile};
use crate::scan::Manifest;
use crate::types::Format;

fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn format_name(format: Format) -> &'static str {
    match format {
        Format::Plain => "plain",
        Format::Rich => "rich",
    }
}

fn plural(count: usize, singular: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {singular}s")
    }
}

/// Format scan output: the discovered pages and collections.
pub fn format_scan_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Pages".to_string());
    for (i, page) in manifest.pages.iter().enumerate() {
        lines.push(format!(
            "{}{} {} ({})",
            indent(1),
            format_index(i + 1),
            page.stem,
            format_name(page.format)
        ));
        lines.push(format!("{}Source: {}", indent(2), page.source_path.display()));
    }

    lines.push(String::new());
    lines.push("Collections".to_string());
    for (i, collection) in manifest.collections.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            collection.label,
            plural(collection.document_count(), "document")
        ));
        lines.push(format!("{}Source: {}/", indent(1), collection.name));
        for (s, section) in collection.sections.iter().enumerate() {
            lines.push(format!(
                "{}{} {}",
                indent(1),
                format_index(s + 1),
                section.display_name
            ));
            for (d, doc) in section.documents.iter().enumerate() {
                lines.push(format!(
                    "{}{} {} ({})",
                    indent(2),
                    format_index(d + 1),
                    doc.display_name,
                    format_name(doc.format)
                ));
                lines.push(format!("{}Source: {}", indent(3), doc.source_path.display()));
            }
        }
    }

    if !manifest.stale.is_empty() {
        lines.push(String::new());
        lines.push("Stale".to_string());
        for path in &manifest.stale {
            lines.push(format!("{}{}", indent(1), path.display()));
        }
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest) {
    for line in format_scan_output(manifest) {
        println!("{}", line);
    }
}

fn arrow_line(depth: usize, pos: Option<usize>, file: &WrittenFile) -> String {
    let lead = match pos {
        Some(p) => format!("{} {}", format_index(p), file.title),
        None => file.title.clone(),
    };
    format!("{}{} \u{2192} {}", indent(depth), lead, file.output.display())
}

/// Format the build report: every written file, grouped the way the
/// capsule is laid out, then a summary line.
pub fn format_build_report(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(home) = report.written.iter().find(|w| w.kind == OutputKind::Home) {
        lines.push(format!("Home \u{2192} {}", home.output.display()));
    }

    let pages: Vec<&WrittenFile> = report
        .written
        .iter()
        .filter(|w| w.kind == OutputKind::Page)
        .collect();
    if !pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        for (i, page) in pages.iter().enumerate() {
            lines.push(arrow_line(1, Some(i + 1), page));
        }
    }

    // Collections are written documents first, then section indices, then
    // the collection index. Regroup by output directory for display.
    let collections: Vec<&WrittenFile> = report
        .written
        .iter()
        .filter(|w| w.kind == OutputKind::CollectionIndex)
        .collect();
    if !collections.is_empty() {
        lines.push(String::new());
        lines.push("Collections".to_string());
    }
    for (c, collection) in collections.iter().enumerate() {
        lines.push(arrow_line(0, Some(c + 1), collection));
        let Some(collection_dir) = collection.output.parent() else {
            continue;
        };
        let sections = report.written.iter().filter(|w| {
            w.kind == OutputKind::SectionIndex
                && w.output.parent().and_then(|p| p.parent()) == Some(collection_dir)
        });
        for (s, section) in sections.enumerate() {
            lines.push(arrow_line(1, Some(s + 1), section));
            let section_dir = section.output.parent();
            let documents = report
                .written
                .iter()
                .filter(|w| w.kind == OutputKind::Document && w.output.parent() == section_dir);
            for (d, doc) in documents.enumerate() {
                lines.push(arrow_line(2, Some(d + 1), doc));
            }
        }
    }

    lines.push(String::new());
    for removed in &report.removed {
        lines.push(format!("Removed {}", removed.display()));
    }
    lines.push(format!(
        "Generated {}, {}, {}",
        plural(report.count(OutputKind::Page), "page"),
        plural(report.count(OutputKind::CollectionIndex), "collection"),
        plural(report.count(OutputKind::Document), "document")
    ));

    lines
}

/// Print the build report to stdout.
pub fn print_build_report(report: &BuildReport) {
    for line in format_build_report(report) {
        println!("{}", line);
    }
}
