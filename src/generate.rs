//! Capsule generation.
//!
//! Stage 2 of the build. Takes the scan manifest and writes the capsule:
//!
//! ```text
//! capsule/
//! ├── index.gmi                              # Home page
//! ├── pages/
//! │   ├── links.gmi                          # One per standalone page
//! │   └── krako.gmi
//! └── collections/
//!     └── cartas/
//!         ├── index.gmi                      # Collection index
//!         ├── 01_inicio/
//!         │   ├── index.gmi                  # Section index
//!         │   ├── primeira_carta.gmi         # Document, with prev/up/next
//!         │   └── segunda_carta.gmi
//!         └── 02_viagem/
//!             ├── index.gmi
//!             └── terceira_carta.gmi
//! ```
//!
//! Processing is strictly sequential. Each document is converted, linked,
//! footed and written before the next one is touched, and the first write
//! failure aborts the build.
//!
//! After writing, any `.gmi` file under `pages/` or `collections/` that this
//! build did not produce is deleted, along with directories left empty. Other
//! files in the output tree are left alone.

use crate::convert;
use crate::footer::{Footer, GeneratedPage};
use crate::index;
use crate::navigation;
use crate::scan::{self, Manifest, ScanError};
use crate::types::{Collection, Document};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Output subtrees owned entirely by the generator.
const PRUNED_DIRS: [&str; 2] = ["pages", "collections"];

/// Where a build reads from and writes to.
#[derive(Debug, Clone)]
pub struct BuildPaths {
    pub source_root: PathBuf,
    pub output_root: PathBuf,
}

/// What a generated file is, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    Page,
    Document,
    SectionIndex,
    CollectionIndex,
    Home,
}

/// One file written by the generate stage.
#[derive(Debug, Clone, Serialize)]
pub struct WrittenFile {
    pub kind: OutputKind,
    pub title: String,
    /// Source path relative to the source root, for converted documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Output path relative to the output root.
    pub output: PathBuf,
}

/// Everything the generate stage did.
#[derive(Debug, Default, Serialize)]
pub struct BuildReport {
    pub written: Vec<WrittenFile>,
    pub removed: Vec<PathBuf>,
}

impl BuildReport {
    pub fn count(&self, kind: OutputKind) -> usize {
        self.written.iter().filter(|w| w.kind == kind).count()
    }
}

/// Scan the source root and generate the capsule.
pub fn build(paths: &BuildPaths) -> Result<(Manifest, BuildReport), BuildError> {
    let manifest = scan::scan(&paths.source_root)?;
    let report = generate(&manifest, &paths.output_root)?;
    Ok((manifest, report))
}

pub fn generate(manifest: &Manifest, output_dir: &Path) -> Result<BuildReport, GenerateError> {
    let footer = Footer::from_config(&manifest.config.footer);
    let mut writer = Writer {
        root: output_dir,
        footer: &footer,
        report: BuildReport::default(),
    };

    writer.create_dir(Path::new("pages"))?;
    writer.create_dir(Path::new("collections"))?;
    writer.remove_stale(&manifest.stale)?;

    for page in &manifest.pages {
        let body = convert::convert(&page.content, page.format);
        writer.write(
            PathBuf::from("pages").join(format!("{}.gmi", page.output_name)),
            OutputKind::Page,
            &page.stem,
            Some(page),
            body,
        )?;
    }

    for collection in &manifest.collections {
        generate_collection(&mut writer, collection)?;
    }

    let home = index::home_page(&manifest.config, &manifest.pages, &manifest.collections);
    writer.write(
        PathBuf::from("index.gmi"),
        OutputKind::Home,
        &manifest.config.home.title,
        None,
        home,
    )?;

    for top in PRUNED_DIRS {
        writer.prune(Path::new(top))?;
    }

    info!(
        files = writer.report.written.len(),
        output = %output_dir.display(),
        "capsule generated"
    );
    Ok(writer.report)
}

fn generate_collection(writer: &mut Writer, collection: &Collection) -> Result<(), GenerateError> {
    let collection_dir = PathBuf::from("collections").join(&collection.name);

    let sequence = navigation::flatten(collection);
    for (idx, entry) in sequence.iter().enumerate() {
        let converted = convert::convert(&entry.document.content, entry.document.format);
        let body = navigation::link(collection, &sequence, idx, &converted);
        writer.write(
            collection_dir
                .join(&entry.section.key)
                .join(format!("{}.gmi", entry.document.output_name)),
            OutputKind::Document,
            &entry.document.display_name,
            Some(entry.document),
            body,
        )?;
    }

    for section in &collection.sections {
        writer.write(
            collection_dir.join(&section.key).join("index.gmi"),
            OutputKind::SectionIndex,
            &section.display_name,
            None,
            index::section_index(collection, section),
        )?;
    }

    writer.write(
        collection_dir.join("index.gmi"),
        OutputKind::CollectionIndex,
        &collection.label,
        None,
        index::collection_index(collection),
    )
}

/// Writes finalized pages under the output root and records them.
struct Writer<'a> {
    root: &'a Path,
    footer: &'a Footer,
    report: BuildReport,
}

impl Writer<'_> {
    fn create_dir(&self, rel: &Path) -> Result<(), GenerateError> {
        let path = self.root.join(rel);
        fs::create_dir_all(&path).map_err(|source| GenerateError::Io { path, source })
    }

    fn write(
        &mut self,
        rel: PathBuf,
        kind: OutputKind,
        title: &str,
        source: Option<&Document>,
        body: String,
    ) -> Result<(), GenerateError> {
        let mut page = GeneratedPage::new(body);
        page.finalize(self.footer);

        if let Some(parent) = rel.parent() {
            self.create_dir(parent)?;
        }
        let path = self.root.join(&rel);
        fs::write(&path, page.into_body()).map_err(|source| GenerateError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(output = %rel.display(), "wrote");

        self.report.written.push(WrittenFile {
            kind,
            title: title.to_string(),
            source: source.map(|d| d.source_path.clone()),
            output: rel,
        });
        Ok(())
    }

    /// Delete `.gmi` files under `top` not written by this build, then any
    /// directories left empty.
    fn prune(&mut self, top: &Path) -> Result<(), GenerateError> {
        let written: HashSet<&Path> = self
            .report
            .written
            .iter()
            .map(|w| w.output.as_path())
            .collect();

        let mut orphans = Vec::new();
        let mut dirs = Vec::new();
        for entry in WalkDir::new(self.root.join(top))
            .min_depth(1)
            .contents_first(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let Ok(rel) = entry.path().strip_prefix(self.root) else {
                continue;
            };
            if entry.file_type().is_dir() {
                dirs.push(entry.path().to_path_buf());
            } else if rel.extension().is_some_and(|e| e == "gmi") && !written.contains(rel) {
                orphans.push(rel.to_path_buf());
            }
        }

        for rel in orphans {
            let path = self.root.join(&rel);
            fs::remove_file(&path).map_err(|source| GenerateError::Io {
                path: path.clone(),
                source,
            })?;
            info!(output = %rel.display(), "removed orphaned page");
            self.report.removed.push(rel);
        }

        // Children come before parents, so nested empty directories collapse.
        for dir in dirs {
            let empty = fs::read_dir(&dir)
                .map_err(|source| GenerateError::Io {
                    path: dir.clone(),
                    source,
                })?
                .next()
                .is_none();
            if empty {
                fs::remove_dir(&dir).map_err(|source| GenerateError::Io {
                    path: dir.clone(),
                    source,
                })?;
            }
        }
        Ok(())
    }

    fn remove_stale(&mut self, stale: &[PathBuf]) -> Result<(), GenerateError> {
        for rel in stale {
            let path = self.root.join(rel);
            if !path.is_file() {
                continue;
            }
            fs::remove_file(&path).map_err(|source| GenerateError::Io {
                path: path.clone(),
                source,
            })?;
            info!(output = %rel.display(), "removed stale page");
            self.report.removed.push(rel.clone());
        }
        Ok(())
    }
}
