//! Filesystem scanning and manifest generation.
//!
//! Stage 1 of the build. Reads the source tree into a [`Manifest`]: the
//! standalone pages, the collections with their resolved section structure,
//! and the site config. Every document is read here, once; generation never
//! touches the source tree again.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Source root
//! ├── config.toml                  # Site configuration (optional)
//! ├── index.txt                    # Reserved landing page (skipped when empty)
//! ├── links.txt                    # Page
//! ├── krako.txt                    # Page
//! ├── cartas/                      # Collection with sections
//! │   ├── sections.json            # Collection configuration (optional)
//! │   ├── 01_inicio/               # Section
//! │   │   ├── primeira_carta.md
//! │   │   └── segunda_carta.md
//! │   └── 02_viagem/
//! │       └── terceira_carta.md
//! └── receitas/                    # Flat collection → single "main" section
//!     ├── bolo_de_milho.md
//!     └── pao_de_queijo.txt
//! ```
//!
//! ## Rules
//!
//! - Only `.txt` files at the root are pages. Empty pages are skipped.
//! - A root subdirectory is a collection when it, or one of its immediate
//!   subdirectories, holds a file other than the collection config.
//!   Anything nested deeper is not looked at.
//! - Hidden entries (leading `.`) are ignored everywhere.
//! - Everything is sorted by name; directory iteration order is never used.
//!
//! ## Validation
//!
//! - A collection cannot hold both loose files and section directories.
//! - Output names must be unique among pages and within each section.
//! - A file name must keep at least one character after sanitizing.
//! - Collection and section directory names must already be valid path
//!   segments (no spaces or punctuation other than `_`, `-`, `.`).

use crate::config::{self, ConfigError, SiteConfig};
use crate::detect;
use crate::naming;
use crate::sections::{self, Bucket, MAIN_SECTION};
use crate::types::{Collection, Document};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Collection contains both documents and section directories: {0}")]
    MixedContent(PathBuf),
    #[error("Duplicate output name '{name}' in {location}: {first} and {second}")]
    DuplicateOutputName {
        name: String,
        location: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("File name has no usable characters: {0}")]
    UnnamableDocument(PathBuf),
    #[error("Directory name cannot be used in a capsule path: {0}")]
    UnsafeDirectoryName(PathBuf),
}

/// Manifest output from the scan stage.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub pages: Vec<Document>,
    pub collections: Vec<Collection>,
    pub config: SiteConfig,
    /// Output paths, relative to the output root, left over from earlier
    /// builds that must be removed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stale: Vec<PathBuf>,
}

const PAGE_EXTENSION: &str = "txt";

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;

    if !root.is_dir() {
        warn!(root = %root.display(), "source root not found, nothing to publish");
        return Ok(Manifest {
            pages: Vec::new(),
            collections: Vec::new(),
            config,
            stale: Vec::new(),
        });
    }

    let (pages, stale) = parse_pages(root, &config)?;

    let mut collections = Vec::new();
    for name in discover_collections(root, &config)? {
        if let Some(collection) = build_collection(root, &name, &config)? {
            collections.push(collection);
        }
    }

    Ok(Manifest {
        pages,
        collections,
        config,
        stale,
    })
}

/// Read every `.txt` file in the source root into a page.
///
/// Returns the pages and any stale outputs: an empty landing file means a
/// previously generated landing page must go.
fn parse_pages(
    root: &Path,
    config: &SiteConfig,
) -> Result<(Vec<Document>, Vec<PathBuf>), ScanError> {
    let landing = config.landing_file_name();
    let files: Vec<PathBuf> = collect_entries(root, config)?
        .into_iter()
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case(PAGE_EXTENSION))
                    .unwrap_or(false)
        })
        .collect();

    let mut pages = Vec::new();
    let mut stale = Vec::new();
    let mut names = NameRegistry::new("pages");
    for path in &files {
        let content = read(path)?;
        if content.trim().is_empty() {
            let file_name = file_name(path);
            if file_name == landing {
                stale.push(PathBuf::from("pages").join(format!("{}.gmi", config.landing_page)));
                debug!("landing page is empty, no page generated");
            } else {
                warn!(file = %file_name, "skipping empty page");
            }
            continue;
        }
        let doc = make_document(root, path, content, None, None)?;
        names.claim(&doc)?;
        pages.push(doc);
    }
    Ok((pages, stale))
}

/// Names of root subdirectories that hold publishable files, sorted.
pub fn discover_collections(root: &Path, config: &SiteConfig) -> Result<Vec<String>, ScanError> {
    let mut names: Vec<String> = collect_entries(root, config)?
        .into_iter()
        .filter(|p| p.is_dir() && has_reachable_file(p, config))
        .map(|p| file_name(&p))
        .collect();
    names.sort();
    Ok(names)
}

/// Whether a file exists at depth one or two below `dir`.
fn has_reachable_file(dir: &Path, config: &SiteConfig) -> bool {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(2)
        .into_iter()
        .filter_entry(|e| !is_hidden(e.file_name().to_string_lossy().as_ref()))
        .filter_map(|e| e.ok())
        .any(|e| e.file_type().is_file() && e.file_name().to_string_lossy() != config.sections_file)
}

fn build_collection(
    root: &Path,
    name: &str,
    config: &SiteConfig,
) -> Result<Option<Collection>, ScanError> {
    let dir = root.join(name);
    check_path_segment(&dir)?;
    let buckets = bucket_documents(root, &dir, name, config)?;
    if buckets.is_empty() {
        warn!(collection = name, "collection yields no files");
        return Ok(None);
    }

    let explicit = config::load_sections_file(&dir, &config.sections_file)?;
    if explicit.is_none() {
        warn!(
            collection = name,
            "no {} found, synthesizing sections", config.sections_file
        );
    }

    let keys: Vec<String> = buckets.iter().map(|b| b.key.clone()).collect();
    let record = sections::resolve(name, &keys, explicit);
    Ok(sections::assemble(name, &record, buckets))
}

/// Group a collection's documents by section directory.
fn bucket_documents(
    root: &Path,
    dir: &Path,
    collection: &str,
    config: &SiteConfig,
) -> Result<Vec<Bucket>, ScanError> {
    let entries = collect_entries(dir, config)?;
    let files: Vec<&PathBuf> = entries.iter().filter(|p| p.is_file()).collect();

    let mut section_dirs = Vec::new();
    for subdir in entries.iter().filter(|p| p.is_dir()) {
        let section_files: Vec<PathBuf> = collect_entries(subdir, config)?
            .into_iter()
            .filter(|p| p.is_file())
            .collect();
        if !section_files.is_empty() {
            check_path_segment(subdir)?;
            section_dirs.push((file_name(subdir), section_files));
        }
    }

    if !files.is_empty() && !section_dirs.is_empty() {
        return Err(ScanError::MixedContent(dir.to_path_buf()));
    }

    if !files.is_empty() {
        let paths: Vec<PathBuf> = files.into_iter().cloned().collect();
        let bucket = read_bucket(root, collection, MAIN_SECTION, &paths)?;
        return Ok(vec![bucket]);
    }

    section_dirs
        .iter()
        .map(|(key, paths)| read_bucket(root, collection, key, paths))
        .collect()
}

fn read_bucket(
    root: &Path,
    collection: &str,
    key: &str,
    paths: &[PathBuf],
) -> Result<Bucket, ScanError> {
    let mut names = NameRegistry::new(format!("{collection}/{key}"));
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let content = read(path)?;
        let doc = make_document(
            root,
            path,
            content,
            Some(collection.to_string()),
            Some(key.to_string()),
        )?;
        names.claim(&doc)?;
        documents.push(doc);
    }
    Ok(Bucket {
        key: key.to_string(),
        documents,
    })
}

fn make_document(
    root: &Path,
    path: &Path,
    content: String,
    collection: Option<String>,
    section: Option<String>,
) -> Result<Document, ScanError> {
    let stem = naming::base_name(path);
    let output_name = naming::sanitize(&stem);
    if output_name.is_empty() {
        return Err(ScanError::UnnamableDocument(path.to_path_buf()));
    }
    Ok(Document {
        source_path: path.strip_prefix(root).unwrap_or(path).to_path_buf(),
        format: detect::resolve(path, &content),
        content,
        collection,
        section,
        display_name: naming::display_name(&stem),
        stem,
        output_name,
    })
}

/// Tracks output names already taken in one output directory.
struct NameRegistry {
    location: String,
    taken: HashMap<String, PathBuf>,
}

impl NameRegistry {
    fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            taken: HashMap::new(),
        }
    }

    fn claim(&mut self, doc: &Document) -> Result<(), ScanError> {
        if let Some(first) = self.taken.get(&doc.output_name) {
            return Err(ScanError::DuplicateOutputName {
                name: doc.output_name.clone(),
                location: self.location.clone(),
                first: first.clone(),
                second: doc.source_path.clone(),
            });
        }
        self.taken
            .insert(doc.output_name.clone(), doc.source_path.clone());
        Ok(())
    }
}

/// Non-hidden entries of a directory, minus config files, sorted by name.
fn collect_entries(dir: &Path, config: &SiteConfig) -> Result<Vec<PathBuf>, ScanError> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|source| ScanError::Io {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            let name = file_name(p);
            !is_hidden(&name) && name != config.sections_file && name != config::SITE_CONFIG_FILE
        })
        .collect();

    entries.sort_by_key(|p| file_name(p));
    Ok(entries)
}

/// Collection and section directory names are used as-is in link targets.
fn check_path_segment(dir: &Path) -> Result<(), ScanError> {
    if naming::is_path_segment(&file_name(dir)) {
        Ok(())
    } else {
        Err(ScanError::UnsafeDirectoryName(dir.to_path_buf()))
    }
}

fn read(path: &Path) -> Result<String, ScanError> {
    fs::read_to_string(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
