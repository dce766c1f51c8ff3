//! # Simple Capsule
//!
//! A Gemini capsule generator for hand-kept text collections. Your filesystem
//! is the data source: top-level text files become pages, directories become
//! collections, and their subdirectories become sections.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  Manifest     (filesystem → structured data)
//! 2. Generate  Manifest  →  capsule/     (gemtext pages and indices)
//! ```
//!
//! The manifest is serializable, so `simple-capsule scan` prints the
//! structure the generate stage will walk. Generation reads nothing from
//! the source root: document bodies travel in the in-memory manifest.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks the source root, reads pages and collections, produces the manifest |
//! | [`generate`] | Stage 2: converts, links, foots and writes every page, then the indices |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation; `sections.json` parsing |
//! | [`types`] | Shared manifest types (`Document`, `Section`, `Collection`) and capsule URLs |
//! | [`detect`] | Plain vs rich format detection |
//! | [`convert`] | Line-by-line rewriting into gemtext |
//! | [`naming`] | Output filename sanitizing and display names |
//! | [`sections`] | Section naming and ordering per collection, legacy labels |
//! | [`navigation`] | Previous / up / next links across a collection |
//! | [`footer`] | Idempotent attribution footer |
//! | [`index`] | Home, collection and section index pages |
//! | [`output`] | CLI output formatting for scan and build |
//!
//! # Design Decisions
//!
//! ## Line-Oriented Conversion
//!
//! Source markup is rewritten one line at a time. Each line is classified
//! once into a [`convert::LineKind`]; the only state carried between lines
//! is whether the converter is inside a fenced block. Inline markup that
//! the classifier does not recognize is left as text, which is what a
//! gemtext reader would show anyway.
//!
//! ## Declared Formats
//!
//! `.txt` is always plain and `.md` is always rich. Content detection only
//! decides for files whose extension says nothing. A plain page with a `#`
//! title still gets its `- https://` bullets turned into link lines.
//!
//! ## Sequential, Fail-Fast
//!
//! Every document is read, converted, linked, footed and written before the
//! next. The first I/O failure or naming collision aborts the run with a
//! typed error; nothing is retried.

pub mod config;
pub mod convert;
pub mod detect;
pub mod footer;
pub mod generate;
pub mod index;
pub mod naming;
pub mod navigation;
pub mod output;
pub mod scan;
pub mod sections;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
