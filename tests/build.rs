//! End-to-end builds through the public API.
//!
//! Each test lays out a source root in a temp directory, runs scan and
//! generate, and inspects the written capsule.

use simple_capsule::config::SiteConfig;
use simple_capsule::footer::Footer;
use simple_capsule::generate::{self, BuildError, BuildPaths};
use simple_capsule::scan::{self, ScanError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

fn paths(source: &TempDir, output: &TempDir) -> BuildPaths {
    BuildPaths {
        source_root: source.path().to_path_buf(),
        output_root: output.path().to_path_buf(),
    }
}

fn default_footer() -> String {
    let config = SiteConfig::default();
    Footer::from_config(&config.footer).attribution().to_string()
}

#[test]
fn single_page_gets_link_and_footer() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(source.path(), "notes.txt", "- https://example.com");

    let manifest = scan::scan(source.path()).unwrap();
    generate::generate(&manifest, output.path()).unwrap();

    let notes = read(output.path(), "pages/notes.gmi");
    assert_eq!(
        notes,
        format!("=> https://example.com\n\n---\n\n{}\n", default_footer())
    );
}

#[test]
fn missing_source_root_builds_home_only() {
    let output = TempDir::new().unwrap();
    let build = BuildPaths {
        source_root: output.path().join("does-not-exist"),
        output_root: output.path().join("capsule"),
    };

    let (manifest, report) = generate::build(&build).unwrap();

    assert!(manifest.pages.is_empty());
    assert!(manifest.collections.is_empty());
    assert_eq!(report.written.len(), 1);
    let home = read(&build.output_root, "index.gmi");
    assert!(home.contains("There are 0 pages available."));
}

#[test]
fn collection_chain_and_indices() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(source.path(), "letters/A/a1.md", "# First\n\nHello.");
    write(source.path(), "letters/A/a2.md", "# Second\n\nAgain.");
    write(source.path(), "letters/B/b1.md", "Last one, no heading.");

    generate::build(&paths(&source, &output)).unwrap();

    let a1 = read(output.path(), "collections/letters/A/a1.gmi");
    assert!(!a1.contains('←'));
    assert!(a1.contains("=> /collections/letters/A/a2.gmi A2 →"));

    let a2 = read(output.path(), "collections/letters/A/a2.gmi");
    assert!(a2.contains("=> /collections/letters/A/a1.gmi ← A1"));
    assert!(a2.contains("=> /collections/letters/B/b1.gmi B1 →"));

    let b1 = read(output.path(), "collections/letters/B/b1.gmi");
    assert!(b1.contains("=> /collections/letters/A/a2.gmi ← A2"));
    assert!(b1.contains("=> /collections/letters/B/index.gmi ↑ Section index"));
    assert!(!b1.contains('→'));

    let collection = read(output.path(), "collections/letters/index.gmi");
    assert!(
        collection.starts_with("# Letters\n\n## A\n\n=> /collections/letters/A/index.gmi Browse A\n")
    );

    let home = read(output.path(), "index.gmi");
    assert!(home.contains("=> /collections/letters/index.gmi LETTERS\n"));
    assert!(home.contains("=> /collections/letters/index.gmi Read the letters: Letters\n"));
}

#[test]
fn sections_file_orders_and_drops() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(
        source.path(),
        "diary/sections.json",
        r#"{"mainMenuName": "Diary", "sections": {"late": "Later", "early": "Earlier"}, "order": ["late", "early"]}"#,
    );
    write(source.path(), "diary/early/one.txt", "one");
    write(source.path(), "diary/late/two.txt", "two");
    write(source.path(), "diary/extra/three.txt", "three");

    generate::build(&paths(&source, &output)).unwrap();

    let collection = read(output.path(), "collections/diary/index.gmi");
    let later = collection.find("## Later").unwrap();
    let earlier = collection.find("## Earlier").unwrap();
    assert!(later < earlier);
    assert!(!output.path().join("collections/diary/extra").exists());

    // Flattened order follows the configured order: two, then one.
    let two = read(output.path(), "collections/diary/late/two.gmi");
    assert!(two.contains("=> /collections/diary/early/one.gmi One →"));
}

#[test]
fn fenced_block_is_byte_identical() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let fenced = "```\n# not a heading\n- **not** a [list](item)\n   indented\n```";
    write(
        source.path(),
        "code/snippets/example.md",
        &format!("# Example\n\n{fenced}\n\nAfter **the** fence."),
    );

    generate::build(&paths(&source, &output)).unwrap();

    let page = read(output.path(), "collections/code/snippets/example.gmi");
    assert!(page.contains(fenced));
    assert!(page.contains("After the fence."));
}

#[test]
fn rebuild_keeps_single_footer() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(source.path(), "about.txt", "# About\n\nHello.");
    let build = paths(&source, &output);

    generate::build(&build).unwrap();
    let first = read(output.path(), "pages/about.gmi");
    generate::build(&build).unwrap();
    let second = read(output.path(), "pages/about.gmi");

    assert_eq!(first, second);
    assert_eq!(second.matches(&default_footer()).count(), 1);
}

#[test]
fn emptied_landing_page_is_removed() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(source.path(), "index.txt", "Welcome.");
    let build = paths(&source, &output);

    generate::build(&build).unwrap();
    assert!(output.path().join("pages/index.gmi").is_file());

    write(source.path(), "index.txt", "  \n");
    let (_, report) = generate::build(&build).unwrap();
    assert!(!output.path().join("pages/index.gmi").exists());
    assert_eq!(report.removed.len(), 1);
}

#[test]
fn colliding_names_abort_the_build() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(source.path(), "notes/my notes.txt", "a");
    write(source.path(), "notes/my_notes.txt", "b");

    let err = generate::build(&paths(&source, &output)).unwrap_err();
    assert!(matches!(
        err,
        BuildError::Scan(ScanError::DuplicateOutputName { ref name, .. }) if name == "my_notes"
    ));
    assert!(!output.path().join("index.gmi").exists());
}

#[test]
fn site_config_overrides_home_and_footer() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(
        source.path(),
        "config.toml",
        "[home]\ntitle = \"Garden\"\n\n[footer]\nlines = [\"Grown by hand.\", \"=> / Home\"]\n",
    );
    write(source.path(), "seeds.txt", "Seeds.");

    generate::build(&paths(&source, &output)).unwrap();

    let home = read(output.path(), "index.gmi");
    assert!(home.starts_with("# Garden\n"));
    assert!(home.ends_with("---\n\nGrown by hand.\n=> / Home\n"));
    assert!(!output.path().join("pages/config.gmi").exists());
}

#[test]
fn renamed_document_leaves_no_orphan() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(source.path(), "letters/one/draft.md", "# Draft");
    let build = paths(&source, &output);

    generate::build(&build).unwrap();
    assert!(output.path().join("collections/letters/one/draft.gmi").is_file());

    fs::rename(
        source.path().join("letters/one/draft.md"),
        source.path().join("letters/one/final.md"),
    )
    .unwrap();
    let (_, report) = generate::build(&build).unwrap();

    assert!(!output.path().join("collections/letters/one/draft.gmi").exists());
    assert!(output.path().join("collections/letters/one/final.gmi").is_file());
    assert_eq!(
        report.removed,
        vec![std::path::PathBuf::from("collections/letters/one/draft.gmi")]
    );
}

#[test]
fn space_in_section_directory_aborts_the_build() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(source.path(), "trips/first leg/a.md", "# A");

    let err = generate::build(&paths(&source, &output)).unwrap_err();
    assert!(matches!(
        err,
        BuildError::Scan(ScanError::UnsafeDirectoryName(_))
    ));
}
