//! Site and collection configuration.
//!
//! Two configuration files are recognised, both optional:
//!
//! ```text
//! content/
//! ├── config.toml              # Site config (home page text, footer, names)
//! ├── links.txt
//! └── cartas/
//!     ├── sections.json        # Collection config (labels and section order)
//!     ├── 01_inicio/
//!     └── 02_viagem/
//! ```
//!
//! ## Site config
//!
//! ```toml
//! # All options are optional - defaults shown by `simple-capsule gen-config`
//!
//! landing_page = "index"           # stem of the reserved landing file
//! sections_file = "sections.json"  # per-collection config filename
//!
//! [home]
//! title = "Krako"
//! banner = "..."
//! intro = ["..."]
//! closing = ["..."]
//!
//! [home.page_labels]               # page stem -> label on the home page
//! krako = "Krako"
//!
//! [footer]
//! lines = ["...", "..."]           # exactly two attribution lines
//! ```
//!
//! User values are merged over the stock defaults, so a config file only
//! needs the keys it changes. Unknown keys are rejected to catch typos.
//!
//! ## Collection config
//!
//! ```json
//! {
//!   "mainMenuName": "Cartas para Pablo",
//!   "sections": { "01_inicio": "Início", "02_viagem": "A Viagem" },
//!   "order": ["01_inicio", "02_viagem"]
//! }
//! ```
//!
//! Every field may be omitted; see [`crate::sections`] for the fallbacks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SITE_CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid collection config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Stem of the reserved landing file (`index` → `index.txt`).
    pub landing_page: String,
    /// Name of the per-collection configuration file.
    pub sections_file: String,
    /// Home page text.
    pub home: HomeConfig,
    /// Attribution appended to every page.
    pub footer: FooterConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            landing_page: "index".to_string(),
            sections_file: "sections.json".to_string(),
            home: HomeConfig::default(),
            footer: FooterConfig::default(),
        }
    }
}

impl SiteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.landing_page.trim().is_empty() {
            return Err(ConfigError::Validation(
                "landing_page must not be empty".into(),
            ));
        }
        if self.sections_file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "sections_file must not be empty".into(),
            ));
        }
        if self.home.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "home.title must not be empty".into(),
            ));
        }
        if self.footer.lines.iter().any(|l| l.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "footer.lines must be two non-empty lines".into(),
            ));
        }
        Ok(())
    }

    /// File name of the reserved landing page.
    pub fn landing_file_name(&self) -> String {
        format!("{}.txt", self.landing_page)
    }
}

/// Fixed text blocks of the home page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomeConfig {
    /// Masthead, rendered as the top-level heading.
    pub title: String,
    /// One-line banner under the masthead.
    pub banner: String,
    /// Paragraphs between the banner and the listings.
    pub intro: Vec<String>,
    /// Paragraphs at the bottom of the page.
    pub closing: Vec<String>,
    /// Page stem → label, for names that shouldn't be upper-cased.
    pub page_labels: BTreeMap<String, String>,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            title: "Krako".to_string(),
            banner: "the Quantum Experimental Laboratories at 0xpblab — directory".to_string(),
            intro: vec![
                "A web1-style directory of interesting places on the internet.".to_string(),
                "This is a Gemini capsule.".to_string(),
            ],
            closing: vec![
                "Links are collected by hand. Some of them will have moved by the time you read this."
                    .to_string(),
            ],
            page_labels: BTreeMap::from([("krako".to_string(), "Krako".to_string())]),
        }
    }
}

/// Attribution block appended to every generated page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FooterConfig {
    pub lines: [String; 2],
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            lines: [
                "Generated by simple-capsule from plain text sources.".to_string(),
                "=> / Back to the directory".to_string(),
            ],
        }
    }
}

/// Per-collection `sections.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SectionsFile {
    /// Collection label.
    pub main_menu_name: Option<String>,
    /// Section key → display name.
    pub sections: BTreeMap<String, String>,
    /// Explicit section order. Sections missing from it are not published.
    pub order: Option<Vec<String>>,
}

// =============================================================================
// Loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` when the file doesn't exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(SITE_CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the site config from the source root, defaults when absent.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(root)?)
}

/// Load a collection's `sections.json`. `Ok(None)` when it doesn't exist.
pub fn load_sections_file(
    collection_dir: &Path,
    file_name: &str,
) -> Result<Option<SectionsFile>, ConfigError> {
    let path = collection_dir.join(file_name);
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Json { path, source })
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# simple-capsule configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Stem of the reserved landing file. An empty `index.txt` produces no page,
# and any page left over from a previous build is removed.
landing_page = "index"

# Name of the optional per-collection configuration file.
sections_file = "sections.json"

# ---------------------------------------------------------------------------
# Home page
# ---------------------------------------------------------------------------
[home]
# Masthead, rendered as "# <title>".
title = "Krako"

# One line under the masthead.
banner = "the Quantum Experimental Laboratories at 0xpblab — directory"

# Paragraphs before the page and collection listings.
intro = [
    "A web1-style directory of interesting places on the internet.",
    "This is a Gemini capsule.",
]

# Paragraphs at the bottom of the home page.
closing = [
    "Links are collected by hand. Some of them will have moved by the time you read this.",
]

# Page names are upper-cased on the home page. List exceptions here.
[home.page_labels]
krako = "Krako"

# ---------------------------------------------------------------------------
# Footer
# ---------------------------------------------------------------------------
[footer]
# Exactly two lines, appended to every page after a "---" rule.
lines = [
    "Generated by simple-capsule from plain text sources.",
    "=> / Back to the directory",
]
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        SiteConfig::default().validate().unwrap();
    }

    #[test]
    fn stock_toml_matches_defaults() {
        let parsed: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(parsed.landing_page, defaults.landing_page);
        assert_eq!(parsed.sections_file, defaults.sections_file);
        assert_eq!(parsed.home.title, defaults.home.title);
        assert_eq!(parsed.home.banner, defaults.home.banner);
        assert_eq!(parsed.home.intro, defaults.home.intro);
        assert_eq!(parsed.home.closing, defaults.home.closing);
        assert_eq!(parsed.home.page_labels, defaults.home.page_labels);
        assert_eq!(parsed.footer.lines, defaults.footer.lines);
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.home.title, "Krako");
        assert_eq!(config.landing_file_name(), "index.txt");
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[home]\ntitle = \"My Capsule\"\n",
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.home.title, "My Capsule");
        assert_eq!(config.home.intro.len(), 2);
        assert_eq!(config.sections_file, "sections.json");
    }

    #[test]
    fn page_labels_table_replaced_key_by_key() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[home.page_labels]\nfaq = \"FaQ\"\n",
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.home.page_labels.get("faq").unwrap(), "FaQ");
        assert_eq!(config.home.page_labels.get("krako").unwrap(), "Krako");
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "colour = \"red\"\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[home\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn footer_needs_two_lines() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[footer]\nlines = [\"only one\"]\n",
        )
        .unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn blank_footer_line_fails_validation() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[footer]\nlines = [\"a\", \"  \"]\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn sections_file_full() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("sections.json"),
            r#"{"mainMenuName": "Cartas", "sections": {"a": "Alpha"}, "order": ["a"]}"#,
        )
        .unwrap();
        let file = load_sections_file(tmp.path(), "sections.json")
            .unwrap()
            .unwrap();
        assert_eq!(file.main_menu_name.as_deref(), Some("Cartas"));
        assert_eq!(file.sections.get("a").unwrap(), "Alpha");
        assert_eq!(file.order, Some(vec!["a".to_string()]));
    }

    #[test]
    fn sections_file_fields_optional() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("sections.json"), "{}").unwrap();
        let file = load_sections_file(tmp.path(), "sections.json")
            .unwrap()
            .unwrap();
        assert_eq!(file, SectionsFile::default());
    }

    #[test]
    fn sections_file_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(
            load_sections_file(tmp.path(), "sections.json")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn sections_file_invalid_json_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("sections.json"), "{ nope").unwrap();
        assert!(matches!(
            load_sections_file(tmp.path(), "sections.json"),
            Err(ConfigError::Json { .. })
        ));
    }
}
