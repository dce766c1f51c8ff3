//! Attribution footer for generated pages.
//!
//! Every page written to the capsule ends with:
//!
//! ```text
//! <content, trailing whitespace trimmed>
//!
//! ---
//!
//! <attribution line 1>
//! <attribution line 2>
//! ```
//!
//! Pages built in memory carry a `footer_applied` flag, so finalizing twice
//! is a no-op regardless of the footer text. Text that arrives without the
//! flag (e.g. re-read from disk) falls back to checking whether the exact
//! attribution text already occurs in it.

use crate::config::FooterConfig;

/// The attribution block appended to pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    attribution: String,
}

impl Footer {
    pub fn new(first: &str, second: &str) -> Self {
        Self {
            attribution: format!("{first}\n{second}"),
        }
    }

    pub fn from_config(config: &FooterConfig) -> Self {
        Self::new(&config.lines[0], &config.lines[1])
    }

    /// The two attribution lines, newline-joined.
    pub fn attribution(&self) -> &str {
        &self.attribution
    }

    /// Whether `content` already ends in (or contains) this attribution.
    pub fn is_present_in(&self, content: &str) -> bool {
        content.contains(&self.attribution)
    }

    fn append_to(&self, content: &str) -> String {
        format!("{}\n\n---\n\n{}\n", content.trim_end(), self.attribution)
    }
}

/// Append the footer to raw text unless the attribution is already there.
pub fn inject(content: &str, footer: &Footer) -> String {
    if footer.is_present_in(content) {
        content.to_string()
    } else {
        footer.append_to(content)
    }
}

/// A page body on its way to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    body: String,
    footer_applied: bool,
}

impl GeneratedPage {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            footer_applied: false,
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn footer_applied(&self) -> bool {
        self.footer_applied
    }

    /// Append the footer once.
    pub fn finalize(&mut self, footer: &Footer) {
        if self.footer_applied {
            return;
        }
        self.body = inject(&self.body, footer);
        self.footer_applied = true;
    }

    pub fn into_body(self) -> String {
        self.body
    }
}
