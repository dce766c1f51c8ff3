//! Line-oriented rewriting of source markup into gemtext.
//!
//! Conversion is a single pass over the lines of a document. Each line is
//! classified once into a [`LineKind`] and then rewritten according to the
//! rule for that kind. The only state carried between lines is whether the
//! scan is inside a fenced code block ([`FenceState`]).
//!
//! ## Plain text
//!
//! | Input (trimmed)          | Output              |
//! |--------------------------|---------------------|
//! | `# Title`                | `# Title`           |
//! | `- https://example.com`  | `=> https://example.com` |
//! | blank                    | blank               |
//! | anything else            | unchanged           |
//!
//! Fence markers have no meaning in plain text and pass through as text.
//!
//! ## Rich text
//!
//! Checked in this order, first match wins:
//!
//! 1. a line starting with ` ``` ` toggles the fence; fenced lines are verbatim
//! 2. `#`..`###` headings are kept
//! 3. `- item` becomes `* item` with emphasis stripped
//! 4. any line containing `](` has every `[text](url)` rewritten to
//!    `=> url text`, then emphasis stripped
//! 5. blank lines stay blank
//! 6. everything else has emphasis stripped; a `---` rule becomes blank
//!
//! The link rule fires on the `](` substring anywhere in the line, so a link
//! in the middle of a paragraph splits nothing: the rewritten `=>` text stays
//! inline. That matches how existing capsules were produced.

use crate::types::Format;

const FENCE: &str = "```";

/// Classification of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Opens or closes a fenced block. Emitted verbatim.
    FenceToggle,
    /// Inside a fenced block. Emitted verbatim.
    Verbatim,
    Heading,
    ListItem,
    LinkLine,
    Blank,
    Text,
}

/// Whether the scan is currently inside a fenced code block.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FenceState {
    inside: bool,
}

impl FenceState {
    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// Advance the state past a classified line.
    pub fn observe(&mut self, kind: LineKind) {
        if kind == LineKind::FenceToggle {
            self.inside = !self.inside;
        }
    }
}

/// Classify a plain-text line. Plain text has no fences.
pub fn classify_plain(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.starts_with("# ") {
        LineKind::Heading
    } else if trimmed.starts_with("- http://") || trimmed.starts_with("- https://") {
        LineKind::LinkLine
    } else if trimmed.is_empty() {
        LineKind::Blank
    } else {
        LineKind::Text
    }
}

/// Classify a rich-text line given the current fence state.
pub fn classify_rich(line: &str, fence: FenceState) -> LineKind {
    let trimmed = line.trim();
    if trimmed.starts_with(FENCE) {
        LineKind::FenceToggle
    } else if fence.is_inside() {
        LineKind::Verbatim
    } else if heading_level(trimmed).is_some_and(|level| level <= 3) {
        LineKind::Heading
    } else if list_item_content(trimmed).is_some() {
        LineKind::ListItem
    } else if line.contains("](") {
        LineKind::LinkLine
    } else if trimmed.is_empty() {
        LineKind::Blank
    } else {
        LineKind::Text
    }
}

/// Stateful converter for one document.
#[derive(Debug)]
pub struct LineConverter {
    format: Format,
    fence: FenceState,
}

impl LineConverter {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            fence: FenceState::default(),
        }
    }

    /// Rewrite a single line, advancing fence state.
    pub fn convert_line(&mut self, line: &str) -> String {
        match self.format {
            Format::Plain => convert_plain_line(line),
            Format::Rich => {
                let kind = classify_rich(line, self.fence);
                self.fence.observe(kind);
                convert_rich_line(line, kind)
            }
        }
    }

    /// Rewrite a whole document. Line structure (including a trailing
    /// newline) is preserved.
    pub fn convert(mut self, content: &str) -> String {
        content
            .split('\n')
            .map(|line| self.convert_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Convert a document body in the given format.
pub fn convert(content: &str, format: Format) -> String {
    LineConverter::new(format).convert(content)
}

fn convert_plain_line(line: &str) -> String {
    let trimmed = line.trim();
    match classify_plain(line) {
        LineKind::Heading => trimmed.to_string(),
        LineKind::LinkLine => format!("=> {}", trimmed[2..].trim()),
        LineKind::Blank => String::new(),
        _ => line.to_string(),
    }
}

fn convert_rich_line(line: &str, kind: LineKind) -> String {
    let trimmed = line.trim();
    match kind {
        LineKind::FenceToggle | LineKind::Verbatim => line.to_string(),
        LineKind::Heading => trimmed.to_string(),
        LineKind::ListItem => {
            let content = list_item_content(trimmed).unwrap_or_default();
            format!("* {}", strip_emphasis(content))
        }
        LineKind::LinkLine => strip_emphasis(&rewrite_links(line)),
        LineKind::Blank => String::new(),
        LineKind::Text => {
            let stripped = strip_emphasis(line);
            if is_rule(stripped.trim()) {
                String::new()
            } else {
                stripped
            }
        }
    }
}

/// Number of leading `#` when followed by whitespace.
pub(crate) fn heading_level(trimmed: &str) -> Option<usize> {
    let level = trimmed.chars().take_while(|&c| c == '#').count();
    if level == 0 {
        return None;
    }
    trimmed[level..]
        .chars()
        .next()
        .filter(|c| c.is_whitespace())
        .map(|_| level)
}

/// Content after a `-` list marker and its whitespace.
fn list_item_content(trimmed: &str) -> Option<&str> {
    let rest = trimmed.strip_prefix('-')?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

fn is_rule(trimmed: &str) -> bool {
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == '-')
}

// ============================================================================
// Inline spans
// ============================================================================

/// A `[text](target)` occurrence, as char indices.
struct LinkSpan {
    start: usize,
    end: usize,
    text: (usize, usize),
    target: (usize, usize),
}

/// Link finder over one line.
///
/// `next_close[i]` and `next_paren[i]` hold the first `]` / `)` at or after
/// `i` (or the line length), so checking a candidate `[` is constant time and
/// a full scan of the line stays linear.
struct LinkScanner<'a> {
    chars: &'a [char],
    next_close: Vec<usize>,
    next_paren: Vec<usize>,
}

impl<'a> LinkScanner<'a> {
    fn new(chars: &'a [char]) -> Self {
        let len = chars.len();
        let mut next_close = vec![len; len + 1];
        let mut next_paren = vec![len; len + 1];
        for i in (0..len).rev() {
            next_close[i] = if chars[i] == ']' { i } else { next_close[i + 1] };
            next_paren[i] = if chars[i] == ')' { i } else { next_paren[i + 1] };
        }
        Self {
            chars,
            next_close,
            next_paren,
        }
    }

    fn find(&self, from: usize) -> Option<LinkSpan> {
        let len = self.chars.len();
        // No `]` left means no link can start at or after `from`.
        if from >= len || self.next_close[from] == len {
            return None;
        }
        (from..len).find_map(|start| self.link_at(start))
    }

    fn link_at(&self, start: usize) -> Option<LinkSpan> {
        let len = self.chars.len();
        if self.chars[start] != '[' {
            return None;
        }
        let close = self.next_close[start + 1];
        if close == len || close == start + 1 || self.chars.get(close + 1) != Some(&'(') {
            return None;
        }
        let open = close + 1;
        let end = self.next_paren[open + 1];
        if end == len || end == open + 1 {
            return None;
        }
        Some(LinkSpan {
            start,
            end,
            text: (start + 1, close),
            target: (open + 1, end),
        })
    }
}

fn position_from(chars: &[char], from: usize, needle: char) -> Option<usize> {
    chars
        .get(from..)?
        .iter()
        .position(|&c| c == needle)
        .map(|p| p + from)
}

/// Count `[text](target)` occurrences in a line.
pub fn count_links(line: &str) -> usize {
    let chars: Vec<char> = line.chars().collect();
    let scanner = LinkScanner::new(&chars);
    let mut count = 0;
    let mut pos = 0;
    while let Some(link) = scanner.find(pos) {
        count += 1;
        pos = link.end + 1;
    }
    count
}

/// Rewrite every `[text](target)` into `=> target text`.
pub fn rewrite_links(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let scanner = LinkScanner::new(&chars);
    let mut out = String::with_capacity(line.len() + 8);
    let mut pos = 0;
    while let Some(link) = scanner.find(pos) {
        out.extend(&chars[pos..link.start]);
        out.push_str("=> ");
        out.extend(&chars[link.target.0..link.target.1]);
        out.push(' ');
        out.extend(&chars[link.text.0..link.text.1]);
        pos = link.end + 1;
    }
    out.extend(&chars[pos..]);
    out
}

/// Index of the closing `**` for a span opened at `open`, if any.
fn bold_close(chars: &[char], open: usize) -> Option<usize> {
    // At least one character between the markers.
    let from = open + 3;
    (from..chars.len().saturating_sub(1)).find(|&j| chars[j] == '*' && chars[j + 1] == '*')
}

pub(crate) fn has_bold_span(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    (0..chars.len()).any(|i| {
        chars[i] == '*' && chars.get(i + 1) == Some(&'*') && bold_close(&chars, i).is_some()
    })
}

/// Collapse `**bold**` spans to their inner text.
pub fn strip_bold(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '*'
            && chars.get(i + 1) == Some(&'*')
            && let Some(close) = bold_close(&chars, i)
        {
            out.extend(&chars[i + 2..close]);
            i = close + 2;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Collapse `*italic*` spans whose markers are not next to another `*`.
pub fn strip_italic(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '*'
            && (i == 0 || chars[i - 1] != '*')
            && let Some(close) = position_from(&chars, i + 1, '*')
            && close > i + 1
            && chars.get(close + 1) != Some(&'*')
        {
            out.extend(&chars[i + 1..close]);
            i = close + 1;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Bold first, then italic.
pub fn strip_emphasis(text: &str) -> String {
    strip_italic(&strip_bold(text))
}
