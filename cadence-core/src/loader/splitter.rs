//! Splits a document into headed sections of bullet records.
//!
//! ```text
//! # Usuários
//! - nome: Ana
//! ---
//! # Playlists
//! - nome: Road Trip
//!     usuario: Ana
//!     itens: [Yesterday, Pilot]
//! ```
//!
//! A header closes the open record and starts a new section. A `- ` bullet
//! opens a record; lines indented deeper than the bullet add fields to it.
//! A field left blank (`itens:`) collects the deeper bullets that follow as
//! list items:
//!
//! ```text
//! - nome: Road Trip
//!     itens:
//!         - Yesterday
//!         - Pilot
//! ```
//!
//! Blank lines, unindented dividers, headers, new bullets and unindented text
//! close the record. A divider indented inside the record is skipped.

use serde::Serialize;

use crate::loader::record::{RawRecord, parse_key_value};

/// Columns a tab counts for when measuring indentation.
const TAB_WIDTH: usize = 4;

/// Deepest heading marker accepted (`######`).
const MAX_HEADING_LEVEL: usize = 6;

/// Entity type a section header announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Users,
    Tracks,
    Episodes,
    Playlists,
}

impl SectionKind {
    /// Recognizes a header by keyword, checked in declaration order.
    pub fn from_header(title: &str) -> Option<Self> {
        const KEYWORDS: &[(SectionKind, &[&str])] = &[
            (SectionKind::Users, &["usuário", "usuario"]),
            (SectionKind::Tracks, &["música", "musica"]),
            (SectionKind::Episodes, &["podcast"]),
            (SectionKind::Playlists, &["playlist"]),
        ];

        let title = title.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| title.contains(w)))
            .map(|(kind, _)| *kind)
    }

    pub fn label(self) -> &'static str {
        match self {
            SectionKind::Users => "users",
            SectionKind::Tracks => "tracks",
            SectionKind::Episodes => "episodes",
            SectionKind::Playlists => "playlists",
        }
    }
}

/// One headed group of records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection {
    /// Header text without the heading marker.
    pub header: String,
    /// `None` for headers no loader understands.
    pub kind: Option<SectionKind>,
    pub records: Vec<RawRecord>,
}

/// Record being filled, with the indentation of its bullet.
struct OpenRecord {
    indent: usize,
    record: RawRecord,
    /// Blank field that nested bullets append to.
    list_key: Option<String>,
}

impl OpenRecord {
    fn new(indent: usize, body: &str) -> Self {
        let mut open = Self {
            indent,
            record: RawRecord::new(),
            list_key: None,
        };
        open.absorb(body);
        open
    }

    /// Adds a `key: value` line; lines without a pair are ignored.
    fn absorb(&mut self, line: &str) {
        if let Some((key, value)) = parse_key_value(line) {
            self.list_key = value.is_blank().then(|| key.clone());
            self.record.insert(key, value);
        }
    }
}

/// Line-driven state machine producing [`RawSection`]s.
#[derive(Default)]
struct SectionSplitter {
    sections: Vec<RawSection>,
    current: Option<RawSection>,
    open: Option<OpenRecord>,
    orphaned: usize,
}

impl SectionSplitter {
    fn feed(&mut self, line: &str) {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            self.close_record();
            return;
        }

        if let Some(title) = heading_text(trimmed) {
            self.close_record();
            self.close_section();
            self.current = Some(RawSection {
                header: title.to_string(),
                kind: SectionKind::from_header(title),
                records: Vec::new(),
            });
            return;
        }

        let indent = indent_width(line);
        let nested = self.open.as_ref().is_some_and(|open| indent > open.indent);

        if trimmed.starts_with("---") {
            if !nested {
                self.close_record();
            }
            return;
        }

        if let Some(body) = trimmed.strip_prefix("- ") {
            if nested
                && let Some(open) = &mut self.open
                && let Some(key) = &open.list_key
            {
                open.record.push_list_item(key, body);
                return;
            }
            self.close_record();
            self.open = Some(OpenRecord::new(indent, body));
            return;
        }

        match &mut self.open {
            Some(open) if nested => open.absorb(trimmed),
            _ => self.close_record(),
        }
    }

    fn close_record(&mut self) {
        let Some(open) = self.open.take() else {
            return;
        };
        match &mut self.current {
            Some(section) => section.records.push(open.record),
            None => self.orphaned += 1,
        }
    }

    fn close_section(&mut self) {
        if let Some(section) = self.current.take() {
            tracing::debug!(
                header = %section.header,
                records = section.records.len(),
                "Closed section"
            );
            self.sections.push(section);
        }
    }

    fn finish(mut self) -> Vec<RawSection> {
        self.close_record();
        self.close_section();
        if self.orphaned > 0 {
            tracing::debug!(records = self.orphaned, "Skipped records before the first header");
        }
        self.sections
    }
}

/// Splits `text` into sections in document order.
pub fn split_sections(text: &str) -> Vec<RawSection> {
    let mut splitter = SectionSplitter::default();
    for line in text.lines() {
        splitter.feed(line);
    }
    splitter.finish()
}

/// Returns the header title when `trimmed` starts with 1-6 `#` and whitespace.
fn heading_text(trimmed: &str) -> Option<&str> {
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > MAX_HEADING_LEVEL {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim())
}

fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}
