//! Section splitting for RET documents.
//!
//! A RET document is three concatenated sections introduced by marker lines:
//!
//! ```text
//! ---JSON---
//! { "name": "welcome", "variables": { "user": "" } }
//! ---HTML---
//! <p>Hello {{user}}</p>
//! ---TEXT---
//! Hello {{user}}
//! ```
//!
//! Markers match case-insensitively. Each section's content starts after the
//! marker, any whitespace following it, and the newline that ends that run.
//! A section whose marker pair is missing, or whose content is empty, is
//! absent; downstream checks treat an absent section as nothing to check.

use once_cell::sync::Lazy;
use regex::Regex;
use ret_source_map::Span;
use serde::{Deserialize, Serialize};

static JSON_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)---JSON---\s*\r?\n(.*?)---HTML---").expect("valid JSON section pattern")
});

static HTML_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)---HTML---\s*\r?\n(.*?)(?:---TEXT---|\z)")
        .expect("valid HTML section pattern")
});

static TEXT_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)---TEXT---\s*\r?\n(.*)\z").expect("valid TEXT section pattern")
});

/// The three section kinds of a RET document, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Json,
    Html,
    Text,
}

impl SectionKind {
    pub const ALL: [SectionKind; 3] = [SectionKind::Json, SectionKind::Html, SectionKind::Text];

    /// The literal marker that introduces this section.
    pub fn marker(&self) -> &'static str {
        match self {
            SectionKind::Json => "---JSON---",
            SectionKind::Html => "---HTML---",
            SectionKind::Text => "---TEXT---",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            SectionKind::Json => &JSON_SECTION,
            SectionKind::Html => &HTML_SECTION,
            SectionKind::Text => &TEXT_SECTION,
        }
    }
}

/// One section of a document, borrowed from the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    pub kind: SectionKind,
    /// The section body, excluding the marker line.
    pub content: &'a str,
    /// Absolute byte offset of the first character of `content`.
    pub start_offset: usize,
    /// The marker and the whitespace/newline run between it and `content`.
    pub header: &'a str,
}

impl<'a> Section<'a> {
    /// Absolute span of the section body.
    pub fn span(&self) -> Span {
        Span::at(self.start_offset, self.content.len())
    }

    /// Absolute span of the marker text itself.
    pub fn marker_span(&self) -> Span {
        Span::at(self.header_start(), self.kind.marker().len())
    }

    pub fn header_start(&self) -> usize {
        self.start_offset - self.header.len()
    }

    pub fn end_offset(&self) -> usize {
        self.start_offset + self.content.len()
    }

    fn locate(kind: SectionKind, text: &'a str) -> Option<Self> {
        let caps = kind.pattern().captures(text)?;
        let whole = caps.get(0)?;
        let content = caps.get(1)?;
        if content.as_str().is_empty() {
            return None;
        }
        Some(Section {
            kind,
            content: content.as_str(),
            start_offset: content.start(),
            header: &text[whole.start()..content.start()],
        })
    }
}

/// The result of splitting a document into its sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSplit<'a> {
    source: &'a str,
    pub json: Option<Section<'a>>,
    pub html: Option<Section<'a>>,
    pub text: Option<Section<'a>>,
}

impl<'a> SectionSplit<'a> {
    /// Split `text` into its JSON, HTML and TEXT sections.
    pub fn split(text: &'a str) -> Self {
        Self {
            source: text,
            json: Section::locate(SectionKind::Json, text),
            html: Section::locate(SectionKind::Html, text),
            text: Section::locate(SectionKind::Text, text),
        }
    }

    pub fn get(&self, kind: SectionKind) -> Option<&Section<'a>> {
        match kind {
            SectionKind::Json => self.json.as_ref(),
            SectionKind::Html => self.html.as_ref(),
            SectionKind::Text => self.text.as_ref(),
        }
    }

    /// The sections that carry template expressions (HTML, then TEXT).
    pub fn body_sections(&self) -> impl Iterator<Item = &Section<'a>> {
        self.html.iter().chain(self.text.iter())
    }

    /// Rebuild the document from its sections.
    ///
    /// Returns None unless all three sections are present and tile the
    /// document in order, i.e. the document is well formed.
    pub fn reassemble(&self) -> Option<String> {
        let (json, html, text) = (self.json?, self.html?, self.text?);
        let tiled = json.end_offset() == html.header_start()
            && html.end_offset() == text.header_start()
            && text.end_offset() == self.source.len();
        if !tiled {
            return None;
        }

        let mut out = String::with_capacity(self.source.len());
        out.push_str(&self.source[..json.header_start()]);
        for section in [json, html, text] {
            out.push_str(section.header);
            out.push_str(section.content);
        }
        Some(out)
    }
}

/// Split `text` into its sections.
pub fn split_sections(text: &str) -> SectionSplit<'_> {
    SectionSplit::split(text)
}
