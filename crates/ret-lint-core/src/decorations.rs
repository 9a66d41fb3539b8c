//! Separator highlighting.
//!
//! Each marker line is drawn in its section's colour. Unlike section
//! splitting, marker search here is case-sensitive and reports every
//! occurrence, so stray markers are highlighted too.

use serde::{Deserialize, Serialize};

use crate::config::RetConfig;
use crate::document::Document;
use crate::sections::SectionKind;
use crate::types::Range;

/// Ranges of every marker occurrence, grouped by section kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeparatorRanges {
    pub json: Vec<Range>,
    pub html: Vec<Range>,
    pub text: Vec<Range>,
}

impl SeparatorRanges {
    pub fn get(&self, kind: SectionKind) -> &[Range] {
        match kind {
            SectionKind::Json => &self.json,
            SectionKind::Html => &self.html,
            SectionKind::Text => &self.text,
        }
    }

    fn get_mut(&mut self, kind: SectionKind) -> &mut Vec<Range> {
        match kind {
            SectionKind::Json => &mut self.json,
            SectionKind::Html => &mut self.html,
            SectionKind::Text => &mut self.text,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.json.is_empty() && self.html.is_empty() && self.text.is_empty()
    }
}

/// Find every marker occurrence in `doc`. Non-RET documents have none.
pub fn find_separators(doc: &Document) -> SeparatorRanges {
    let mut ranges = SeparatorRanges::default();
    if !doc.is_ret() {
        return ranges;
    }

    let text = doc.content();
    for kind in SectionKind::ALL {
        let marker = kind.marker();
        ranges.get_mut(kind).extend(text.match_indices(marker).map(|(start, _)| {
            Range::new(doc.position_at(start), doc.position_at(start + marker.len()))
        }));
    }
    ranges
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    #[default]
    Bold,
}

/// How one kind of separator is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorationStyle {
    pub color: String,
    pub font_weight: FontWeight,
}

impl DecorationStyle {
    pub fn bold(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            font_weight: FontWeight::Bold,
        }
    }
}

/// One style per section kind, derived from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationStyles {
    pub json: DecorationStyle,
    pub html: DecorationStyle,
    pub text: DecorationStyle,
}

impl DecorationStyles {
    pub fn from_config(config: &RetConfig) -> Self {
        Self {
            json: DecorationStyle::bold(config.separator_color(SectionKind::Json)),
            html: DecorationStyle::bold(config.separator_color(SectionKind::Html)),
            text: DecorationStyle::bold(config.separator_color(SectionKind::Text)),
        }
    }

    pub fn get(&self, kind: SectionKind) -> &DecorationStyle {
        match kind {
            SectionKind::Json => &self.json,
            SectionKind::Html => &self.html,
            SectionKind::Text => &self.text,
        }
    }
}

impl Default for DecorationStyles {
    fn default() -> Self {
        Self::from_config(&RetConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationLayer {
    pub kind: SectionKind,
    pub style: DecorationStyle,
    pub ranges: Vec<Range>,
}

/// The decorations applied to one document.
///
/// Serializes to the payload of the `ret/decorations` notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationSet {
    pub uri: String,
    pub layers: Vec<DecorationLayer>,
}

impl DecorationSet {
    /// Decorate `doc` with `styles`. Every kind gets a layer, possibly
    /// without ranges, so applying a set always replaces the previous one.
    pub fn for_document(doc: &Document, styles: &DecorationStyles) -> Self {
        let separators = find_separators(doc);
        let layers = SectionKind::ALL
            .into_iter()
            .map(|kind| DecorationLayer {
                kind,
                style: styles.get(kind).clone(),
                ranges: separators.get(kind).to_vec(),
            })
            .collect();
        Self {
            uri: doc.uri().to_string(),
            layers,
        }
    }

    /// An empty set for `uri`, clearing whatever the host drew before.
    pub fn cleared(uri: impl Into<String>, styles: &DecorationStyles) -> Self {
        let layers = SectionKind::ALL
            .into_iter()
            .map(|kind| DecorationLayer {
                kind,
                style: styles.get(kind).clone(),
                ranges: Vec::new(),
            })
            .collect();
        Self {
            uri: uri.into(),
            layers,
        }
    }

    pub fn layer(&self, kind: SectionKind) -> Option<&DecorationLayer> {
        self.layers.iter().find(|layer| layer.kind == kind)
    }
}
