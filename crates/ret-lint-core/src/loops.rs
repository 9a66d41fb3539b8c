//! Loop scope extraction.
//!
//! `{{#for item in items}} ... {{/for}}` declares `item` for the extent of
//! the block. Blocks are matched non-greedily over the whole document, so the
//! first `{{/for}}` closes the nearest open `{{#for}}`; nested loops of the
//! same form are not told apart.

use once_cell::sync::Lazy;
use regex::Regex;
use ret_source_map::Span;

use crate::expressions::UsedOccurrence;

static FOR_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\{\{#for\s+([a-zA-Z_][a-zA-Z0-9_]*)\s+in\s+([a-zA-Z_][a-zA-Z0-9_]*)\}\}",
        r"(?s:.*?)",
        r"\{\{/for\}\}",
    ))
    .expect("valid loop block pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopScope {
    /// The name bound by the loop.
    pub iterator: String,
    /// The variable being iterated.
    pub collection: String,
    /// Where the iterator name appears in the opening tag.
    pub declaration: Span,
    /// The whole block, from `{{#for` through `{{/for}}`.
    pub body: Span,
}

impl LoopScope {
    /// Whether this loop declares the variable `occurrence` refers to.
    pub fn declares(&self, occurrence: &UsedOccurrence) -> bool {
        self.iterator == occurrence.name && self.body.contains(&occurrence.span)
    }
}

/// Find every loop block in `text`.
pub fn extract_loop_scopes(text: &str) -> Vec<LoopScope> {
    FOR_BLOCK
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let iterator = caps.get(1)?;
            let collection = caps.get(2)?;
            Some(LoopScope {
                iterator: iterator.as_str().to_string(),
                collection: collection.as_str().to_string(),
                declaration: Span::new(iterator.start(), iterator.end()),
                body: Span::new(whole.start(), whole.end()),
            })
        })
        .collect()
}
