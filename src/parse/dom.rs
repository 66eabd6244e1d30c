//! Small helpers over `scraper` shared by the page parsers.

use scraper::{ElementRef, Html, Selector};

use crate::error::SkoobError;

/// Parse a CSS selector or return a parse error (avoids panics from Selector::parse).
pub(crate) fn parse_selector(sel: &str) -> Result<Selector, SkoobError> {
    Selector::parse(sel).map_err(|e| SkoobError::parse(format!("invalid selector {:?}: {}", sel, e)))
}

/// Concatenated, trimmed text content of an element.
pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Attribute value as an owned string, empty when absent.
pub(crate) fn attr_of(el: ElementRef<'_>, name: &str) -> String {
    el.value().attr(name).unwrap_or_default().to_string()
}

/// Whether any element in the document matches `sel`.
pub(crate) fn has_any(doc: &Html, sel: &str) -> Result<bool, SkoobError> {
    let selector = parse_selector(sel)?;
    Ok(doc.select(&selector).next().is_some())
}

/// First element matching `sel` that appears after `anchor` in document order,
/// regardless of nesting.
pub(crate) fn element_after<'a>(
    doc: &'a Html,
    anchor: ElementRef<'a>,
    sel: &Selector,
) -> Option<ElementRef<'a>> {
    element_after_where(doc, anchor, sel, |_| true)
}

/// Like [`element_after`] but also requires `pred` to hold for the candidate.
pub(crate) fn element_after_where<'a, F>(
    doc: &'a Html,
    anchor: ElementRef<'a>,
    sel: &Selector,
    pred: F,
) -> Option<ElementRef<'a>>
where
    F: Fn(ElementRef<'a>) -> bool,
{
    let anchor_id = anchor.id();
    let mut past_anchor = false;
    for node in doc.tree.root().descendants() {
        if node.id() == anchor_id {
            past_anchor = true;
            continue;
        }
        if !past_anchor {
            continue;
        }
        if let Some(el) = ElementRef::wrap(node) {
            if sel.matches(&el) && pred(el) {
                return Some(el);
            }
        }
    }
    None
}

/// Trimmed text of the node immediately following `el`, whether it is an
/// element or a bare text node.
pub(crate) fn next_sibling_text(el: ElementRef<'_>) -> Option<String> {
    let sibling = el.next_sibling()?;
    let text = match ElementRef::wrap(sibling) {
        Some(sib_el) => text_of(sib_el),
        None => sibling.value().as_text()?.trim().to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Trimmed, non-empty text of every sibling after `el` in order.
pub(crate) fn sibling_texts(el: ElementRef<'_>) -> Vec<String> {
    let mut parts = Vec::new();
    for sibling in el.next_siblings() {
        let text = match ElementRef::wrap(sibling) {
            Some(sib_el) => text_of(sib_el),
            None => sibling
                .value()
                .as_text()
                .map(|t| t.trim().to_string())
                .unwrap_or_default(),
        };
        if !text.is_empty() {
            parts.push(text);
        }
    }
    parts
}
