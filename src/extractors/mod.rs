//! HTML contact extraction
//!
//! Each module recovers contacts from one input shape. The coordinator in this
//! module prefers the label/value table layout and falls back to the union of
//! the remaining strategies.

mod attribute_extractor;
mod structured_extractor;
mod table_extractor;
mod text_extractor;
mod vcard_extractor;

pub use attribute_extractor::*;
pub use structured_extractor::*;
pub use table_extractor::*;
pub use text_extractor::*;
pub use vcard_extractor::*;

use scraper::{ElementRef, Html};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::contact::Contact;

/// Input handed to every fallback strategy
pub struct Source<'a> {
    pub raw: &'a str,
    pub document: &'a Html,
}

/// A named fallback strategy
pub type Strategy = (&'static str, fn(&Source) -> Vec<Contact>);

/// Fallback strategies, in the order their results are concatenated
pub const FALLBACK_STRATEGIES: &[Strategy] = &[
    ("vcard", vcard_strategy),
    ("table", table_strategy),
    ("tagged", tagged_strategy),
    ("text", text_strategy),
];

fn vcard_strategy(src: &Source) -> Vec<Contact> {
    extract_vcards(src.raw)
}

fn table_strategy(src: &Source) -> Vec<Contact> {
    extract_table_rows(src.document)
}

fn tagged_strategy(src: &Source) -> Vec<Contact> {
    extract_tagged(src.document)
}

fn text_strategy(src: &Source) -> Vec<Contact> {
    extract_text(src.document)
}

/// Extract the deduplicated contact list from an HTML export
///
/// Never fails: input with nothing recognizable yields an empty list.
pub fn parse_contacts(html: &str) -> Vec<Contact> {
    let document = Html::parse_document(html);

    let structured = extract_structured(&document);
    debug!(count = structured.len(), "structured extraction");

    let source = Source {
        raw: html,
        document: &document,
    };
    let fallback: Vec<Vec<Contact>> = FALLBACK_STRATEGIES
        .iter()
        .map(|(name, strategy)| {
            let found = strategy(&source);
            debug!(strategy = *name, count = found.len(), "fallback extraction");
            found
        })
        .collect();

    let candidates = select_candidates(structured, fallback);
    let contacts = dedup_contacts(candidates);

    info!(contacts = contacts.len(), "parsed contacts");
    contacts
}

/// Structured output wins when non-empty, otherwise the fallbacks are concatenated
pub fn select_candidates(structured: Vec<Contact>, fallback: Vec<Vec<Contact>>) -> Vec<Contact> {
    if !structured.is_empty() {
        return structured;
    }
    fallback.into_iter().flatten().collect()
}

/// Keep the first contact per (lowercase name, phone) and drop nameless ones
pub fn dedup_contacts(contacts: Vec<Contact>) -> Vec<Contact> {
    let mut seen = HashSet::new();

    contacts
        .into_iter()
        .filter(|contact| seen.insert(contact.identity()))
        .filter(|contact| !contact.name.is_empty())
        .collect()
}

/// Trimmed text content of an element
pub(crate) fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
