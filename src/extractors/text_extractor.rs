//! Line-based fallback extraction
//!
//! Renders the document body to plain text and reads it one line at a time:
//! phone-shaped and email-shaped lines attach to the open contact, anything
//! else short enough starts a new one.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

use crate::contact::Contact;

/// Lines this long or longer are never names
const MAX_NAME_LEN: usize = 100;
/// Phone-shaped lines must be longer than this
const MIN_PHONE_LEN: usize = 5;

const SKIPPED_TAGS: &[&str] = &["script", "style", "head", "noscript", "template"];

/// Tags whose text keeps its line breaks and spacing
const PREFORMATTED_TAGS: &[&str] = &["pre", "textarea", "listing"];

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table",
    "tbody", "thead", "tfoot", "tr", "ul", "caption",
];

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[0-9\s\-()]+$").expect("phone pattern is static"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is static"))
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Phone(&'a str),
    Email(&'a str),
    Name(&'a str),
    Other,
}

impl<'a> Line<'a> {
    fn classify(line: &'a str) -> Self {
        if phone_regex().is_match(line) && line.chars().count() > MIN_PHONE_LEN {
            Line::Phone(line)
        } else if email_regex().is_match(line) {
            Line::Email(line)
        } else if line.chars().count() < MAX_NAME_LEN {
            Line::Name(line)
        } else {
            Line::Other
        }
    }
}

/// Extract contacts from the rendered text of a document
pub fn extract_text(document: &Html) -> Vec<Contact> {
    extract_from_lines(&rendered_text(document))
}

/// Extract contacts from already rendered plain text
pub fn extract_from_lines(text: &str) -> Vec<Contact> {
    let mut contacts = Vec::new();
    let mut current: Option<Contact> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match Line::classify(line) {
            Line::Phone(phone) => {
                if let Some(contact) = current.as_mut() {
                    contact.phone = phone.to_string();
                }
            }
            Line::Email(email) => {
                if let Some(contact) = current.as_mut() {
                    contact.email = email.to_string();
                }
            }
            Line::Name(name) => {
                if let Some(done) = current.take().filter(|c| !c.name.is_empty()) {
                    contacts.push(done);
                }
                current = Some(Contact::new(name, "", "", ""));
            }
            Line::Other => {}
        }
    }

    if let Some(done) = current.filter(|c| !c.name.is_empty()) {
        contacts.push(done);
    }

    contacts
}

/// Render the body of a document roughly the way a browser's `innerText` does
pub fn rendered_text(document: &Html) -> String {
    let root = Selector::parse("body")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .unwrap_or_else(|| document.root_element());

    let mut out = String::new();
    render_element(root, &mut out, false);
    out
}

fn render_element(element: ElementRef, out: &mut String, preformatted: bool) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            if preformatted {
                out.push_str(text);
            } else {
                push_collapsed(out, text);
            }
        } else if let Some(el) = ElementRef::wrap(child) {
            let tag = el.value().name();
            if SKIPPED_TAGS.contains(&tag) {
                continue;
            }
            if tag == "br" {
                out.push('\n');
                continue;
            }

            let block = BLOCK_TAGS.contains(&tag);
            if block {
                out.push('\n');
            }
            render_element(el, out, preformatted || PREFORMATTED_TAGS.contains(&tag));
            if block {
                out.push('\n');
            } else if tag == "td" || tag == "th" {
                out.push('\t');
            }
        }
    }
}

/// Append text with whitespace runs collapsed to one space
fn push_collapsed(out: &mut String, text: &str) {
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !out.ends_with(|c: char| c.is_whitespace()) && !out.is_empty() {
                out.push(' ');
            }
        } else {
            out.push(ch);
        }
    }
}
