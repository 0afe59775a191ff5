//! Embedded vCard extraction
//!
//! Finds `BEGIN:VCARD … END:VCARD` blocks anywhere in the raw input and
//! reads the name, phone, email and address properties out of each one.

use regex::Regex;
use std::sync::OnceLock;

use crate::contact::Contact;

fn block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)BEGIN:VCARD.*?END:VCARD").expect("vCard block pattern is static"))
}

/// Extract every embedded vCard block from raw text
pub fn extract_vcards(text: &str) -> Vec<Contact> {
    block_regex()
        .find_iter(text)
        .map(|m| parse_vcard(m.as_str()))
        .collect()
}

/// Parse a single vCard block
///
/// Malformed lines are skipped; a block never fails as a whole.
pub fn parse_vcard(block: &str) -> Contact {
    let mut contact = Contact::default();

    for line in block.split('\n') {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        if key.is_empty() || value.is_empty() {
            continue;
        }

        let key_type = key.split(';').next().unwrap_or(key);
        let value = value.trim().to_string();

        match key_type {
            "FN" | "N" => contact.name = value,
            "TEL" => contact.phone = value,
            "EMAIL" => contact.email = value,
            "ADR" => contact.address = value,
            _ => {}
        }
    }

    contact
}
