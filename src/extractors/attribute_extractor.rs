//! Class/attribute tagged extraction
//!
//! Picks up hCard-like markup: an element tagged as a contact
//! (`class="contact-card"`, `data-contact`, `.vcard`) whose descendants are
//! tagged with the field they hold.

use scraper::{ElementRef, Html, Selector};

use super::element_text;
use crate::contact::Contact;

const CONTACT_SELECTOR: &str = r#"[class*="contact"], [data-contact], .vcard"#;

/// Descendant selectors for name, phone, email, address
struct FieldSelectors {
    name: Selector,
    phone: Selector,
    email: Selector,
    address: Selector,
}

impl FieldSelectors {
    fn new() -> Option<Self> {
        Some(Self {
            name: field_selector("name")?,
            phone: field_selector("phone")?,
            email: field_selector("email")?,
            address: field_selector("address")?,
        })
    }

    fn contact_from(&self, element: &ElementRef) -> Contact {
        let first_text = |selector: &Selector| {
            element
                .select(selector)
                .next()
                .map(|el| element_text(&el))
                .unwrap_or_default()
        };

        Contact::new(
            first_text(&self.name),
            first_text(&self.phone),
            first_text(&self.email),
            first_text(&self.address),
        )
    }
}

fn field_selector(field: &str) -> Option<Selector> {
    Selector::parse(&format!(r#"[class*="{field}"], [data-{field}]"#)).ok()
}

/// Extract contacts from elements tagged with contact classes or attributes
pub fn extract_tagged(document: &Html) -> Vec<Contact> {
    let selector = match Selector::parse(CONTACT_SELECTOR) {
        Ok(s) => s,
        Err(_) => return vec![],
    };
    let Some(fields) = FieldSelectors::new() else {
        return vec![];
    };

    document
        .select(&selector)
        .map(|element| fields.contact_from(&element))
        .filter(|contact| !contact.name.is_empty())
        .collect()
}
