//! Plain table extraction
//!
//! Any row with two or more cells is read positionally as
//! name, phone, email, address.

use scraper::{Html, Selector};

use super::element_text;
use crate::contact::Contact;

/// Extract one contact per table row
pub fn extract_table_rows(document: &Html) -> Vec<Contact> {
    let (table_sel, row_sel, cell_sel) = match (
        Selector::parse("table"),
        Selector::parse("tr"),
        Selector::parse("td, th"),
    ) {
        (Ok(t), Ok(r), Ok(c)) => (t, r, c),
        _ => return vec![],
    };

    let mut contacts = Vec::new();

    for table in document.select(&table_sel) {
        for row in table.select(&row_sel) {
            let cells: Vec<String> = row.select(&cell_sel).map(|c| element_text(&c)).collect();
            if cells.len() < 2 {
                continue;
            }

            let column = |i: usize| cells.get(i).map(String::as_str).unwrap_or_default();
            let contact = Contact::new(column(0), column(1), column(2), column(3));

            if !contact.name.is_empty() {
                contacts.push(contact);
            }
        }
    }

    contacts
}
