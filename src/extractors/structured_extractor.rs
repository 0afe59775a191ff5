//! Label-cell / value-cell table extraction
//!
//! Handles the layout used by Instagram/Facebook `synced_contacts.html`
//! exports, where each row's first cell holds a label such as "First Name"
//! followed by the value nested in `<div><div>…</div></div>`.

use scraper::{ElementRef, Html, Selector};

use super::element_text;
use crate::contact::Contact;

/// Field a label cell assigns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    FirstName,
    LastName,
    Phone,
    Email,
    Address,
}

impl Label {
    /// First matching label wins
    fn classify(cell_text: &str) -> Option<Self> {
        if cell_text.contains("First Name") {
            Some(Label::FirstName)
        } else if cell_text.contains("Last Name") {
            Some(Label::LastName)
        } else if cell_text.contains("Contact Information") || cell_text.contains("Phone") {
            Some(Label::Phone)
        } else if cell_text.contains("Email") {
            Some(Label::Email)
        } else if cell_text.contains("Address") {
            Some(Label::Address)
        } else {
            None
        }
    }

    fn closes_contact(self) -> bool {
        matches!(self, Label::Phone | Label::Email | Label::Address)
    }
}

/// One table row reduced to what the fold needs
#[derive(Debug)]
struct LabeledRow {
    label: Option<Label>,
    value: String,
    last_in_table: bool,
}

/// Contact being assembled across rows
#[derive(Debug, Default)]
struct Partial {
    first_name: String,
    last_name: String,
    phone: String,
    email: String,
    address: String,
}

impl Partial {
    fn assign(&mut self, label: Label, value: String) {
        match label {
            Label::FirstName => self.first_name = value,
            Label::LastName => self.last_name = value,
            Label::Phone => self.phone = value,
            Label::Email => self.email = value,
            Label::Address => self.address = value,
        }
    }

    fn has_identity(&self) -> bool {
        !self.first_name.is_empty() || !self.last_name.is_empty() || !self.phone.is_empty()
    }

    fn finish(self) -> Contact {
        let name = format!("{} {}", self.first_name, self.last_name);
        Contact::new(name, self.phone, self.email, self.address)
    }
}

/// Extract contacts from label/value tables
pub fn extract_structured(document: &Html) -> Vec<Contact> {
    let rows = labeled_rows(document);

    let (_, contacts) = rows.into_iter().fold(
        (Partial::default(), Vec::new()),
        |(mut partial, mut contacts), row| {
            if let Some(label) = row.label {
                partial.assign(label, row.value);
            }

            let closes = row.label.is_some_and(Label::closes_contact) || row.last_in_table;
            if closes && partial.has_identity() {
                contacts.push(std::mem::take(&mut partial).finish());
            }

            (partial, contacts)
        },
    );

    contacts
}

fn labeled_rows(document: &Html) -> Vec<LabeledRow> {
    let (table_sel, row_sel, cell_sel, value_sel) = match (
        Selector::parse("table"),
        Selector::parse("tr"),
        Selector::parse("td"),
        Selector::parse("div div"),
    ) {
        (Ok(t), Ok(r), Ok(c), Ok(v)) => (t, r, c, v),
        _ => return vec![],
    };

    let mut labeled = Vec::new();

    for table in document.select(&table_sel) {
        let rows: Vec<ElementRef> = table.select(&row_sel).collect();
        let last = rows.len().saturating_sub(1);

        for (i, row) in rows.into_iter().enumerate() {
            // Rows without a data cell carry nothing
            let Some(cell) = row.select(&cell_sel).next() else {
                continue;
            };

            let cell_text = cell.text().collect::<String>();
            let value = cell
                .select(&value_sel)
                .next()
                .map(|el| element_text(&el))
                .unwrap_or_default();

            labeled.push(LabeledRow {
                label: Label::classify(&cell_text),
                value,
                last_in_table: i == last,
            });
        }
    }

    labeled
}
