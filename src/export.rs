//! Contact serializers: CSV, vCard 3.0 and JSON

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::contact::Contact;
use crate::error::{ContactError, Result};

/// Byte order mark so spreadsheet apps read non-Latin names as UTF-8
pub const UTF8_BOM: char = '\u{feff}';

const CSV_HEADER: [&str; 4] = ["Name", "Phone", "Email", "Address"];

/// Fallback file stem when the upload had no usable name
const DEFAULT_STEM: &str = "contacts";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    #[serde(alias = "vcf")]
    VCard,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::VCard => "vcf",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::VCard => "text/vcard",
            ExportFormat::Json => "application/json",
        }
    }

    /// Serialize contacts in this format
    pub fn render(self, contacts: &[Contact]) -> Result<String> {
        match self {
            ExportFormat::Csv => to_csv(contacts),
            ExportFormat::VCard => Ok(to_vcard(contacts)),
            ExportFormat::Json => to_json(contacts),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "vcard" | "vcf" => Ok(ExportFormat::VCard),
            "json" => Ok(ExportFormat::Json),
            other => Err(ContactError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Csv => "csv",
            ExportFormat::VCard => "vcard",
            ExportFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// CSV with a BOM, a header row and every data field quoted
///
/// Lines are joined with `\n`; the last line has no terminator.
pub fn to_csv(contacts: &[Contact]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for contact in contacts {
        writer.write_record([
            contact.name.as_str(),
            contact.phone.as_str(),
            contact.email.as_str(),
            contact.address.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ContactError::Io(e.into_error()))?;
    let body = String::from_utf8(bytes)
        .map_err(|e| ContactError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

    let mut csv = format!("{}{}", UTF8_BOM, CSV_HEADER.join(","));
    if let Some(rows) = body.strip_suffix('\n') {
        csv.push('\n');
        csv.push_str(rows);
    }

    Ok(csv)
}

/// vCard 3.0 blocks separated by blank lines
pub fn to_vcard(contacts: &[Contact]) -> String {
    contacts
        .iter()
        .map(vcard_block)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn vcard_block(contact: &Contact) -> String {
    let structured_name: Vec<&str> = contact.name.split(' ').rev().collect();

    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{}", contact.name),
        format!("N:{}", structured_name.join(";")),
    ];

    if !contact.phone.is_empty() {
        lines.push(format!("TEL;TYPE=VOICE:{}", contact.phone));
    }
    if !contact.email.is_empty() {
        lines.push(format!("EMAIL;TYPE=INTERNET:{}", contact.email));
    }
    if !contact.address.is_empty() {
        lines.push(format!("ADR;TYPE=HOME:;;{};;", contact.address));
    }
    lines.push("END:VCARD".to_string());

    lines.join("\n")
}

/// Pretty-printed JSON array
pub fn to_json(contacts: &[Contact]) -> Result<String> {
    Ok(serde_json::to_string_pretty(contacts)?)
}

/// `<stem>_<YYYY-MM-DD>.<ext>`, with `contacts` standing in for an empty stem
pub fn export_file_name(stem: &str, format: ExportFormat, date: NaiveDate) -> String {
    let stem = match stem.trim() {
        "" => DEFAULT_STEM,
        s => s,
    };
    format!("{}_{}.{}", stem, date.format("%Y-%m-%d"), format.extension())
}

/// Upload name with its first `.html` removed
pub fn file_stem(file_name: &str) -> String {
    file_name.replacen(".html", "", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Contact> {
        vec![
            Contact::new("Asha Verma", "+911234567890", "asha@example.com", "12 MG Road"),
            Contact::new("Jon", "", "", ""),
        ]
    }

    #[test]
    fn test_csv_escapes_quotes_and_has_bom() {
        let contacts = vec![Contact::new(r#"Ravi "RK" Kumar"#, "", "", "")];

        let csv = to_csv(&contacts).unwrap();
        assert!(csv.starts_with(UTF8_BOM));
        assert!(csv.contains(r#""Ravi ""RK"" Kumar""#));
        assert_eq!(
            csv,
            "\u{feff}Name,Phone,Email,Address\n\"Ravi \"\"RK\"\" Kumar\",\"\",\"\",\"\""
        );
    }

    #[test]
    fn test_csv_keeps_unicode() {
        let contacts = vec![Contact::new("राहुल शर्मा", "98765", "", "दिल्ली, भारत")];

        let csv = to_csv(&contacts).unwrap();
        assert!(csv.contains("\"राहुल शर्मा\",\"98765\",\"\",\"दिल्ली, भारत\""));
    }

    #[test]
    fn test_csv_rows_joined_without_trailing_newline() {
        let contacts = vec![
            Contact::new("A", "1", "", ""),
            Contact::new("B", "2", "b@example.com", ""),
        ];

        assert_eq!(
            to_csv(&contacts).unwrap(),
            "\u{feff}Name,Phone,Email,Address\n\"A\",\"1\",\"\",\"\"\n\"B\",\"2\",\"b@example.com\",\"\""
        );
    }

    #[test]
    fn test_empty_csv_is_header_only() {
        assert_eq!(to_csv(&[]).unwrap(), "\u{feff}Name,Phone,Email,Address");
    }

    #[test]
    fn test_vcard_blocks() {
        let vcard = to_vcard(&sample());
        assert_eq!(
            vcard,
            "BEGIN:VCARD\nVERSION:3.0\nFN:Asha Verma\nN:Verma;Asha\n\
             TEL;TYPE=VOICE:+911234567890\nEMAIL;TYPE=INTERNET:asha@example.com\n\
             ADR;TYPE=HOME:;;12 MG Road;;\nEND:VCARD\n\n\
             BEGIN:VCARD\nVERSION:3.0\nFN:Jon\nN:Jon\nEND:VCARD"
        );
    }

    #[test]
    fn test_vcard_reads_back() {
        let vcard = to_vcard(&sample());
        let parsed = crate::extractors::extract_vcards(&vcard);
        // N comes after FN, so the reversed structured name wins
        assert_eq!(parsed[0].name, "Verma;Asha");
        assert_eq!(parsed[0].phone, "+911234567890");
        assert_eq!(parsed[1].name, "Jon");
    }

    #[test]
    fn test_json_is_pretty_array() {
        let json = to_json(&sample()[1..]).unwrap();
        assert_eq!(
            json,
            "[\n  {\n    \"name\": \"Jon\",\n    \"phone\": \"\",\n    \"email\": \"\",\n    \"address\": \"\"\n  }\n]"
        );
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("vcf".parse::<ExportFormat>().unwrap(), ExportFormat::VCard);
        assert_eq!("vcard".parse::<ExportFormat>().unwrap(), ExportFormat::VCard);
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(ContactError::UnknownFormat(f)) if f == "xml"
        ));
        assert_eq!(ExportFormat::VCard.extension(), "vcf");
        assert_eq!(ExportFormat::Json.mime_type(), "application/json");
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            export_file_name(&file_stem("synced_contacts.html"), ExportFormat::VCard, date),
            "synced_contacts_2024-03-09.vcf"
        );
        assert_eq!(export_file_name("", ExportFormat::Csv, date), "contacts_2024-03-09.csv");
    }
}
