//! Contact Restorer
//!
//! Recovers contacts from exported HTML (Instagram/Facebook
//! `synced_contacts.html` and looser shapes):
//! - Label/value tables (primary)
//! - Embedded vCard blocks
//! - Plain tables
//! - Class/attribute tagged markup
//! - Free text lines
//!
//! Contacts sharing a phone number are grouped so one name per phone can be
//! kept, and the result exports to CSV, vCard or JSON.

pub mod contact;
pub mod duplicates;
pub mod error;
pub mod export;
pub mod extractors;
pub mod ffi;
pub mod session;
pub mod settings;

pub use contact::{Contact, DuplicateGroup, MergeSelections};
pub use duplicates::{find_duplicates, initialize_merge_selections, merge_contacts};
pub use error::{ContactError, Result};
pub use export::{export_file_name, to_csv, to_json, to_vcard, ExportFormat};
pub use extractors::parse_contacts;
pub use session::{ExportFile, Session, SessionState};
pub use settings::Settings;
