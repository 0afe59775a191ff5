//! Upload → resolve → export session
//!
//! Holds the canonical contact list between uploads and drives the
//! `Idle → Parsing → Ready | Error`, `Ready → Resolving → Ready` flow.

use chrono::NaiveDate;
use std::fmt;
use tracing::{debug, info};

use crate::contact::{Contact, DuplicateGroup, MergeSelections};
use crate::duplicates::{find_duplicates, initialize_merge_selections, merge_contacts};
use crate::error::{ContactError, Result};
use crate::export::{export_file_name, file_stem, ExportFormat};
use crate::extractors::parse_contacts;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Parsing,
    Ready,
    /// Duplicate groups are waiting for a name choice
    Resolving,
    Error(String),
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => f.write_str("idle"),
            SessionState::Parsing => f.write_str("parsing"),
            SessionState::Ready => f.write_str("ready"),
            SessionState::Resolving => f.write_str("resolving"),
            SessionState::Error(msg) => write!(f, "error ({msg})"),
        }
    }
}

/// Serialized contacts ready to be written out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub content: String,
}

#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    contacts: Vec<Contact>,
    file_stem: String,
    duplicates: Vec<DuplicateGroup>,
    selections: MergeSelections,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn duplicates(&self) -> &[DuplicateGroup] {
        &self.duplicates
    }

    pub fn selections(&self) -> &MergeSelections {
        &self.selections
    }

    pub fn file_stem(&self) -> &str {
        &self.file_stem
    }

    /// Parse an uploaded file and return the number of contacts found
    ///
    /// Enters `Resolving` when duplicate phones exist, `Ready` otherwise.
    pub fn load(&mut self, file_name: &str, html: &str) -> Result<usize> {
        if self.state == SessionState::Resolving {
            return Err(self.invalid("load a file"));
        }
        if !file_name.ends_with(".html") {
            return Err(ContactError::NotHtml {
                file_name: file_name.to_string(),
            });
        }

        self.state = SessionState::Parsing;
        self.contacts.clear();
        self.duplicates.clear();
        self.selections = MergeSelections::new();
        debug!(file_name, "parsing upload");

        let contacts = parse_contacts(html);
        if contacts.is_empty() {
            let err = ContactError::NoContacts;
            self.state = SessionState::Error(err.to_string());
            return Err(err);
        }

        self.file_stem = file_stem(file_name);
        self.duplicates = find_duplicates(&contacts);
        self.contacts = contacts;
        info!(
            contacts = self.contacts.len(),
            duplicate_groups = self.duplicates.len(),
            "loaded contacts"
        );

        if self.duplicates.is_empty() {
            self.state = SessionState::Ready;
        } else {
            self.selections = initialize_merge_selections(&self.duplicates);
            self.state = SessionState::Resolving;
        }

        Ok(self.contacts.len())
    }

    /// Choose the name to keep for a duplicate phone
    pub fn select(&mut self, phone: &str, name: &str) -> Result<()> {
        if self.state != SessionState::Resolving {
            return Err(self.invalid("select a name"));
        }
        if !self.duplicates.iter().any(|group| group.phone == phone) {
            return Err(ContactError::UnknownDuplicate(phone.to_string()));
        }

        self.selections.select(phone, name);
        Ok(())
    }

    /// Apply the selections and return the merged contact count
    pub fn complete_merge(&mut self) -> Result<usize> {
        if self.state != SessionState::Resolving {
            return Err(self.invalid("complete a merge"));
        }

        self.contacts = merge_contacts(&self.contacts, &self.duplicates, &self.selections);
        self.state = SessionState::Ready;
        info!(contacts = self.contacts.len(), "merge complete");

        Ok(self.contacts.len())
    }

    /// Leave the merge step with the contact list unchanged
    pub fn abandon_merge(&mut self) -> Result<()> {
        if self.state != SessionState::Resolving {
            return Err(self.invalid("abandon a merge"));
        }

        self.state = SessionState::Ready;
        debug!("merge abandoned");
        Ok(())
    }

    /// Serialize the current contacts
    pub fn export(&self, format: ExportFormat, date: NaiveDate) -> Result<ExportFile> {
        if self.contacts.is_empty() {
            return Err(ContactError::NothingToExport);
        }
        if self.state != SessionState::Ready {
            return Err(self.invalid("export"));
        }

        Ok(ExportFile {
            file_name: export_file_name(&self.file_stem, format, date),
            mime_type: format.mime_type(),
            content: format.render(&self.contacts)?,
        })
    }

    fn invalid(&self, action: &'static str) -> ContactError {
        ContactError::InvalidState {
            action,
            state: self.state.to_string(),
        }
    }
}
