//! Errors raised around the extraction core
//!
//! Parsing, grouping and merging never fail. These cover uploads, session
//! transitions, export and settings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("please upload an HTML file (.html), got {file_name}")]
    NotHtml { file_name: String },

    #[error("no contacts found, please verify this is a synced_contacts.html file")]
    NoContacts,

    #[error("no contacts to export")]
    NothingToExport,

    #[error("cannot {action} while session is {state}")]
    InvalidState { action: &'static str, state: String },

    #[error("phone {0} is not part of any duplicate group")]
    UnknownDuplicate(String),

    #[error("unknown export format: {0}")]
    UnknownFormat(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings error: {0}")]
    Settings(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ContactError>;
