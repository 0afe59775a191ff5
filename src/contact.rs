//! Contact records and the types used during duplicate resolution

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single recovered contact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    /// Position in the canonical list, only set on members of a [`DuplicateGroup`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_index: Option<usize>,
}

impl Contact {
    /// Build a contact, trimming every field
    pub fn new(
        name: impl AsRef<str>,
        phone: impl AsRef<str>,
        email: impl AsRef<str>,
        address: impl AsRef<str>,
    ) -> Self {
        Self {
            name: normalize_field(Some(name.as_ref())),
            phone: normalize_field(Some(phone.as_ref())),
            email: normalize_field(Some(email.as_ref())),
            address: normalize_field(Some(address.as_ref())),
            original_index: None,
        }
    }

    /// Identity used for deduplication: lowercase name plus exact phone
    pub fn identity(&self) -> (String, String) {
        (self.name.to_lowercase(), self.phone.clone())
    }

    /// Trimmed phone, the key duplicate groups are built on
    pub fn phone_key(&self) -> &str {
        self.phone.trim()
    }
}

/// Trim a field, defaulting missing values to the empty string
pub fn normalize_field(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// Contacts sharing one non-empty phone value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub phone: String,
    /// Always two or more members, in first-seen order
    pub contacts: Vec<Contact>,
}

impl DuplicateGroup {
    /// Distinct member names in group order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.contacts.len());
        for contact in &self.contacts {
            if !names.contains(&contact.name.as_str()) {
                names.push(&contact.name);
            }
        }
        names
    }
}

/// Chosen name per duplicate phone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MergeSelections(BTreeMap<String, String>);

impl MergeSelections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection for `phone`
    pub fn select(&mut self, phone: impl Into<String>, name: impl Into<String>) {
        self.0.insert(phone.into(), name.into());
    }

    pub fn get(&self, phone: &str) -> Option<&str> {
        self.0.get(phone).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MergeSelections {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
