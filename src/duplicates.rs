//! Duplicate phone detection and merge resolution

use std::collections::HashMap;
use tracing::debug;

use crate::contact::{Contact, DuplicateGroup, MergeSelections};

/// Group contacts sharing a trimmed, non-empty phone
///
/// Groups come back in first-seen phone order and only when they have two or
/// more members. Members are copies tagged with their index in `contacts`.
pub fn find_duplicates(contacts: &[Contact]) -> Vec<DuplicateGroup> {
    let mut order: Vec<(&str, Vec<usize>)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for (index, contact) in contacts.iter().enumerate() {
        let phone = contact.phone_key();
        if phone.is_empty() {
            continue;
        }

        match slots.get(phone) {
            Some(&slot) => order[slot].1.push(index),
            None => {
                slots.insert(phone, order.len());
                order.push((phone, vec![index]));
            }
        }
    }

    let groups: Vec<DuplicateGroup> = order
        .into_iter()
        .filter(|(_, indices)| indices.len() > 1)
        .map(|(phone, indices)| DuplicateGroup {
            phone: phone.to_string(),
            contacts: indices
                .into_iter()
                .map(|i| Contact {
                    original_index: Some(i),
                    ..contacts[i].clone()
                })
                .collect(),
        })
        .collect();

    debug!(groups = groups.len(), "found duplicate phones");
    groups
}

/// Default selection: the first member's name for every group
pub fn initialize_merge_selections(groups: &[DuplicateGroup]) -> MergeSelections {
    groups
        .iter()
        .filter_map(|group| {
            group
                .contacts
                .first()
                .map(|first| (group.phone.clone(), first.name.clone()))
        })
        .collect()
}

/// Apply merge selections, returning a new list in input order
///
/// Contacts without a phone, or whose phone is in no group, are kept.
/// Grouped contacts are kept only when their name is the selected one.
pub fn merge_contacts(
    contacts: &[Contact],
    groups: &[DuplicateGroup],
    selections: &MergeSelections,
) -> Vec<Contact> {
    let merged: Vec<Contact> = contacts
        .iter()
        .filter(|contact| {
            let phone = contact.phone_key();
            if phone.is_empty() {
                return true;
            }
            if !groups.iter().any(|group| group.phone == phone) {
                return true;
            }
            selections.get(phone) == Some(contact.name.as_str())
        })
        .cloned()
        .collect();

    debug!(
        before = contacts.len(),
        after = merged.len(),
        "merged duplicate contacts"
    );
    merged
}
