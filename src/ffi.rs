//! FFI interface for C/C++ hosts
//!
//! Provides C-compatible functions over the contact pipeline.
//! Structured values cross the boundary as JSON.

use serde::{Deserialize, Serialize};
use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::contact::{Contact, DuplicateGroup, MergeSelections};
use crate::duplicates::{find_duplicates, initialize_merge_selections, merge_contacts};
use crate::export::ExportFormat;
use crate::extractors::parse_contacts;

/// Result struct returned to the host
/// Both pointers are owned by Rust and must be freed via free_contacts_result
#[repr(C)]
pub struct ContactsResultFFI {
    /// Payload (null-terminated): JSON, or export text for contacts_export
    pub data_ptr: *mut c_char,
    /// Error message if the call failed (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

/// Everything a host needs after an upload
#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub contacts: Vec<Contact>,
    pub duplicates: Vec<DuplicateGroup>,
    pub selections: MergeSelections,
}

/// Input for contacts_merge
#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub duplicates: Option<Vec<DuplicateGroup>>,
    pub selections: MergeSelections,
}

/// Parse contacts out of an HTML export.
///
/// Returns `{contacts, duplicates, selections}` with selections seeded to
/// the first name of every duplicate group.
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - Caller must free the result via `free_contacts_result`
#[no_mangle]
pub unsafe extern "C" fn contacts_parse_html(
    html_ptr: *const c_char,
    html_len: usize,
) -> ContactsResultFFI {
    let html = match read_html(html_ptr, html_len) {
        Ok(h) => h,
        Err(msg) => return make_error_result(msg),
    };

    let contacts = parse_contacts(html);
    let duplicates = find_duplicates(&contacts);
    let selections = initialize_merge_selections(&duplicates);

    json_result(&ParseResponse {
        contacts,
        duplicates,
        selections,
    })
}

/// Apply merge selections.
///
/// `request_json` is a `MergeRequest`; when `duplicates` is omitted they are
/// recomputed from `contacts`. Returns the merged contact array.
///
/// # Safety
/// - `request_json` must be a valid null-terminated C string
/// - Caller must free the result via `free_contacts_result`
#[no_mangle]
pub unsafe extern "C" fn contacts_merge(request_json: *const c_char) -> ContactsResultFFI {
    let request_str = match read_c_str(request_json, "Request JSON") {
        Ok(s) => s,
        Err(msg) => return make_error_result(&msg),
    };

    let request: MergeRequest = match serde_json::from_str(request_str) {
        Ok(r) => r,
        Err(e) => {
            return make_error_result(&format!("Failed to parse request JSON: {}", e));
        }
    };

    let duplicates = request
        .duplicates
        .unwrap_or_else(|| find_duplicates(&request.contacts));
    let merged = merge_contacts(&request.contacts, &duplicates, &request.selections);

    json_result(&merged)
}

/// Serialize a JSON contact array as csv, vcard or json.
///
/// # Safety
/// - `contacts_json` and `format` must be valid null-terminated C strings
/// - Caller must free the result via `free_contacts_result`
#[no_mangle]
pub unsafe extern "C" fn contacts_export(
    contacts_json: *const c_char,
    format: *const c_char,
) -> ContactsResultFFI {
    let contacts_str = match read_c_str(contacts_json, "Contacts JSON") {
        Ok(s) => s,
        Err(msg) => return make_error_result(&msg),
    };
    let format_str = match read_c_str(format, "Format") {
        Ok(s) => s,
        Err(msg) => return make_error_result(&msg),
    };

    let format: ExportFormat = match format_str.parse() {
        Ok(f) => f,
        Err(e) => return make_error_result(&e.to_string()),
    };
    let contacts: Vec<Contact> = match serde_json::from_str(contacts_str) {
        Ok(c) => c,
        Err(e) => {
            return make_error_result(&format!("Failed to parse contacts JSON: {}", e));
        }
    };

    match format.render(&contacts) {
        Ok(text) => text_result(text),
        Err(e) => make_error_result(&e.to_string()),
    }
}

/// Free a ContactsResultFFI returned by any contacts_* function
///
/// # Safety
/// - `result` must have been returned by this library
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn free_contacts_result(result: ContactsResultFFI) {
    if !result.data_ptr.is_null() {
        drop(CString::from_raw(result.data_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

// Borrow HTML bytes as UTF-8; null or empty input is an empty document
unsafe fn read_html<'a>(html_ptr: *const c_char, html_len: usize) -> Result<&'a str, &'static str> {
    if html_ptr.is_null() || html_len == 0 {
        return Ok("");
    }
    let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
    std::str::from_utf8(slice).map_err(|_| "Invalid UTF-8 in HTML content")
}

unsafe fn read_c_str<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, String> {
    if ptr.is_null() {
        return Err(format!("{} is null", what));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| format!("Invalid UTF-8 in {}", what))
}

fn json_result<T: Serialize>(value: &T) -> ContactsResultFFI {
    match serde_json::to_string(value) {
        Ok(json) => text_result(json),
        Err(e) => make_error_result(&format!("Failed to serialize result: {}", e)),
    }
}

fn text_result(text: String) -> ContactsResultFFI {
    match CString::new(text) {
        Ok(cstr) => ContactsResultFFI {
            data_ptr: cstr.into_raw(),
            error_ptr: ptr::null_mut(),
        },
        Err(_) => make_error_result("Result contains null bytes"),
    }
}

// Helper to create error result
fn make_error_result(msg: &str) -> ContactsResultFFI {
    let error_cstr = CString::new(msg.replace('\0', " ")).unwrap_or_default();
    ContactsResultFFI {
        data_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}
