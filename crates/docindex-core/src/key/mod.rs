//! Module: key
//! Responsibility: primary-key and secondary-index-key layout plus canonical
//! value encoding.
//! Does not own: validation of identities (see `document`) or scanning.
//! Boundary: used by the write path and the query engine as key authority.
//!
//! Layout:
//!
//! ```text
//! primary key  = typePrefix + id
//! index key    = ":" + typePrefix + field + ":" + canonicalValue + ":" + id
//! typePrefix   = ":" + typeName + ":"   (empty when untyped)
//! ```
//!
//! With `:`-free ids, type names and field names the four key shapes are
//! disjoint: untyped primary keys contain no `:`, typed primary keys exactly
//! two, typed index keys start with `::`, and untyped index keys start with a
//! single `:` and contain at least three.

mod ordered;


pub use ordered::{ValueEncodeError, canonicalize};

/// Separator between key segments.
pub const DELIMITER: char = ':';

/// Namespace prefix for a type; empty when untyped.
#[must_use]
pub fn type_prefix(type_name: Option<&str>) -> String {
    match type_name {
        Some(name) if !name.is_empty() => format!("{DELIMITER}{name}{DELIMITER}"),
        _ => String::new(),
    }
}

/// Store key of a document.
#[must_use]
pub fn primary_key(type_name: Option<&str>, id: &str) -> String {
    let mut key = type_prefix(type_name);
    key.push_str(id);

    key
}

/// Store key of one secondary index entry.
///
/// An empty `id` yields the scan prefix shared by every entry of
/// `(type_name, field, canonical_value)`.
#[must_use]
pub fn index_key(type_name: Option<&str>, field: &str, canonical_value: &str, id: &str) -> String {
    let prefix = type_prefix(type_name);
    let mut key = String::with_capacity(
        prefix.len() + field.len() + canonical_value.len() + id.len() + 3,
    );

    key.push(DELIMITER);
    key.push_str(&prefix);
    key.push_str(field);
    key.push(DELIMITER);
    key.push_str(canonical_value);
    key.push(DELIMITER);
    key.push_str(id);

    key
}

/// Scan prefix for all index entries of `(type_name, field, canonical_value)`.
#[must_use]
pub fn index_prefix(type_name: Option<&str>, field: &str, canonical_value: &str) -> String {
    index_key(type_name, field, canonical_value, "")
}

/// Extract the document id from a scanned index key.
///
/// Returns `None` when the key does not extend `prefix` with a well-formed id.
/// That happens for entries of a longer value sharing the prefix: scanning
/// `"a"` also visits keys for `"a:b"`, whose suffix still contains `:`.
#[must_use]
pub fn id_from_index_key<'a>(prefix: &str, key: &'a str) -> Option<&'a str> {
    key.strip_prefix(prefix)
        .filter(|id| !id.is_empty() && !id.contains(DELIMITER))
}

/// Split a primary key into its type name and id.
///
/// Untyped keys carry no delimiter; typed keys are `:type:id`.
#[must_use]
pub fn split_primary_key(key: &str) -> (Option<&str>, &str) {
    key.strip_prefix(DELIMITER)
        .and_then(|rest| rest.split_once(DELIMITER))
        .map_or((None, key), |(type_name, id)| (Some(type_name), id))
}
