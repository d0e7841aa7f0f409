//! Module: document
//! Responsibility: the flat document model, reserved-field rules and identity
//! validation.
//! Does not own: key layout (see `key`) or persistence (see `db`).


use crate::{key::DELIMITER, value::Value};
use derive_more::{Deref, DerefMut};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

/// Reserved field holding the caller-supplied document id.
pub const ID_FIELD: &str = "id";

/// Reserved field holding the optional type namespace.
pub const TYPE_NAME_FIELD: &str = "typeName";

///
/// DocumentError
///
/// Identity and field-name validation failures raised before any store call.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum DocumentError {
    #[error("no id provided")]
    MissingId,

    #[error("id cannot contain the ':' character: {id:?}")]
    InvalidId { id: String },

    #[error("typeName must be text without the ':' character, got {type_name}")]
    InvalidTypeName { type_name: String },

    #[error("indexed field name must be non-empty and cannot contain ':', got {field:?}")]
    InvalidFieldName { field: String },
}

///
/// Document
///
/// Flat mapping from field name to scalar value.
/// `id` and `typeName` are reserved; see [`is_indexable_field`].
///

#[derive(Clone, Debug, Default, Deref, DerefMut, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document(BTreeMap<String, Value>);

impl Document {
    /// Start a document with the given id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(ID_FIELD.to_string(), Value::Text(id.into()));

        Self(fields)
    }

    /// Set the type namespace.
    #[must_use]
    pub fn with_type(self, type_name: impl Into<String>) -> Self {
        self.with(TYPE_NAME_FIELD, Value::Text(type_name.into()))
    }

    /// Set one field, replacing any previous value.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// The `id` field, when present as text.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_text)
    }

    /// The `typeName` field, when present as non-empty text.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.0
            .get(TYPE_NAME_FIELD)
            .and_then(Value::as_text)
            .filter(|name| !name.is_empty())
    }

    /// Validate and borrow the document identity.
    pub fn identity(&self) -> Result<DocumentIdentity<'_>, DocumentError> {
        let id = match self.0.get(ID_FIELD) {
            Some(Value::Text(id)) => validate_id(id)?,
            None => return Err(DocumentError::MissingId),
            Some(other) => {
                return Err(DocumentError::InvalidId {
                    id: other.to_string(),
                });
            }
        };

        let type_name = match self.0.get(TYPE_NAME_FIELD) {
            None => None,
            Some(Value::Text(name)) if name.is_empty() => None,
            Some(Value::Text(name)) => Some(validate_type_name(name)?),
            Some(other) => {
                return Err(DocumentError::InvalidTypeName {
                    type_name: other.to_string(),
                });
            }
        };

        Ok(DocumentIdentity { type_name, id })
    }

    /// Iterate index-eligible fields in field-name order.
    pub fn indexable_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0
            .iter()
            .filter(|(field, _)| is_indexable_field(field))
            .map(|(field, value)| (field.as_str(), value))
    }

    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.0
    }
}

impl From<BTreeMap<String, Value>> for Document {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Self(fields)
    }
}

///
/// DocumentIdentity
///
/// Validated `(typeName, id)` pair borrowed from a document.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DocumentIdentity<'a> {
    pub type_name: Option<&'a str>,
    pub id: &'a str,
}

/// Whether a field participates in secondary indexing.
///
/// Reserved fields and fields beginning with `_` or `:` are metadata.
#[must_use]
pub fn is_indexable_field(field: &str) -> bool {
    field != ID_FIELD
        && field != TYPE_NAME_FIELD
        && !field.starts_with('_')
        && !field.starts_with(DELIMITER)
}

/// Validate an index-eligible field name so it cannot bleed into the
/// neighbouring key segments.
pub fn validate_field_name(field: &str) -> Result<&str, DocumentError> {
    if field.is_empty() || field.contains(DELIMITER) {
        return Err(DocumentError::InvalidFieldName {
            field: field.to_string(),
        });
    }

    Ok(field)
}

/// Validate a document id: non-empty and free of the key delimiter.
pub fn validate_id(id: &str) -> Result<&str, DocumentError> {
    if id.is_empty() {
        return Err(DocumentError::MissingId);
    }
    if id.contains(DELIMITER) {
        return Err(DocumentError::InvalidId { id: id.to_string() });
    }

    Ok(id)
}

/// Validate a non-empty type name.
pub fn validate_type_name(type_name: &str) -> Result<&str, DocumentError> {
    if type_name.contains(DELIMITER) {
        return Err(DocumentError::InvalidTypeName {
            type_name: format!("{type_name:?}"),
        });
    }

    Ok(type_name)
}

/// Normalize a caller-supplied type name: empty means "no type".
#[must_use]
pub fn normalize_type_name(type_name: Option<&str>) -> Option<&str> {
    type_name.filter(|name| !name.is_empty())
}
