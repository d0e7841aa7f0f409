use crate::{
    document::Document,
    error::{ErrorClass, ErrorOrigin, InternalError},
    serialize::{SerializeError, deserialize_bounded, serialize},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Max serialized bytes for a single row to keep value loads bounded.
pub const MAX_ROW_BYTES: u32 = 4 * 1024 * 1024;

///
/// RawRowError
///

#[derive(Debug, ThisError)]
pub enum RawRowError {
    #[error("row exceeds max size: {len} bytes (limit {MAX_ROW_BYTES})")]
    TooLarge { len: usize },
}

impl RawRowError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        ErrorClass::Unsupported
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::Store
    }
}

impl From<RawRowError> for InternalError {
    fn from(err: RawRowError) -> Self {
        Self::new(err.class(), err.origin(), err.to_string())
    }
}

///
/// Row
///
/// What a primary key maps to: the document plus the index keys derived
/// from it at the last write. The key list lets a later write remove entries
/// for values the document no longer holds.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Row {
    pub document: Document,
    pub index_keys: Vec<String>,
}

impl Row {
    /// Decode a row read back from the store.
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self, SerializeError> {
        deserialize_bounded(bytes, MAX_ROW_BYTES as usize)
    }

    pub fn to_raw(&self) -> Result<RawRow, InternalError> {
        let bytes = serialize(self)?;

        Ok(RawRow::try_new(bytes)?)
    }
}

///
/// RawRow
///
/// Size-checked CBOR bytes of one [`Row`].
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawRow(Vec<u8>);

impl RawRow {
    pub fn try_new(bytes: Vec<u8>) -> Result<Self, RawRowError> {
        if bytes.len() > MAX_ROW_BYTES as usize {
            return Err(RawRowError::TooLarge { len: bytes.len() });
        }

        Ok(Self(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn try_decode(&self) -> Result<Row, SerializeError> {
        Row::try_from_bytes(&self.0)
    }
}
