use derive_more::Display;
use docindex_core::{
    config::ConfigError,
    db::QueryError,
    document::DocumentError,
    error::{ErrorClass, ErrorDetail, ErrorOrigin as CoreErrorOrigin, InternalError},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        let kind = ErrorKind::from(&err);

        Self::new(kind, err.origin.into(), err.message)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        InternalError::from(err).into()
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// The document identity or a field name is invalid.
    Document(DocumentErrorKind),

    /// A field value cannot be encoded into an index key.
    InvalidValue,

    Query(QueryErrorKind),
    Store(StoreErrorKind),

    /// Engine limits are invalid or could not be parsed.
    Config,

    /// Stored bytes are inconsistent with what the engine wrote.
    Corruption,

    /// The caller cannot remediate this.
    Internal,
}

impl From<&InternalError> for ErrorKind {
    fn from(err: &InternalError) -> Self {
        match &err.detail {
            Some(ErrorDetail::Document(detail)) => return Self::Document(detail.into()),
            Some(ErrorDetail::Value(_)) => return Self::InvalidValue,
            Some(ErrorDetail::Query(detail)) => return Self::Query(detail.into()),
            Some(ErrorDetail::Store(_)) | None => {}
        }

        match (err.class, err.origin) {
            (ErrorClass::Corruption, _) => Self::Corruption,
            (ErrorClass::Unavailable, _) => Self::Store(StoreErrorKind::Unavailable),
            (ErrorClass::Unsupported, CoreErrorOrigin::Store) => {
                Self::Store(StoreErrorKind::RowTooLarge)
            }
            (ErrorClass::Unsupported, CoreErrorOrigin::Config) => Self::Config,
            _ => Self::Internal,
        }
    }
}

///
/// DocumentErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum DocumentErrorKind {
    MissingId,
    InvalidId,
    InvalidTypeName,
    InvalidFieldName,
}

impl From<&DocumentError> for DocumentErrorKind {
    fn from(err: &DocumentError) -> Self {
        match err {
            DocumentError::MissingId => Self::MissingId,
            DocumentError::InvalidId { .. } => Self::InvalidId,
            DocumentError::InvalidTypeName { .. } => Self::InvalidTypeName,
            DocumentError::InvalidFieldName { .. } => Self::InvalidFieldName,
        }
    }
}

///
/// QueryErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum QueryErrorKind {
    /// Filter names a reserved or metadata field.
    UnindexedField,
}

impl From<&QueryError> for QueryErrorKind {
    fn from(err: &QueryError) -> Self {
        match err {
            QueryError::UnindexedField { .. } => Self::UnindexedField,
        }
    }
}

///
/// StoreErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum StoreErrorKind {
    /// Encoded document exceeds the row size limit.
    RowTooLarge,

    /// The backing store reported a failure.
    Unavailable,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Config,
    Document,
    Index,
    Query,
    Serialize,
    Store,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Config => Self::Config,
            CoreErrorOrigin::Document => Self::Document,
            CoreErrorOrigin::Index => Self::Index,
            CoreErrorOrigin::Query => Self::Query,
            CoreErrorOrigin::Serialize => Self::Serialize,
            CoreErrorOrigin::Store => Self::Store,
        }
    }
}
