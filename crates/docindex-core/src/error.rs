use crate::{
    db::QueryError, document::DocumentError, key::ValueEncodeError, serialize::SerializeError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Not a stable API; the `docindex` facade maps it into its public error.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    /// Construct an InternalError with optional origin-specific detail.
    /// Store-origin corruption and invariant classes get a default
    /// `StoreError` detail; everything else starts without one.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        let message = message.into();

        let detail = match (class, origin) {
            (ErrorClass::Corruption, ErrorOrigin::Store) => {
                Some(ErrorDetail::Store(StoreError::Corrupt {
                    message: message.clone(),
                }))
            }
            (ErrorClass::Unavailable, ErrorOrigin::Store) => {
                Some(ErrorDetail::Store(StoreError::Unavailable {
                    message: message.clone(),
                }))
            }
            _ => None,
        };

        Self {
            class,
            origin,
            message,
            detail,
        }
    }

    /// Construct a store-origin internal error.
    pub fn store_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Store, message.into())
    }

    /// Construct a store-origin unavailability error (timeouts, outages,
    /// exhausted quota). Store implementations use this for transient failures.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unavailable, ErrorOrigin::Store, message.into())
    }

    /// Construct a store-origin corruption error.
    pub fn store_corruption(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Corruption, ErrorOrigin::Store, message.into())
    }

    /// Construct an index-origin corruption error.
    pub(crate) fn index_corruption(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Corruption, ErrorOrigin::Index, message.into())
    }

    /// Construct a serialize-origin corruption error.
    pub(crate) fn serialize_corruption(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::Corruption,
            ErrorOrigin::Serialize,
            message.into(),
        )
    }

    /// Construct a serialize-origin internal error.
    pub(crate) fn serialize_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Serialize, message.into())
    }

    #[must_use]
    pub const fn is_corruption(&self) -> bool {
        matches!(self.class, ErrorClass::Corruption)
    }

    /// Borrow the document validation failure behind this error, if any.
    #[must_use]
    pub const fn document_error(&self) -> Option<&DocumentError> {
        match &self.detail {
            Some(ErrorDetail::Document(err)) => Some(err),
            _ => None,
        }
    }

    /// Borrow the value encoding failure behind this error, if any.
    #[must_use]
    pub const fn value_error(&self) -> Option<&ValueEncodeError> {
        match &self.detail {
            Some(ErrorDetail::Value(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<DocumentError> for InternalError {
    fn from(err: DocumentError) -> Self {
        Self {
            class: ErrorClass::Unsupported,
            origin: ErrorOrigin::Document,
            message: err.to_string(),
            detail: Some(ErrorDetail::Document(err)),
        }
    }
}

impl From<ValueEncodeError> for InternalError {
    fn from(err: ValueEncodeError) -> Self {
        Self {
            class: ErrorClass::Unsupported,
            origin: ErrorOrigin::Index,
            message: format!("index value is not canonically order-encodable: {err}"),
            detail: Some(ErrorDetail::Value(err)),
        }
    }
}

impl From<QueryError> for InternalError {
    fn from(err: QueryError) -> Self {
        Self {
            class: ErrorClass::Unsupported,
            origin: ErrorOrigin::Query,
            message: err.to_string(),
            detail: Some(ErrorDetail::Query(err)),
        }
    }
}

impl From<SerializeError> for InternalError {
    fn from(err: SerializeError) -> Self {
        match err {
            SerializeError::Serialize(_) => Self::serialize_internal(err.to_string()),
            SerializeError::Deserialize(_) | SerializeError::TooLarge { .. } => {
                Self::serialize_corruption(err.to_string())
            }
        }
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Document(DocumentError),

    #[error("{0}")]
    Value(ValueEncodeError),

    #[error("{0}")]
    Query(QueryError),

    #[error("{0}")]
    Store(StoreError),
}

///
/// StoreError
///
/// Store-specific structured error detail.
/// Never returned directly; always wrapped in [`ErrorDetail::Store`].
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("store corruption: {message}")]
    Corrupt { message: String },

    #[error("store unavailable: {message}")]
    Unavailable { message: String },
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Corruption,
    Internal,
    Unavailable,
    Unsupported,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Corruption => "corruption",
            Self::Internal => "internal",
            Self::Unavailable => "unavailable",
            Self::Unsupported => "unsupported",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Config,
    Document,
    Index,
    Query,
    Serialize,
    Store,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::Document => "document",
            Self::Index => "index",
            Self::Query => "query",
            Self::Serialize => "serialize",
            Self::Store => "store",
        };
        write!(f, "{label}")
    }
}
