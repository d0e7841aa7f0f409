//! Core runtime for docindex: the key codec, the document model, the store
//! contract, and the engine that writes documents and answers equality
//! queries through secondary indexes.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod db;
pub mod document;
pub mod error;
pub mod key;
pub mod obs;
pub mod serialize;
pub mod store;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Default maximum length, in UTF-16 code units, of an indexed text value.
///
/// Store keys are bounded; this leaves headroom for the type prefix, the
/// field name and the document id that share the index key.
pub const MAX_INDEXED_TEXT_LEN: usize = 1024;

/// Width of the zero-padded decimal encoding used for indexed integers.
pub const INTEGER_DIGITS: usize = 16;

/// Default maximum number of keys fetched by one batch-get store call.
pub const BATCH_GET_LIMIT: usize = 128;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, stores, serializers, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        db::{Db, Filter},
        document::Document,
        value::Value,
    };
}
