//! ## Crate layout
//! - `core`: key codec, document model, store contract, engine and
//!   observability.
//! - `db`: the public `Db` handle over a caller-owned store.
//! - `error`: the stable public error taxonomy.
//!
//! The `prelude` module carries the vocabulary most callers need: documents,
//! values, filters, the engine handle and the in-memory store.

pub use docindex_core as core;

pub mod db;
pub mod error;

pub use db::Db;
pub use error::Error;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        db::Db,
        error::{Error, ErrorKind},
    };
    pub use docindex_core::{
        config::DbConfig,
        db::Filter,
        document::Document,
        store::{KvStore, MemoryStore},
        value::Value,
    };
}
