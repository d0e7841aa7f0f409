//! Module: store
//! Responsibility: the ordered key-value store contract the engine runs on,
//! plus an in-memory implementation.
//! Does not own: key layout or row encoding policy.

mod memory;
mod row;


pub use memory::MemoryStore;
pub use row::{MAX_ROW_BYTES, RawRow, RawRowError, Row};

use crate::error::InternalError;
use std::collections::BTreeMap;

///
/// KvStore
///
/// Byte-ordered key-value store.
///
/// Implementations must return `list` results in ascending byte order of the
/// key, and must apply `write_batch` atomically: either every operation in
/// the batch becomes visible or none does. Errors are propagated to callers
/// unchanged; the engine does not retry.
///

pub trait KvStore {
    /// Point lookup.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, InternalError>;

    /// Batch lookup; the result contains only keys that were found.
    fn get_many(&self, keys: &[Vec<u8>]) -> Result<BTreeMap<Vec<u8>, Vec<u8>>, InternalError>;

    /// Insert or replace one entry.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), InternalError>;

    /// Remove one entry, returning whether it existed.
    fn delete(&self, key: &[u8]) -> Result<bool, InternalError>;

    /// Apply every operation of the batch as one atomic unit.
    fn write_batch(&self, batch: WriteBatch) -> Result<(), InternalError>;

    /// Ordered scan.
    fn list(&self, options: &ListOptions) -> Result<Vec<(Vec<u8>, Vec<u8>)>, InternalError>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, InternalError> {
        (**self).get(key)
    }

    fn get_many(&self, keys: &[Vec<u8>]) -> Result<BTreeMap<Vec<u8>, Vec<u8>>, InternalError> {
        (**self).get_many(keys)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), InternalError> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<bool, InternalError> {
        (**self).delete(key)
    }

    fn write_batch(&self, batch: WriteBatch) -> Result<(), InternalError> {
        (**self).write_batch(batch)
    }

    fn list(&self, options: &ListOptions) -> Result<Vec<(Vec<u8>, Vec<u8>)>, InternalError> {
        (**self).list(options)
    }
}

///
/// ListOptions
///
/// Scan shape for [`KvStore::list`].
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ListOptions {
    /// Every key starting with the prefix.
    Prefix(Vec<u8>),

    /// Every key in `[start, end]`, both bounds inclusive.
    Range { start: Vec<u8>, end: Vec<u8> },
}

impl ListOptions {
    #[must_use]
    pub fn prefix(prefix: impl Into<Vec<u8>>) -> Self {
        Self::Prefix(prefix.into())
    }

    #[must_use]
    pub fn range(start: impl Into<Vec<u8>>, end: impl Into<Vec<u8>>) -> Self {
        Self::Range {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Whether a key falls inside this scan.
    #[must_use]
    pub fn contains(&self, key: &[u8]) -> bool {
        match self {
            Self::Prefix(prefix) => key.starts_with(prefix),
            Self::Range { start, end } => start.as_slice() <= key && key <= end.as_slice(),
        }
    }
}

///
/// BatchOp
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BatchOp {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

impl BatchOp {
    #[must_use]
    pub const fn key(&self) -> &Vec<u8> {
        match self {
            Self::Put { key, .. } | Self::Delete { key } => key,
        }
    }
}

///
/// WriteBatch
///
/// Ordered list of mutations applied atomically by [`KvStore::write_batch`].
/// Later operations on the same key win.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    #[must_use]
    pub const fn new() -> Self {
        Self { ops: Vec::new() }
    }

    pub fn put(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.ops.push(BatchOp::Put {
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn delete(&mut self, key: impl Into<Vec<u8>>) {
        self.ops.push(BatchOp::Delete { key: key.into() });
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BatchOp> {
        self.ops.iter()
    }

    #[must_use]
    pub fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }
}
