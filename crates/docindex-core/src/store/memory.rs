use crate::{
    error::InternalError,
    store::{BatchOp, KvStore, ListOptions, WriteBatch},
};
use std::{cell::RefCell, collections::BTreeMap, ops::Bound};

///
/// MemoryStore
///
/// Ephemeral `BTreeMap`-backed store. Single-threaded by construction
/// (interior mutability through `RefCell`); batches apply under one borrow,
/// so they are atomic with respect to every other call.
///

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Snapshot all keys (diagnostics and tests).
    #[must_use]
    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.entries.borrow().keys().cloned().collect()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, InternalError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn get_many(&self, keys: &[Vec<u8>]) -> Result<BTreeMap<Vec<u8>, Vec<u8>>, InternalError> {
        let entries = self.entries.borrow();

        Ok(keys
            .iter()
            .filter_map(|key| entries.get(key).map(|value| (key.clone(), value.clone())))
            .collect())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), InternalError> {
        self.entries.borrow_mut().insert(key.to_vec(), value.to_vec());

        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<bool, InternalError> {
        Ok(self.entries.borrow_mut().remove(key).is_some())
    }

    fn write_batch(&self, batch: WriteBatch) -> Result<(), InternalError> {
        let mut entries = self.entries.borrow_mut();

        for op in batch.into_ops() {
            match op {
                BatchOp::Put { key, value } => {
                    entries.insert(key, value);
                }
                BatchOp::Delete { key } => {
                    entries.remove(&key);
                }
            }
        }

        Ok(())
    }

    fn list(&self, options: &ListOptions) -> Result<Vec<(Vec<u8>, Vec<u8>)>, InternalError> {
        let entries = self.entries.borrow();

        let out = match options {
            ListOptions::Prefix(prefix) => entries
                .range::<[u8], _>((Bound::Included(prefix.as_slice()), Bound::Unbounded))
                .take_while(|(key, _)| key.starts_with(prefix))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            ListOptions::Range { start, end } => {
                if start > end {
                    return Ok(Vec::new());
                }

                entries
                    .range::<[u8], _>((
                        Bound::Included(start.as_slice()),
                        Bound::Included(end.as_slice()),
                    ))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            }
        };

        Ok(out)
    }
}
