use crate::{
    error::InternalError,
    store::{KvStore, ListOptions, MemoryStore, WriteBatch},
};
use std::{cell::RefCell, collections::BTreeMap};

///
/// StoreCall
///
/// One observed call against a [`RecordingStore`].
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum StoreCall {
    Get,
    GetMany { keys: usize },
    Put,
    Delete,
    WriteBatch { ops: usize },
    List(ListOptions),
}

///
/// RecordingStore
///
/// Memory store that logs every call, for asserting the engine's access
/// pattern (scan shapes, batch sizes, no writes after a rejection).
///

#[derive(Debug, Default)]
pub(crate) struct RecordingStore {
    inner: MemoryStore,
    calls: RefCell<Vec<StoreCall>>,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) const fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub(crate) fn calls(&self) -> Vec<StoreCall> {
        self.calls.borrow().clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub(crate) fn write_calls(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    StoreCall::Put | StoreCall::Delete | StoreCall::WriteBatch { .. }
                )
            })
            .count()
    }

    pub(crate) fn list_calls(&self) -> Vec<ListOptions> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                StoreCall::List(options) => Some(options.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn get_many_sizes(&self) -> Vec<usize> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                StoreCall::GetMany { keys } => Some(*keys),
                _ => None,
            })
            .collect()
    }

    fn log(&self, call: StoreCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl KvStore for RecordingStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, InternalError> {
        self.log(StoreCall::Get);
        self.inner.get(key)
    }

    fn get_many(&self, keys: &[Vec<u8>]) -> Result<BTreeMap<Vec<u8>, Vec<u8>>, InternalError> {
        self.log(StoreCall::GetMany { keys: keys.len() });
        self.inner.get_many(keys)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), InternalError> {
        self.log(StoreCall::Put);
        self.inner.put(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<bool, InternalError> {
        self.log(StoreCall::Delete);
        self.inner.delete(key)
    }

    fn write_batch(&self, batch: WriteBatch) -> Result<(), InternalError> {
        self.log(StoreCall::WriteBatch { ops: batch.len() });
        self.inner.write_batch(batch)
    }

    fn list(&self, options: &ListOptions) -> Result<Vec<(Vec<u8>, Vec<u8>)>, InternalError> {
        self.log(StoreCall::List(options.clone()));
        self.inner.list(options)
    }
}

///
/// FailurePoint
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum FailurePoint {
    Get,
    GetMany,
    WriteBatch,
    List,
}

///
/// FailingStore
///
/// Memory store that reports the backend as unavailable at one call site.
///

#[derive(Debug)]
pub(crate) struct FailingStore {
    inner: MemoryStore,
    fail_at: FailurePoint,
}

impl FailingStore {
    pub(crate) fn new(fail_at: FailurePoint) -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_at,
        }
    }

    pub(crate) const fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn check(&self, point: FailurePoint) -> Result<(), InternalError> {
        if self.fail_at == point {
            return Err(InternalError::store_unavailable(format!(
                "injected failure at {point:?}"
            )));
        }

        Ok(())
    }
}

impl KvStore for FailingStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, InternalError> {
        self.check(FailurePoint::Get)?;
        self.inner.get(key)
    }

    fn get_many(&self, keys: &[Vec<u8>]) -> Result<BTreeMap<Vec<u8>, Vec<u8>>, InternalError> {
        self.check(FailurePoint::GetMany)?;
        self.inner.get_many(keys)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), InternalError> {
        self.inner.put(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<bool, InternalError> {
        self.inner.delete(key)
    }

    fn write_batch(&self, batch: WriteBatch) -> Result<(), InternalError> {
        self.check(FailurePoint::WriteBatch)?;
        self.inner.write_batch(batch)
    }

    fn list(&self, options: &ListOptions) -> Result<Vec<(Vec<u8>, Vec<u8>)>, InternalError> {
        self.check(FailurePoint::List)?;
        self.inner.list(options)
    }
}
