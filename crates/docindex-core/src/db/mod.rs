//! Module: db
//! Responsibility: the document engine. Writes documents with their index
//! entries, reads them back by key, and answers equality queries.
//! Does not own: key layout (see `key`) or physical storage (see `store`).

mod filter;
mod query;
mod write;


pub use filter::Filter;

use crate::{
    config::{ConfigError, DbConfig},
    document::{Document, normalize_type_name, validate_id, validate_type_name},
    error::InternalError,
    key,
    obs::sink::{ExecKind, MetricsSink, Span, with_metrics_sink},
    store::{KvStore, Row},
};
use thiserror::Error as ThisError;

///
/// QueryError
///
/// Query-shape failures raised before any store call.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum QueryError {
    #[error("field {field:?} is not indexed and cannot be filtered on")]
    UnindexedField { field: String },
}

///
/// Db
///
/// Document engine over a borrowed store. The store's lifecycle belongs to
/// the caller; the engine only issues calls against it.
///

pub struct Db<'s, S: KvStore + ?Sized> {
    store: &'s S,
    config: DbConfig,
    metrics: Option<&'static dyn MetricsSink>,
}

impl<'s, S: KvStore + ?Sized> Db<'s, S> {
    /// Engine with default limits.
    #[must_use]
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            config: DbConfig::default(),
            metrics: None,
        }
    }

    /// Engine with explicit limits; the config is validated first.
    pub fn with_config(store: &'s S, config: DbConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            store,
            config: config.validate()?,
            metrics: None,
        })
    }

    /// Route this handle's metrics events to `sink` instead of the global
    /// counters.
    #[must_use]
    pub const fn metrics_sink(mut self, sink: &'static dyn MetricsSink) -> Self {
        self.metrics = Some(sink);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &DbConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &'s S {
        self.store
    }

    /// Load a document by its full primary key.
    pub fn get(&self, primary_key: &str) -> Result<Option<Document>, InternalError> {
        self.with_metrics(|| {
            let (type_name, _) = key::split_primary_key(primary_key);
            let mut span = Span::new(ExecKind::Get, type_name.unwrap_or_default());

            let row = self.load_row(primary_key)?;
            span.set_rows(u64::from(row.is_some()));

            Ok(row.map(|row| row.document))
        })
    }

    /// Load a document by type and id.
    ///
    /// The id and type name are validated like those of a stored document,
    /// so a lookup can never address an index entry.
    pub fn get_by_type(
        &self,
        type_name: Option<&str>,
        id: &str,
    ) -> Result<Option<Document>, InternalError> {
        let type_name = normalize_type_name(type_name)
            .map(validate_type_name)
            .transpose()?;
        let primary_key = key::primary_key(type_name, validate_id(id)?);

        self.get(&primary_key)
    }

    // Read and decode the row stored under a primary key.
    fn load_row(&self, primary_key: &str) -> Result<Option<Row>, InternalError> {
        let Some(bytes) = self.store.get(primary_key.as_bytes())? else {
            return Ok(None);
        };

        Ok(Some(Row::try_from_bytes(&bytes)?))
    }

    fn with_metrics<T>(&self, f: impl FnOnce() -> T) -> T {
        if let Some(sink) = self.metrics {
            with_metrics_sink(sink, f)
        } else {
            f()
        }
    }
}
