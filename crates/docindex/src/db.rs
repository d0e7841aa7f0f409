use crate::error::Error;
use docindex_core::{
    self as core,
    config::DbConfig,
    db::Filter,
    document::Document,
    obs::MetricsSink,
    store::KvStore,
};

///
/// Db
///
/// Public facade over the core engine.
/// Wraps `docindex_core::db::Db` and converts core errors into `docindex::Error`.
///

pub struct Db<'s, S: KvStore + ?Sized> {
    inner: core::db::Db<'s, S>,
}

impl<'s, S: KvStore + ?Sized> Db<'s, S> {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Engine over `store` with default limits.
    #[must_use]
    pub fn new(store: &'s S) -> Self {
        Self {
            inner: core::db::Db::new(store),
        }
    }

    /// Engine over `store` with validated limits.
    pub fn with_config(store: &'s S, config: DbConfig) -> Result<Self, Error> {
        Ok(Self {
            inner: core::db::Db::with_config(store, config)?,
        })
    }

    /// Engine over `store` with limits parsed from a TOML document.
    pub fn from_toml_str(store: &'s S, source: &str) -> Result<Self, Error> {
        Self::with_config(store, DbConfig::from_toml_str(source)?)
    }

    /// Override the metrics sink for operations issued through this handle.
    #[must_use]
    pub const fn metrics_sink(mut self, sink: &'static dyn MetricsSink) -> Self {
        self.inner = self.inner.metrics_sink(sink);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &DbConfig {
        self.inner.config()
    }

    #[must_use]
    pub const fn store(&self) -> &'s S {
        self.inner.store()
    }

    /// Borrow the core engine.
    #[must_use]
    pub const fn inner(&self) -> &core::db::Db<'s, S> {
        &self.inner
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Store a document and its index entries atomically.
    pub fn put(&self, document: &Document) -> Result<(), Error> {
        Ok(self.inner.put(document)?)
    }

    /// Load a document by its full primary key.
    pub fn get(&self, primary_key: &str) -> Result<Option<Document>, Error> {
        Ok(self.inner.get(primary_key)?)
    }

    /// Load a document by type and id.
    pub fn get_by_type(
        &self,
        type_name: Option<&str>,
        id: &str,
    ) -> Result<Option<Document>, Error> {
        Ok(self.inner.get_by_type(type_name, id)?)
    }

    /// Return every document of `type_name` matching all clauses of `filter`.
    pub fn query(&self, type_name: Option<&str>, filter: &Filter) -> Result<Vec<Document>, Error> {
        Ok(self.inner.query(type_name, filter)?)
    }
}
