use crate::{
    db::Db,
    document::{Document, DocumentIdentity, validate_field_name},
    error::InternalError,
    key::{self, canonicalize},
    obs::sink::{self, ExecKind, MetricsEvent, Span},
    store::{KvStore, Row, WriteBatch},
};
use std::collections::BTreeSet;
use tracing::debug;

impl<S: KvStore + ?Sized> Db<'_, S> {
    /// Store a document and its index entries as one atomic batch.
    ///
    /// Every validation (identity, field names, value encoding, row size)
    /// runs before the first store call, so a rejected document leaves the
    /// store untouched. Index entries derived from the previous version of
    /// the document that no longer apply are removed in the same batch.
    pub fn put(&self, document: &Document) -> Result<(), InternalError> {
        self.with_metrics(|| self.put_document(document))
    }

    fn put_document(&self, document: &Document) -> Result<(), InternalError> {
        // Every put counts, including ones rejected by identity validation.
        let mut span = Span::new(ExecKind::Put, document.type_name().unwrap_or_default());
        let identity = document.identity()?;

        let index_keys = self.derive_index_keys(identity, document)?;
        let row = Row {
            document: document.clone(),
            index_keys: index_keys.iter().cloned().collect(),
        };
        let raw_row = row.to_raw()?;
        let primary_key = key::primary_key(identity.type_name, identity.id);

        let previous_keys = self
            .load_row(&primary_key)?
            .map(|row| row.index_keys)
            .unwrap_or_default();
        let stale_keys: Vec<&String> = previous_keys
            .iter()
            .filter(|key| !index_keys.contains(*key))
            .collect();
        let inserted = index_keys
            .iter()
            .filter(|key| !previous_keys.contains(key))
            .count();

        let mut batch = WriteBatch::new();
        for key in &stale_keys {
            batch.delete(key.as_bytes());
        }
        for key in &index_keys {
            batch.put(key.as_bytes(), primary_key.as_bytes());
        }
        batch.put(primary_key.as_bytes(), raw_row.into_bytes());

        self.store.write_batch(batch)?;

        sink::record(MetricsEvent::IndexDelta {
            type_name: identity.type_name.unwrap_or_default(),
            inserts: inserted as u64,
            removes: stale_keys.len() as u64,
        });
        span.set_rows(1);

        debug!(
            primary_key = %primary_key,
            index_entries = index_keys.len(),
            inserted,
            removed = stale_keys.len(),
            "document stored"
        );

        Ok(())
    }

    // Derive the full index-key set of a document.
    // Fails on the first invalid field name or non-encodable value.
    fn derive_index_keys(
        &self,
        identity: DocumentIdentity<'_>,
        document: &Document,
    ) -> Result<BTreeSet<String>, InternalError> {
        document
            .indexable_fields()
            .map(|(field, value)| -> Result<String, InternalError> {
                let field = validate_field_name(field)?;
                let canonical = canonicalize(value, self.config.max_indexed_text_len)?;

                Ok(key::index_key(
                    identity.type_name,
                    field,
                    &canonical,
                    identity.id,
                ))
            })
            .collect()
    }
}
