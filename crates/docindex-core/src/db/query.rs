//! Equality query execution.
//!
//! Each filter clause resolves to one index scan. The first scan is an
//! unbounded prefix scan; every later scan is narrowed to the id span
//! `[low, high]` seen by the previous scan. Every surviving candidate was in
//! that previous scan, so the narrowing only trims scan size; the explicit
//! set intersection after each scan is what decides membership.

use crate::{
    db::{Db, Filter, QueryError},
    document::{
        Document, is_indexable_field, normalize_type_name, validate_field_name, validate_type_name,
    },
    error::InternalError,
    key::{self, canonicalize},
    obs::sink::{self, ExecKind, MetricsEvent, ScanKind, Span},
    store::{KvStore, ListOptions, Row},
};
use std::collections::BTreeSet;
use tracing::{debug, warn};

///
/// IndexPredicate
///
/// One filter clause lowered to its index scan prefix.
///

#[derive(Debug)]
struct IndexPredicate<'f> {
    field: &'f str,
    prefix: String,
}

///
/// IdBound
///
/// Inclusive id span observed by the previous scan.
///

#[derive(Debug)]
struct IdBound {
    low: String,
    high: String,
}

impl<S: KvStore + ?Sized> Db<'_, S> {
    /// Return every document of `type_name` matching all clauses of `filter`.
    ///
    /// Result order follows ascending document id but is not part of the
    /// contract. An empty filter matches nothing.
    pub fn query(
        &self,
        type_name: Option<&str>,
        filter: &Filter,
    ) -> Result<Vec<Document>, InternalError> {
        self.with_metrics(|| self.execute_query(type_name, filter))
    }

    fn execute_query(
        &self,
        type_name: Option<&str>,
        filter: &Filter,
    ) -> Result<Vec<Document>, InternalError> {
        let type_name = normalize_type_name(type_name)
            .map(validate_type_name)
            .transpose()?;
        let label = type_name.unwrap_or_default();
        let mut span = Span::new(ExecKind::Query, label);

        if filter.is_empty() {
            debug!(type_name = label, "empty filter matches no documents");
            return Ok(Vec::new());
        }

        let predicates = self.lower_filter(type_name, filter)?;
        let Some(candidates) = self.intersect_candidates(type_name, &predicates)? else {
            sink::record(MetricsEvent::ShortCircuit { type_name: label });
            return Ok(Vec::new());
        };

        let documents = self.fetch_documents(type_name, &candidates)?;
        span.set_rows(documents.len() as u64);

        Ok(documents)
    }

    // Validate and encode every clause before the first store call.
    fn lower_filter<'f>(
        &self,
        type_name: Option<&str>,
        filter: &'f Filter,
    ) -> Result<Vec<IndexPredicate<'f>>, InternalError> {
        filter
            .iter()
            .map(|(field, value)| -> Result<IndexPredicate<'f>, InternalError> {
                if !is_indexable_field(field) {
                    return Err(QueryError::UnindexedField {
                        field: field.to_string(),
                    }
                    .into());
                }
                let field = validate_field_name(field)?;
                let canonical = canonicalize(value, self.config.max_indexed_text_len)?;

                Ok(IndexPredicate {
                    field,
                    prefix: key::index_prefix(type_name, field, &canonical),
                })
            })
            .collect()
    }

    // Narrow the candidate id set one clause at a time.
    // Returns `None` as soon as any clause leaves nothing to match.
    fn intersect_candidates(
        &self,
        type_name: Option<&str>,
        predicates: &[IndexPredicate<'_>],
    ) -> Result<Option<BTreeSet<String>>, InternalError> {
        let mut candidates: Option<BTreeSet<String>> = None;
        let mut bound: Option<IdBound> = None;

        for predicate in predicates {
            let ids = self.scan_ids(type_name, predicate, bound.as_ref())?;
            let (Some(low), Some(high)) = (ids.first(), ids.last()) else {
                debug!(field = predicate.field, "no index entries, query is empty");
                return Ok(None);
            };
            let next_bound = IdBound {
                low: low.clone(),
                high: high.clone(),
            };

            let narrowed: BTreeSet<String> = match candidates.take() {
                None => ids.into_iter().collect(),
                Some(previous) => ids.into_iter().filter(|id| previous.contains(id)).collect(),
            };
            if narrowed.is_empty() {
                debug!(field = predicate.field, "intersection is empty, query is empty");
                return Ok(None);
            }

            debug!(
                field = predicate.field,
                candidates = narrowed.len(),
                low = %next_bound.low,
                high = %next_bound.high,
                "clause applied"
            );
            candidates = Some(narrowed);
            bound = Some(next_bound);
        }

        Ok(candidates)
    }

    // Scan one clause's index entries and return their ids in scan order.
    fn scan_ids(
        &self,
        type_name: Option<&str>,
        predicate: &IndexPredicate<'_>,
        bound: Option<&IdBound>,
    ) -> Result<Vec<String>, InternalError> {
        let (kind, options) = match bound {
            None => (ScanKind::Prefix, ListOptions::prefix(predicate.prefix.as_str())),
            Some(bound) => (
                ScanKind::Range,
                ListOptions::range(
                    format!("{}{}", predicate.prefix, bound.low),
                    format!("{}{}", predicate.prefix, bound.high),
                ),
            ),
        };

        let entries = self.store.list(&options)?;
        sink::record(MetricsEvent::IndexScan {
            kind,
            type_name: type_name.unwrap_or_default(),
            entries: entries.len() as u64,
        });

        let mut ids = Vec::with_capacity(entries.len());
        for (raw_key, raw_value) in &entries {
            let index_key = std::str::from_utf8(raw_key).map_err(|_| {
                InternalError::index_corruption(format!(
                    "index key under {:?} is not valid utf-8",
                    predicate.prefix
                ))
            })?;
            let Some(id) = key::id_from_index_key(&predicate.prefix, index_key) else {
                continue;
            };

            let expected = key::primary_key(type_name, id);
            if raw_value.as_slice() != expected.as_bytes() {
                return Err(InternalError::index_corruption(format!(
                    "index entry {index_key:?} points at {:?}, expected {expected:?}",
                    String::from_utf8_lossy(raw_value)
                )));
            }

            ids.push(id.to_string());
        }

        debug!(
            field = predicate.field,
            ?kind,
            scanned = entries.len(),
            matched = ids.len(),
            "index scan"
        );

        Ok(ids)
    }

    // Batch-fetch candidate documents, at most `batch_get_limit` keys per call.
    fn fetch_documents(
        &self,
        type_name: Option<&str>,
        candidates: &BTreeSet<String>,
    ) -> Result<Vec<Document>, InternalError> {
        let keys: Vec<Vec<u8>> = candidates
            .iter()
            .map(|id| key::primary_key(type_name, id).into_bytes())
            .collect();

        let mut documents = Vec::with_capacity(keys.len());
        for chunk in keys.chunks(self.config.batch_get_limit) {
            let found = self.store.get_many(chunk)?;

            for primary_key in chunk {
                match found.get(primary_key) {
                    Some(bytes) => documents.push(Row::try_from_bytes(bytes)?.document),
                    None => {
                        warn!(
                            primary_key = %String::from_utf8_lossy(primary_key),
                            "index entry points at a missing document, skipping"
                        );
                        sink::record(MetricsEvent::DanglingIndexEntry {
                            type_name: type_name.unwrap_or_default(),
                        });
                    }
                }
            }
        }

        Ok(documents)
    }
}
