//! Persistence contract for document lineages
//!
//! The version chain talks to storage through [`DocumentStorage`]; a
//! database-backed implementation would put `compare_and_swap` in a
//! transaction or a conditional update keyed on the previous latest's
//! id. Infrastructure failures cross this boundary as an opaque
//! [`StorageError`] so callers can tell domain errors from plumbing.

use std::collections::HashMap;
use std::sync::RwLock;

use contract_types::{Document, DocumentStatus};
use thiserror::Error;

/// Opaque infrastructure failure, passed through unreinterpreted.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("storage failure: {0}")]
pub struct StorageError(pub String);

pub trait DocumentStorage: Send + Sync {
    fn insert(&self, doc: Document) -> Result<(), StorageError>;

    fn get(&self, id: &str) -> Result<Option<Document>, StorageError>;

    /// Current latest version of a lineage, if the lineage exists.
    fn latest(&self, lineage_id: &str) -> Result<Option<Document>, StorageError>;

    fn version(&self, lineage_id: &str, version: u32) -> Result<Option<Document>, StorageError>;

    fn list_by_category(&self, category_id: &str) -> Result<Vec<Document>, StorageError>;

    /// All versions of a lineage in version order.
    fn list_lineage(&self, lineage_id: &str) -> Result<Vec<Document>, StorageError>;

    fn update_status(&self, id: &str, status: DocumentStatus) -> Result<(), StorageError>;

    /// Atomically demote the expected latest and insert `new_latest`.
    ///
    /// Returns `Ok(false)` when `expected_latest_id` is no longer the
    /// latest of the lineage; no observer ever sees zero or two latest
    /// documents in the lineage.
    fn compare_and_swap(
        &self,
        lineage_id: &str,
        expected_latest_id: &str,
        new_latest: Document,
    ) -> Result<bool, StorageError>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    docs: HashMap<String, Document>,
    /// lineage_id -> document ids in version order
    lineages: HashMap<String, Vec<String>>,
}

/// In-memory reference implementation; the swap runs under the single
/// write lock.
#[derive(Debug, Default)]
pub struct MemoryDocumentStorage {
    inner: RwLock<MemoryInner>,
}

impl MemoryDocumentStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStorage for MemoryDocumentStorage {
    fn insert(&self, doc: Document) -> Result<(), StorageError> {
        let mut inner = self.inner.write().expect("document storage lock poisoned");
        inner
            .lineages
            .entry(doc.lineage_id.clone())
            .or_default()
            .push(doc.id.clone());
        inner.docs.insert(doc.id.clone(), doc);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Document>, StorageError> {
        let inner = self.inner.read().expect("document storage lock poisoned");
        Ok(inner.docs.get(id).cloned())
    }

    fn latest(&self, lineage_id: &str) -> Result<Option<Document>, StorageError> {
        let inner = self.inner.read().expect("document storage lock poisoned");
        Ok(lineage_docs(&inner, lineage_id)
            .into_iter()
            .find(|d| d.is_latest))
    }

    fn version(&self, lineage_id: &str, version: u32) -> Result<Option<Document>, StorageError> {
        let inner = self.inner.read().expect("document storage lock poisoned");
        Ok(lineage_docs(&inner, lineage_id)
            .into_iter()
            .find(|d| d.version == version))
    }

    fn list_by_category(&self, category_id: &str) -> Result<Vec<Document>, StorageError> {
        let inner = self.inner.read().expect("document storage lock poisoned");
        let mut out: Vec<Document> = inner
            .docs
            .values()
            .filter(|d| d.category_id == category_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| (&a.lineage_id, a.version).cmp(&(&b.lineage_id, b.version)));
        Ok(out)
    }

    fn list_lineage(&self, lineage_id: &str) -> Result<Vec<Document>, StorageError> {
        let inner = self.inner.read().expect("document storage lock poisoned");
        let mut out = lineage_docs(&inner, lineage_id);
        out.sort_by_key(|d| d.version);
        Ok(out)
    }

    fn update_status(&self, id: &str, status: DocumentStatus) -> Result<(), StorageError> {
        let mut inner = self.inner.write().expect("document storage lock poisoned");
        match inner.docs.get_mut(id) {
            Some(doc) => {
                doc.status = status;
                Ok(())
            }
            None => Err(StorageError(format!("unknown document id: {}", id))),
        }
    }

    fn compare_and_swap(
        &self,
        lineage_id: &str,
        expected_latest_id: &str,
        new_latest: Document,
    ) -> Result<bool, StorageError> {
        let mut inner = self.inner.write().expect("document storage lock poisoned");

        let current_latest = lineage_docs(&inner, lineage_id)
            .into_iter()
            .find(|d| d.is_latest);
        match current_latest {
            Some(latest) if latest.id == expected_latest_id => {}
            _ => return Ok(false),
        }

        // Demote and insert under the same lock: the lineage never
        // shows zero or two latest documents.
        if let Some(prev) = inner.docs.get_mut(expected_latest_id) {
            prev.is_latest = false;
        }
        inner
            .lineages
            .entry(lineage_id.to_string())
            .or_default()
            .push(new_latest.id.clone());
        inner.docs.insert(new_latest.id.clone(), new_latest);
        Ok(true)
    }
}

fn lineage_docs(inner: &MemoryInner, lineage_id: &str) -> Vec<Document> {
    inner
        .lineages
        .get(lineage_id)
        .map(|ids| {
            ids.iter()
                .filter_map(|id| inner.docs.get(id))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}
