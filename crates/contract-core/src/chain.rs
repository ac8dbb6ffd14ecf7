//! Document version lineages and the status workflow
//!
//! Every generated document starts a lineage at version 1; later
//! versions are appended with contiguous numbers and exactly one
//! version per lineage is the latest. The demote-then-insert step goes
//! through the storage compare-and-swap so concurrent writers cannot
//! both produce a new latest.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use contract_types::{Document, DocumentAction, DocumentEvent, DocumentStatus, EventLog};
use thiserror::Error;
use uuid::Uuid;

use crate::storage::{DocumentStorage, StorageError};

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("lineage not found: {0}")]
    LineageNotFound(String),

    #[error("document not found: {0}")]
    DocumentNotFound(String),

    #[error("version {version} not found in lineage {lineage_id}")]
    VersionNotFound { lineage_id: String, version: u32 },

    #[error("concurrent version conflict on lineage {0}")]
    ConcurrentVersionConflict(String),

    #[error("invalid status transition: {from} -> {to}")]
    InvalidStatusTransition {
        from: DocumentStatus,
        to: DocumentStatus,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Inputs for the first version of a new lineage.
#[derive(Debug, Clone)]
pub struct FirstVersion {
    pub category_id: String,
    pub name: String,
    pub content: String,
    pub variables_snapshot: std::collections::HashMap<String, String>,
    pub signature_required: bool,
    pub created_by: String,
    /// Set when the content came from a template; recorded in the
    /// event log.
    pub template_code: Option<String>,
}

pub struct DocumentVersionChain {
    store: Arc<dyn DocumentStorage>,
    events: RwLock<EventLog>,
}

impl DocumentVersionChain {
    pub fn new(store: Arc<dyn DocumentStorage>) -> Self {
        Self {
            store,
            events: RwLock::new(EventLog::new()),
        }
    }

    /// Allocate a new lineage and create version 1.
    pub fn create_first_version(&self, req: FirstVersion) -> Result<Document, ChainError> {
        let doc = Document {
            id: Uuid::new_v4().to_string(),
            lineage_id: Uuid::new_v4().to_string(),
            category_id: req.category_id,
            name: req.name,
            content: req.content,
            variables_snapshot: req.variables_snapshot,
            version: 1,
            status: DocumentStatus::Draft,
            is_latest: true,
            signature_required: req.signature_required,
            created_by: req.created_by,
            created_at: Utc::now(),
        };
        self.store.insert(doc.clone())?;

        let action = match req.template_code {
            Some(template_code) => DocumentAction::Generated { template_code },
            None => DocumentAction::VersionCreated {
                version: 1,
                comment: None,
            },
        };
        self.record(action, &doc, &doc.created_by);

        tracing::info!(lineage = %doc.lineage_id, "created document lineage");
        Ok(doc)
    }

    /// Append version n+1 to a lineage, demoting the current latest.
    ///
    /// Copies `category_id`/`name`/`content`/`signature_required` and
    /// the variables snapshot forward; content may be edited afterwards
    /// by the caller. The new version always starts at `draft`. Loses
    /// the swap race with `ConcurrentVersionConflict`; the caller may
    /// re-read the latest and retry.
    pub fn create_new_version(
        &self,
        lineage_id: &str,
        created_by: &str,
        comment: Option<String>,
    ) -> Result<Document, ChainError> {
        let latest = self
            .store
            .latest(lineage_id)?
            .ok_or_else(|| ChainError::LineageNotFound(lineage_id.to_string()))?;

        let doc = Document {
            id: Uuid::new_v4().to_string(),
            lineage_id: latest.lineage_id.clone(),
            category_id: latest.category_id.clone(),
            name: latest.name.clone(),
            content: latest.content.clone(),
            variables_snapshot: latest.variables_snapshot.clone(),
            version: latest.version + 1,
            status: DocumentStatus::Draft,
            is_latest: true,
            signature_required: latest.signature_required,
            created_by: created_by.to_string(),
            created_at: Utc::now(),
        };

        let swapped = self
            .store
            .compare_and_swap(lineage_id, &latest.id, doc.clone())?;
        if !swapped {
            tracing::warn!(lineage = %lineage_id, "lost version swap race");
            return Err(ChainError::ConcurrentVersionConflict(lineage_id.to_string()));
        }

        self.record(
            DocumentAction::VersionCreated {
                version: doc.version,
                comment,
            },
            &doc,
            created_by,
        );
        Ok(doc)
    }

    /// Move one document version through the status workflow.
    pub fn transition_status(
        &self,
        document_id: &str,
        to: DocumentStatus,
        actor: &str,
    ) -> Result<Document, ChainError> {
        let doc = self
            .store
            .get(document_id)?
            .ok_or_else(|| ChainError::DocumentNotFound(document_id.to_string()))?;

        if !DocumentStatus::can_transition(doc.status, to) {
            return Err(ChainError::InvalidStatusTransition {
                from: doc.status,
                to,
            });
        }

        self.store.update_status(document_id, to)?;
        let mut updated = doc.clone();
        updated.status = to;
        self.record(
            DocumentAction::StatusChanged {
                from: doc.status,
                to,
            },
            &updated,
            actor,
        );
        Ok(updated)
    }

    pub fn get_latest(&self, lineage_id: &str) -> Result<Document, ChainError> {
        self.store
            .latest(lineage_id)?
            .ok_or_else(|| ChainError::LineageNotFound(lineage_id.to_string()))
    }

    pub fn get_version(&self, lineage_id: &str, version: u32) -> Result<Document, ChainError> {
        match self.store.version(lineage_id, version)? {
            Some(doc) => Ok(doc),
            None => {
                if self.store.latest(lineage_id)?.is_none() {
                    Err(ChainError::LineageNotFound(lineage_id.to_string()))
                } else {
                    Err(ChainError::VersionNotFound {
                        lineage_id: lineage_id.to_string(),
                        version,
                    })
                }
            }
        }
    }

    pub fn list_by_category(&self, category_id: &str) -> Result<Vec<Document>, ChainError> {
        Ok(self.store.list_by_category(category_id)?)
    }

    pub fn list_lineage(&self, lineage_id: &str) -> Result<Vec<Document>, ChainError> {
        Ok(self.store.list_lineage(lineage_id)?)
    }

    pub fn events_for(&self, lineage_id: &str) -> Vec<DocumentEvent> {
        self.events
            .read()
            .expect("event log lock poisoned")
            .for_lineage(lineage_id)
    }

    fn record(&self, action: DocumentAction, doc: &Document, actor: &str) {
        self.events
            .write()
            .expect("event log lock poisoned")
            .append(action, &doc.lineage_id, &doc.id, actor);
    }
}
