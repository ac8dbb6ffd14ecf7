//! Append-only event log for document lifecycle actions

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::DocumentStatus;

/// Lifecycle actions recorded per document version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentAction {
    /// First version produced from a template.
    Generated { template_code: String },
    /// A version slot was created (version 1 without a template, or n+1).
    VersionCreated {
        version: u32,
        comment: Option<String>,
    },
    StatusChanged {
        from: DocumentStatus,
        to: DocumentStatus,
    },
}

/// A single event log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEvent {
    pub event_id: String,
    pub timestamp: String,
    pub lineage_id: String,
    pub document_id: String,
    pub actor: String,
    pub action: DocumentAction,
}

impl DocumentEvent {
    pub fn new(
        action: DocumentAction,
        lineage_id: &str,
        document_id: &str,
        actor: &str,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().to_rfc3339(),
            lineage_id: lineage_id.to_string(),
            document_id: document_id.to_string(),
            actor: actor.to_string(),
            action,
        }
    }
}

/// Ordered log of document events. Append-only.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EventLog {
    pub events: Vec<DocumentEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and return a reference to it.
    pub fn append(
        &mut self,
        action: DocumentAction,
        lineage_id: &str,
        document_id: &str,
        actor: &str,
    ) -> &DocumentEvent {
        let event = DocumentEvent::new(action, lineage_id, document_id, actor);
        self.events.push(event);
        self.events.last().expect("just pushed")
    }

    /// All events for one lineage, in append order.
    pub fn for_lineage(&self, lineage_id: &str) -> Vec<DocumentEvent> {
        self.events
            .iter()
            .filter(|e| e.lineage_id == lineage_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: any sequence of appends keeps the log in order
        /// with unique event ids.
        #[test]
        fn append_keeps_order_and_unique_ids(count in 1usize..30) {
            let mut log = EventLog::new();
            for i in 0..count {
                log.append(
                    DocumentAction::VersionCreated {
                        version: (i + 1) as u32,
                        comment: None,
                    },
                    "lineage-1",
                    &format!("doc-{}", i),
                    "actor",
                );
            }

            prop_assert_eq!(log.len(), count);

            let versions: Vec<u32> = log
                .events
                .iter()
                .map(|e| match &e.action {
                    DocumentAction::VersionCreated { version, .. } => *version,
                    _ => 0,
                })
                .collect();
            let expected: Vec<u32> = (1..=count as u32).collect();
            prop_assert_eq!(versions, expected);

            let mut seen = std::collections::HashSet::new();
            prop_assert!(log.events.iter().all(|e| seen.insert(e.event_id.clone())));
        }

        /// Property: JSON roundtrip preserves the log.
        #[test]
        fn json_roundtrip(count in 1usize..10) {
            let mut log = EventLog::new();
            for i in 0..count {
                log.append(
                    DocumentAction::StatusChanged {
                        from: DocumentStatus::Draft,
                        to: DocumentStatus::Review,
                    },
                    "lineage-1",
                    &format!("doc-{}", i),
                    "actor",
                );
            }

            let json = serde_json::to_string(&log).unwrap();
            let restored: EventLog = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(restored.len(), log.len());
        }
    }
}
