//! Shared domain types for the warehouse-leasing contract document system.
//!
//! Pure data: template and variable records, document categories, the
//! document version record with its status machine, and the document
//! event log. Business orchestration lives in `contract-core`.

pub mod events;
pub mod types;

pub use events::{DocumentAction, DocumentEvent, EventLog};
pub use types::{
    CategoryCompleteness, ContractTemplate, Document, DocumentCategory, DocumentStatus,
    CategoryType, TemplateType, Variable, VariableType,
};
