use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Declared type of a template variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableType {
    Text,
    Number,
    Date,
    Boolean,
    Currency,
}

impl std::fmt::Display for VariableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableType::Text => write!(f, "text"),
            VariableType::Number => write!(f, "number"),
            VariableType::Date => write!(f, "date"),
            VariableType::Boolean => write!(f, "boolean"),
            VariableType::Currency => write!(f, "currency"),
        }
    }
}

/// A named placeholder a template exposes.
///
/// `name` is the token identifier used inside `{{name}}` placeholders and
/// must be unique within one template's schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Kind of contract a template produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateType {
    WarehouseRental,
    ServiceAgreement,
    Amendment,
}

/// A reusable contract template with `{{name}}` placeholder tokens.
///
/// Templates are edited in place; only *generated documents* are
/// versioned. `version` is a free-form operator-facing label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractTemplate {
    pub id: String,
    /// Unique code, stored uppercase.
    pub code: String,
    pub name: String,
    pub template_type: TemplateType,
    pub content: String,
    pub variables: Vec<Variable>,
    pub version: String,
    pub is_active: bool,
    pub is_default: bool,
}

/// Resource kind a document category applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryType {
    Contract,
    Project,
    Customer,
}

/// Classification bucket documents are filed under.
///
/// Immutable once documents reference it, except for display metadata
/// (`name`, `sort_order`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentCategory {
    pub id: String,
    pub code: String,
    pub name: String,
    pub category_type: CategoryType,
    pub is_required: bool,
    pub sort_order: i32,
}

/// Workflow status of a single document version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    Review,
    Approved,
    Final,
}

impl DocumentStatus {
    /// Whether `from -> to` is an allowed workflow transition.
    ///
    /// Forward path is draft -> review -> approved -> final; a document
    /// can also be sent back to draft from review (rejection) or from
    /// approved (reopened).
    pub fn can_transition(from: DocumentStatus, to: DocumentStatus) -> bool {
        use DocumentStatus::*;
        matches!(
            (from, to),
            (Draft, Review) | (Review, Approved) | (Approved, Final) | (Review, Draft) | (Approved, Draft)
        )
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentStatus::Draft => write!(f, "draft"),
            DocumentStatus::Review => write!(f, "review"),
            DocumentStatus::Approved => write!(f, "approved"),
            DocumentStatus::Final => write!(f, "final"),
        }
    }
}

/// One node in a document version lineage.
///
/// All versions of "the same" generated document share a `lineage_id`.
/// Version numbers are contiguous from 1 and exactly one version per
/// lineage carries `is_latest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub lineage_id: String,
    pub category_id: String,
    pub name: String,
    /// Rendered text.
    pub content: String,
    /// The values used to render this version. Later template edits do
    /// not retroactively invalidate it.
    pub variables_snapshot: HashMap<String, String>,
    pub version: u32,
    pub status: DocumentStatus,
    pub is_latest: bool,
    pub signature_required: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Per-category completeness summary consumed by the UI/report layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCompleteness {
    pub required: bool,
    pub satisfied: bool,
    pub count: usize,
}
