//! Request/response models for the leasing API

use std::collections::HashMap;

use contract_types::{CategoryType, DocumentStatus};
use serde::{Deserialize, Serialize};

/// Body for `POST /api/documents/generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateDocumentRequest {
    pub template_id: String,
    pub category_id: String,
    pub name: String,
    #[serde(default)]
    pub values: HashMap<String, String>,
    #[serde(default)]
    pub signature_required: bool,
    pub created_by: String,
}

/// Body for `POST /api/templates/:id/preview`.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub values: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewResponse {
    pub rendered: String,
}

/// Body for `POST /api/documents/:lineage_id/versions`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewVersionRequest {
    pub created_by: String,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Body for `POST /api/documents/:id/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusRequest {
    pub status: DocumentStatus,
    pub actor: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListDocumentsQuery {
    pub category_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesQuery {
    pub category_type: CategoryType,
}
