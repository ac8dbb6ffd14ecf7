//! HTTP handlers for the leasing API

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use contract_core::{render, GenerateRequest, NewTemplate, TemplateFilter, TemplateUpdate};
use contract_types::{
    CategoryCompleteness, ContractTemplate, Document, DocumentCategory, DocumentEvent,
};

use crate::error::ApiError;
use crate::models::*;
use crate::state::AppState;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

// ============================================================
// Templates
// ============================================================

pub async fn create_template(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewTemplate>,
) -> Result<(StatusCode, Json<ContractTemplate>), ApiError> {
    let template = state.templates.create(req)?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn list_templates(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<TemplateFilter>,
) -> Json<Vec<ContractTemplate>> {
    Json(state.templates.list(filter))
}

pub async fn get_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ContractTemplate>, ApiError> {
    state
        .templates
        .get(&id)
        .map(Json)
        .ok_or(ApiError::TemplateStore(
            contract_core::TemplateStoreError::TemplateNotFound(id),
        ))
}

pub async fn update_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<TemplateUpdate>,
) -> Result<Json<ContractTemplate>, ApiError> {
    Ok(Json(state.templates.update(&id, update)?))
}

pub async fn set_default_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ContractTemplate>, ApiError> {
    Ok(Json(state.templates.set_default(&id)?))
}

/// Live preview: render without validating or persisting anything.
pub async fn preview_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, ApiError> {
    let template = state
        .templates
        .get(&id)
        .ok_or(ApiError::TemplateStore(
            contract_core::TemplateStoreError::TemplateNotFound(id),
        ))?;
    Ok(Json(PreviewResponse {
        rendered: render(&template.content, &req.values),
    }))
}

// ============================================================
// Documents
// ============================================================

pub async fn generate_document(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateDocumentRequest>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    if state.categories.get(&req.category_id).is_none() {
        return Err(ApiError::CategoryNotFound(req.category_id));
    }

    let doc = state.generator.generate(GenerateRequest {
        template_id: req.template_id,
        category_id: req.category_id,
        name: req.name,
        values: req.values,
        signature_required: req.signature_required,
        created_by: req.created_by,
    })?;
    Ok((StatusCode::CREATED, Json(doc)))
}

pub async fn create_new_version(
    State(state): State<Arc<AppState>>,
    Path(lineage_id): Path<String>,
    Json(req): Json<NewVersionRequest>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let doc = state
        .chain
        .create_new_version(&lineage_id, &req.created_by, req.comment)?;
    Ok((StatusCode::CREATED, Json(doc)))
}

pub async fn get_latest(
    State(state): State<Arc<AppState>>,
    Path(lineage_id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    Ok(Json(state.chain.get_latest(&lineage_id)?))
}

pub async fn get_version(
    State(state): State<Arc<AppState>>,
    Path((lineage_id, version)): Path<(String, u32)>,
) -> Result<Json<Document>, ApiError> {
    Ok(Json(state.chain.get_version(&lineage_id, version)?))
}

pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListDocumentsQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.chain.list_by_category(&query.category_id)?))
}

pub async fn transition_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<Document>, ApiError> {
    Ok(Json(state.chain.transition_status(&id, req.status, &req.actor)?))
}

pub async fn lineage_events(
    State(state): State<Arc<AppState>>,
    Path(lineage_id): Path<String>,
) -> Json<Vec<DocumentEvent>> {
    Json(state.chain.events_for(&lineage_id))
}

// ============================================================
// Categories
// ============================================================

pub async fn register_category(
    State(state): State<Arc<AppState>>,
    Json(category): Json<DocumentCategory>,
) -> Result<(StatusCode, Json<DocumentCategory>), ApiError> {
    if state.categories.get(&category.id).is_some() {
        return Err(ApiError::InvalidRequest(format!(
            "category already registered: {}",
            category.id
        )));
    }
    state.categories.register(category.clone());
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoriesQuery>,
) -> Json<Vec<DocumentCategory>> {
    Json(state.categories.list(query.category_type))
}

/// Completeness warnings for the operator: which required categories
/// still have no filed document.
pub async fn category_completeness(
    State(state): State<Arc<AppState>>,
    Path(category_type): Path<contract_types::CategoryType>,
) -> Result<Json<HashMap<String, CategoryCompleteness>>, ApiError> {
    let mut docs_by_category: HashMap<String, Vec<Document>> = HashMap::new();
    for category in state.categories.list(category_type) {
        let docs = state.chain.list_by_category(&category.id)?;
        docs_by_category.insert(category.id, docs);
    }
    Ok(Json(
        state.categories.completeness(category_type, &docs_by_category),
    ))
}
