//! Generation service: template + values -> first document version
//!
//! The single entry point for producing a document from a template.
//! Validation gates persistence: a render alone degrades missing
//! values to visible placeholders, but generation refuses to persist a
//! document whose required variables are unset.

use std::collections::HashMap;
use std::sync::Arc;

use contract_types::Document;
use thiserror::Error;

use crate::chain::{ChainError, DocumentVersionChain, FirstVersion};
use crate::render::render;
use crate::schema::{validate_values, ValidationIssue};
use crate::template_store::TemplateStore;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("template is inactive: {0}")]
    TemplateInactive(String),

    #[error("validation failed with {} issue(s)", .0.len())]
    ValidationFailed(Vec<ValidationIssue>),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub template_id: String,
    pub category_id: String,
    /// Document name, derived by the caller.
    pub name: String,
    pub values: HashMap<String, String>,
    pub signature_required: bool,
    pub created_by: String,
}

pub struct GenerationService {
    templates: Arc<TemplateStore>,
    chain: Arc<DocumentVersionChain>,
}

impl GenerationService {
    pub fn new(templates: Arc<TemplateStore>, chain: Arc<DocumentVersionChain>) -> Self {
        Self { templates, chain }
    }

    /// Render a template with the supplied values and register the
    /// result as version 1 of a new lineage.
    ///
    /// All-or-nothing: validation errors mean no document is created.
    /// The template itself is never mutated.
    pub fn generate(&self, req: GenerateRequest) -> Result<Document, GenerationError> {
        let template = self
            .templates
            .get(&req.template_id)
            .ok_or_else(|| GenerationError::TemplateNotFound(req.template_id.clone()))?;
        if !template.is_active {
            return Err(GenerationError::TemplateInactive(template.code));
        }

        let normalized = validate_values(&template.variables, &req.values)
            .map_err(GenerationError::ValidationFailed)?;
        for warning in &normalized.warnings {
            tracing::warn!(template = %template.code, "advisory: {}", warning);
        }

        let content = render(&template.content, &normalized.values);

        let doc = self.chain.create_first_version(FirstVersion {
            category_id: req.category_id,
            name: req.name,
            content,
            variables_snapshot: normalized.values,
            signature_required: req.signature_required,
            created_by: req.created_by,
            template_code: Some(template.code.clone()),
        })?;

        tracing::info!(template = %template.code, document = %doc.id, "generated document");
        Ok(doc)
    }
}
