//! Contract template ownership: codes, flags and the variable schema
//!
//! Templates are edited in place and deactivated rather than deleted
//! once used. The store enforces code uniqueness and keeps at most one
//! default among active templates of the same type; the renderer never
//! sees those flags.

use std::collections::HashMap;
use std::sync::RwLock;

use contract_types::{ContractTemplate, TemplateType, Variable};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq)]
pub enum TemplateStoreError {
    #[error("template code already in use: {0}")]
    DuplicateCode(String),

    #[error("template not found: {0}")]
    TemplateNotFound(String),
}

/// A variable schema as it arrives from callers.
///
/// Older clients transmit the schema as a JSON string rather than a
/// structured list; both shapes are accepted. A string that fails to
/// parse degrades to an empty schema; deliberately lenient, and
/// logged rather than swallowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableSchema {
    Structured(Vec<Variable>),
    Serialized(String),
}

impl VariableSchema {
    pub fn into_variables(self) -> Vec<Variable> {
        let parsed = match self {
            VariableSchema::Structured(vars) => vars,
            VariableSchema::Serialized(raw) => match serde_json::from_str(&raw) {
                Ok(vars) => vars,
                Err(err) => {
                    tracing::warn!(error = %err, "malformed variable schema, using empty schema");
                    Vec::new()
                }
            },
        };
        dedupe_names(parsed)
    }
}

impl Default for VariableSchema {
    fn default() -> Self {
        VariableSchema::Structured(Vec::new())
    }
}

impl From<Vec<Variable>> for VariableSchema {
    fn from(vars: Vec<Variable>) -> Self {
        VariableSchema::Structured(vars)
    }
}

/// Variable names must be unique within one schema; keep the first
/// declaration of each name.
fn dedupe_names(vars: Vec<Variable>) -> Vec<Variable> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(vars.len());
    for var in vars {
        if seen.insert(var.name.clone()) {
            out.push(var);
        } else {
            tracing::warn!(name = %var.name, "duplicate variable name in schema, keeping first");
        }
    }
    out
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTemplate {
    pub code: String,
    pub name: String,
    pub template_type: TemplateType,
    pub content: String,
    #[serde(default)]
    pub variables: VariableSchema,
    pub version: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_default: bool,
}

fn default_true() -> bool {
    true
}

/// Partial edit applied to an existing template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateUpdate {
    pub code: Option<String>,
    pub name: Option<String>,
    pub content: Option<String>,
    pub variables: Option<VariableSchema>,
    pub version: Option<String>,
    pub is_active: Option<bool>,
    pub is_default: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TemplateFilter {
    pub is_active: Option<bool>,
    pub template_type: Option<TemplateType>,
}

/// In-memory template store.
#[derive(Debug, Default)]
pub struct TemplateStore {
    inner: RwLock<HashMap<String, ContractTemplate>>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, req: NewTemplate) -> Result<ContractTemplate, TemplateStoreError> {
        let code = req.code.trim().to_uppercase();
        let mut templates = self.inner.write().expect("template store lock poisoned");

        if templates.values().any(|t| t.code == code) {
            return Err(TemplateStoreError::DuplicateCode(code));
        }

        let template = ContractTemplate {
            id: Uuid::new_v4().to_string(),
            code,
            name: req.name,
            template_type: req.template_type,
            content: req.content,
            variables: req.variables.into_variables(),
            version: req.version,
            is_active: req.is_active,
            is_default: req.is_default,
        };

        if template.is_default && template.is_active {
            demote_other_defaults(&mut templates, template.template_type, &template.id);
        }

        tracing::info!(code = %template.code, id = %template.id, "created template");
        templates.insert(template.id.clone(), template.clone());
        Ok(template)
    }

    pub fn update(
        &self,
        id: &str,
        update: TemplateUpdate,
    ) -> Result<ContractTemplate, TemplateStoreError> {
        let mut templates = self.inner.write().expect("template store lock poisoned");

        if let Some(new_code) = &update.code {
            let new_code = new_code.trim().to_uppercase();
            if templates
                .values()
                .any(|t| t.id != id && t.code == new_code)
            {
                return Err(TemplateStoreError::DuplicateCode(new_code));
            }
        }

        let template = templates
            .get_mut(id)
            .ok_or_else(|| TemplateStoreError::TemplateNotFound(id.to_string()))?;

        if let Some(code) = update.code {
            template.code = code.trim().to_uppercase();
        }
        if let Some(name) = update.name {
            template.name = name;
        }
        if let Some(content) = update.content {
            template.content = content;
        }
        if let Some(variables) = update.variables {
            template.variables = variables.into_variables();
        }
        if let Some(version) = update.version {
            template.version = version;
        }
        if let Some(is_active) = update.is_active {
            template.is_active = is_active;
        }
        if let Some(is_default) = update.is_default {
            template.is_default = is_default;
        }

        let updated = template.clone();
        if updated.is_default && updated.is_active {
            demote_other_defaults(&mut templates, updated.template_type, &updated.id);
        }

        Ok(updated)
    }

    pub fn get(&self, id: &str) -> Option<ContractTemplate> {
        self.inner
            .read()
            .expect("template store lock poisoned")
            .get(id)
            .cloned()
    }

    pub fn list(&self, filter: TemplateFilter) -> Vec<ContractTemplate> {
        let templates = self.inner.read().expect("template store lock poisoned");
        let mut out: Vec<ContractTemplate> = templates
            .values()
            .filter(|t| filter.is_active.map_or(true, |a| t.is_active == a))
            .filter(|t| {
                filter
                    .template_type
                    .map_or(true, |ty| t.template_type == ty)
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| a.code.cmp(&b.code));
        out
    }

    /// Make `id` the default for its template type, clearing the flag
    /// on the current default in the same write.
    pub fn set_default(&self, id: &str) -> Result<ContractTemplate, TemplateStoreError> {
        let mut templates = self.inner.write().expect("template store lock poisoned");

        let template_type = templates
            .get(id)
            .map(|t| t.template_type)
            .ok_or_else(|| TemplateStoreError::TemplateNotFound(id.to_string()))?;

        demote_other_defaults(&mut templates, template_type, id);

        let template = templates.get_mut(id).expect("checked above");
        template.is_default = true;
        Ok(template.clone())
    }
}

fn demote_other_defaults(
    templates: &mut HashMap<String, ContractTemplate>,
    template_type: TemplateType,
    keep_id: &str,
) {
    for t in templates.values_mut() {
        if t.id != keep_id && t.template_type == template_type && t.is_default {
            t.is_default = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contract_types::VariableType;
    use pretty_assertions::assert_eq;

    fn new_template(code: &str, template_type: TemplateType) -> NewTemplate {
        NewTemplate {
            code: code.to_string(),
            name: format!("{} template", code),
            template_type,
            content: "Bên thuê: {{tenant_name}}".to_string(),
            variables: vec![Variable {
                name: "tenant_name".to_string(),
                var_type: VariableType::Text,
                required: true,
                description: Some("Tenant legal name".to_string()),
            }]
            .into(),
            version: "1.0".to_string(),
            is_active: true,
            is_default: false,
        }
    }

    #[test]
    fn test_create_uppercases_code() {
        let store = TemplateStore::new();
        let t = store
            .create(new_template("wh-rental", TemplateType::WarehouseRental))
            .unwrap();
        assert_eq!(t.code, "WH-RENTAL");
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let store = TemplateStore::new();
        store
            .create(new_template("WH-RENTAL", TemplateType::WarehouseRental))
            .unwrap();

        let err = store
            .create(new_template("wh-rental", TemplateType::Amendment))
            .unwrap_err();
        assert_eq!(err, TemplateStoreError::DuplicateCode("WH-RENTAL".to_string()));
    }

    #[test]
    fn test_update_duplicate_code_rejected() {
        let store = TemplateStore::new();
        store
            .create(new_template("A", TemplateType::WarehouseRental))
            .unwrap();
        let b = store
            .create(new_template("B", TemplateType::WarehouseRental))
            .unwrap();

        let err = store
            .update(
                &b.id,
                TemplateUpdate {
                    code: Some("a".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, TemplateStoreError::DuplicateCode(_)));
    }

    #[test]
    fn test_update_missing_template() {
        let store = TemplateStore::new();
        let err = store.update("nope", TemplateUpdate::default()).unwrap_err();
        assert_eq!(err, TemplateStoreError::TemplateNotFound("nope".to_string()));
    }

    #[test]
    fn test_set_default_demotes_previous() {
        let store = TemplateStore::new();
        let a = store
            .create(new_template("A", TemplateType::WarehouseRental))
            .unwrap();
        let b = store
            .create(new_template("B", TemplateType::WarehouseRental))
            .unwrap();
        // Different type keeps its own default independently.
        let c = store
            .create(new_template("C", TemplateType::ServiceAgreement))
            .unwrap();
        store.set_default(&c.id).unwrap();

        store.set_default(&a.id).unwrap();
        store.set_default(&b.id).unwrap();

        assert!(!store.get(&a.id).unwrap().is_default);
        assert!(store.get(&b.id).unwrap().is_default);
        assert!(store.get(&c.id).unwrap().is_default);

        let defaults: Vec<_> = store
            .list(TemplateFilter {
                is_active: Some(true),
                template_type: Some(TemplateType::WarehouseRental),
            })
            .into_iter()
            .filter(|t| t.is_default)
            .collect();
        assert_eq!(defaults.len(), 1);
    }

    #[test]
    fn test_create_with_default_flag_demotes_existing() {
        let store = TemplateStore::new();
        let mut first = new_template("A", TemplateType::Amendment);
        first.is_default = true;
        let a = store.create(first).unwrap();

        let mut second = new_template("B", TemplateType::Amendment);
        second.is_default = true;
        let b = store.create(second).unwrap();

        assert!(!store.get(&a.id).unwrap().is_default);
        assert!(store.get(&b.id).unwrap().is_default);
    }

    #[test]
    fn test_list_filters() {
        let store = TemplateStore::new();
        store
            .create(new_template("A", TemplateType::WarehouseRental))
            .unwrap();
        let b = store
            .create(new_template("B", TemplateType::ServiceAgreement))
            .unwrap();
        store
            .update(
                &b.id,
                TemplateUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(store.list(TemplateFilter::default()).len(), 2);
        assert_eq!(
            store
                .list(TemplateFilter {
                    is_active: Some(true),
                    template_type: None,
                })
                .len(),
            1
        );
        assert_eq!(
            store
                .list(TemplateFilter {
                    is_active: None,
                    template_type: Some(TemplateType::ServiceAgreement),
                })
                .len(),
            1
        );
    }

    #[test]
    fn test_serialized_schema_parses() {
        let schema = VariableSchema::Serialized(
            r#"[{"name":"rent","type":"currency","required":true}]"#.to_string(),
        );
        let vars = schema.into_variables();
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].name, "rent");
        assert_eq!(vars[0].var_type, VariableType::Currency);
    }

    #[test]
    fn test_malformed_schema_degrades_to_empty() {
        let schema = VariableSchema::Serialized("{not json".to_string());
        assert!(schema.into_variables().is_empty());
    }

    #[test]
    fn test_duplicate_variable_names_deduped() {
        let schema = VariableSchema::Serialized(
            r#"[
                {"name":"rent","type":"currency","required":true},
                {"name":"rent","type":"text"}
            ]"#
            .to_string(),
        );
        let vars = schema.into_variables();
        assert_eq!(vars.len(), 1);
        assert!(vars[0].required);
    }

    #[test]
    fn test_untagged_deserialization_accepts_both_shapes() {
        let structured: VariableSchema =
            serde_json::from_str(r#"[{"name":"a","type":"text"}]"#).unwrap();
        assert_eq!(structured.into_variables().len(), 1);

        let serialized: VariableSchema =
            serde_json::from_str(r#""[{\"name\":\"a\",\"type\":\"text\"}]""#).unwrap();
        assert_eq!(serialized.into_variables().len(), 1);
    }
}
