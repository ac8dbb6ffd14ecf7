//! Document category registry and completeness reporting

use std::collections::HashMap;
use std::sync::RwLock;

use contract_types::{CategoryCompleteness, CategoryType, Document, DocumentCategory};

/// Registry of the categories documents are filed under.
///
/// Categories are effectively immutable once documents reference them;
/// only display metadata may change.
#[derive(Debug, Default)]
pub struct CategoryRegistry {
    inner: RwLock<HashMap<String, DocumentCategory>>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, category: DocumentCategory) {
        tracing::debug!(code = %category.code, "registered document category");
        self.inner
            .write()
            .expect("category registry lock poisoned")
            .insert(category.id.clone(), category);
    }

    pub fn get(&self, category_id: &str) -> Option<DocumentCategory> {
        self.inner
            .read()
            .expect("category registry lock poisoned")
            .get(category_id)
            .cloned()
    }

    /// The only mutation allowed after registration.
    pub fn update_display(&self, category_id: &str, name: String, sort_order: i32) -> bool {
        let mut categories = self.inner.write().expect("category registry lock poisoned");
        match categories.get_mut(category_id) {
            Some(category) => {
                category.name = name;
                category.sort_order = sort_order;
                true
            }
            None => false,
        }
    }

    /// Categories for one resource kind, in display order.
    pub fn list(&self, category_type: CategoryType) -> Vec<DocumentCategory> {
        let categories = self.inner.read().expect("category registry lock poisoned");
        let mut out: Vec<DocumentCategory> = categories
            .values()
            .filter(|c| c.category_type == category_type)
            .cloned()
            .collect();
        out.sort_by_key(|c| c.sort_order);
        out
    }

    pub fn is_required(&self, category_id: &str) -> Option<bool> {
        self.get(category_id).map(|c| c.is_required)
    }

    /// Per-category completeness for a resource's documents.
    ///
    /// Every registered category of the type appears in the result, so
    /// a required category with zero documents shows up unsatisfied
    /// instead of being silently absent.
    pub fn completeness(
        &self,
        category_type: CategoryType,
        docs_by_category: &HashMap<String, Vec<Document>>,
    ) -> HashMap<String, CategoryCompleteness> {
        self.list(category_type)
            .into_iter()
            .map(|category| {
                let count = docs_by_category
                    .get(&category.id)
                    .map_or(0, |docs| docs.len());
                (
                    category.id,
                    CategoryCompleteness {
                        required: category.is_required,
                        satisfied: count > 0 || !category.is_required,
                        count,
                    },
                )
            })
            .collect()
    }
}
