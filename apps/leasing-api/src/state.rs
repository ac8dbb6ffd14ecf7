//! Application state for the leasing API

use std::sync::Arc;

use contract_core::{
    CategoryRegistry, DocumentVersionChain, GenerationService, MemoryDocumentStorage,
    TemplateStore,
};
use contract_types::{CategoryType, DocumentCategory};

pub struct AppState {
    pub templates: Arc<TemplateStore>,
    pub categories: Arc<CategoryRegistry>,
    pub chain: Arc<DocumentVersionChain>,
    pub generator: GenerationService,
}

impl AppState {
    pub fn new() -> Self {
        let templates = Arc::new(TemplateStore::new());
        let categories = Arc::new(CategoryRegistry::new());
        let chain = Arc::new(DocumentVersionChain::new(Arc::new(
            MemoryDocumentStorage::new(),
        )));
        let generator = GenerationService::new(templates.clone(), chain.clone());

        seed_categories(&categories);

        Self {
            templates,
            categories,
            chain,
            generator,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Standard contract categories every deployment starts with; further
/// categories are registered over the API.
fn seed_categories(registry: &CategoryRegistry) {
    let seeds = [
        ("main_contract", "Main contract", true, 1),
        ("appendix", "Contract appendix", false, 2),
        ("technical_drawing", "Technical drawing", false, 3),
        ("handover_report", "Handover report", true, 4),
    ];
    for (id, name, is_required, sort_order) in seeds {
        registry.register(DocumentCategory {
            id: id.to_string(),
            code: id.to_uppercase(),
            name: name.to_string(),
            category_type: CategoryType::Contract,
            is_required,
            sort_order,
        });
    }
    tracing::info!("seeded {} contract categories", seeds.len());
}
