//! Contract document generation and version control core
//!
//! This crate turns reusable contract templates with `{{name}}`
//! placeholders into concrete documents bound to a customer/contract,
//! and maintains the version lineage and category bookkeeping for the
//! generated documents:
//!
//! - [`schema`]: variable schema validation and value normalization
//! - [`render`]: flat placeholder substitution, usable standalone
//! - [`template_store`]: `ContractTemplate` ownership and default flags
//! - [`category`]: document categories and completeness reporting
//! - [`storage`]: persistence contract with atomic latest-swap
//! - [`chain`]: document version lineages and the status workflow
//! - [`generate`]: the single entry point producing a first version

pub mod category;
pub mod chain;
pub mod generate;
pub mod render;
pub mod schema;
pub mod storage;
pub mod template_store;

pub use category::CategoryRegistry;
pub use chain::{ChainError, DocumentVersionChain, FirstVersion};
pub use generate::{GenerateRequest, GenerationError, GenerationService};
pub use render::render;
pub use schema::{validate_values, NormalizedValues, ValidationIssue};
pub use storage::{DocumentStorage, MemoryDocumentStorage, StorageError};
pub use template_store::{
    NewTemplate, TemplateFilter, TemplateStore, TemplateStoreError, TemplateUpdate, VariableSchema,
};
