//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! the dialog service, conversation memory and the template directory.

mod entity_service;
mod placeholders;
mod template_renderer;
mod template_store;

pub use entity_service::EntityService;
pub use placeholders::{placeholder_names, replace_placeholder};
pub use template_renderer::TemplateRenderer;
pub use template_store::{TemplateStore, TEMPLATE_EXTENSION};

use blis::DomainError;

/// Log an error and return the text shown to the user
pub fn report_error(error: &DomainError) -> String {
    let text = error.to_string();
    tracing::error!(error = %text, "ERROR");
    text
}
