//! Template Renderer
//!
//! Materializes a template's placeholders from an action payload's arguments.

use serde_json::Value;

use blis::{ActionPayload, BotMemory, DomainError};

use super::placeholders::{placeholder_names, replace_placeholder};
use super::template_store::TemplateStore;

/// Renders templates loaded fresh from a [`TemplateStore`]
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    store: TemplateStore,
}

impl TemplateRenderer {
    pub fn new(store: TemplateStore) -> Self {
        Self { store }
    }

    /// Substitute every placeholder that has a matching argument.
    ///
    /// Argument values are expanded through `memory` first. Placeholders
    /// without an argument stay in the output as written.
    pub async fn render<M>(&self, action: &ActionPayload, memory: &M) -> Result<Value, DomainError>
    where
        M: BotMemory + ?Sized,
    {
        let template = self.store.template(&action.payload)?;
        let mut text = template.to_string();

        for name in placeholder_names(&text) {
            let Some(argument) = action.argument(&name) else {
                continue;
            };
            let value = memory.substitute_entities(&argument.value).await;
            text = replace_placeholder(&text, &name, &json_escape(&value));
        }

        tracing::debug!(template = %action.payload, "Rendered template");

        serde_json::from_str(&text).map_err(|e| DomainError::template(&action.payload, e))
    }
}

/// `value` escaped for use inside a JSON string literal
fn json_escape(value: &str) -> String {
    let quoted = Value::String(value.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}
