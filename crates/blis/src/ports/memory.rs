//! Conversation Memory Port
//!
//! Per-conversation state: the loaded application, the current model, the
//! entity name → id lookup cache and remembered entity values.

use async_trait::async_trait;

/// Conversation memory
///
/// The lookup cache mirrors the remote store and is never persisted on its
/// own; listing entities rebuilds it.
#[async_trait]
pub trait BotMemory: Send + Sync {
    /// Application the conversation is working on, if one is loaded
    async fn app_id(&self) -> Option<String>;

    async fn set_app_id(&self, app_id: Option<String>);

    async fn model_id(&self) -> Option<String>;

    async fn set_model_id(&self, model_id: Option<String>);

    /// Resolve an entity display name to its id
    async fn entity_name_to_id(&self, name: &str) -> Option<String>;

    async fn add_entity_lookup(&self, name: &str, entity_id: &str);

    async fn remove_entity_lookup(&self, name: &str);

    /// Remember the current value of entity `name`
    async fn remember_entity(&self, name: &str, value: &str);

    async fn forget_entity(&self, name: &str);

    /// Expand `$name` references in `raw` with remembered entity values.
    ///
    /// References to entities without a value are left as written.
    async fn substitute_entities(&self, raw: &str) -> String;
}
