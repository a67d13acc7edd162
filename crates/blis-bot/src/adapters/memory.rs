//! In-process conversation memory

use async_trait::async_trait;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;
use tokio::sync::RwLock;

use blis::BotMemory;

static ENTITY_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(~?\w+(?:\.\w+)*)").expect("entity reference pattern is valid"));

#[derive(Debug, Default)]
struct MemoryState {
    app_id: Option<String>,
    model_id: Option<String>,
    entity_lookup: HashMap<String, String>,
    entity_values: HashMap<String, String>,
}

/// Memory for a single conversation, held in process
#[derive(Debug, Default)]
pub struct InMemoryBotMemory {
    state: RwLock<MemoryState>,
}

impl InMemoryBotMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the name → id lookup cache
    pub async fn entity_lookup(&self) -> HashMap<String, String> {
        self.state.read().await.entity_lookup.clone()
    }
}

#[async_trait]
impl BotMemory for InMemoryBotMemory {
    async fn app_id(&self) -> Option<String> {
        self.state.read().await.app_id.clone()
    }

    /// Switching applications drops everything tied to the previous one
    async fn set_app_id(&self, app_id: Option<String>) {
        let mut state = self.state.write().await;
        if state.app_id != app_id {
            state.model_id = None;
            state.entity_lookup.clear();
            state.entity_values.clear();
        }
        state.app_id = app_id;
    }

    async fn model_id(&self) -> Option<String> {
        self.state.read().await.model_id.clone()
    }

    async fn set_model_id(&self, model_id: Option<String>) {
        self.state.write().await.model_id = model_id;
    }

    async fn entity_name_to_id(&self, name: &str) -> Option<String> {
        self.state.read().await.entity_lookup.get(name).cloned()
    }

    async fn add_entity_lookup(&self, name: &str, entity_id: &str) {
        self.state
            .write()
            .await
            .entity_lookup
            .insert(name.to_string(), entity_id.to_string());
    }

    async fn remove_entity_lookup(&self, name: &str) {
        self.state.write().await.entity_lookup.remove(name);
    }

    async fn remember_entity(&self, name: &str, value: &str) {
        self.state
            .write()
            .await
            .entity_values
            .insert(name.to_string(), value.to_string());
    }

    async fn forget_entity(&self, name: &str) {
        self.state.write().await.entity_values.remove(name);
    }

    async fn substitute_entities(&self, raw: &str) -> String {
        let state = self.state.read().await;
        ENTITY_REFERENCE
            .replace_all(raw, |caps: &Captures| match state.entity_values.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_substitute_known_and_unknown() {
        let memory = InMemoryBotMemory::new();
        memory.remember_entity("city", "Seattle").await;

        let out = memory.substitute_entities("Weather in $city on $date").await;
        assert_eq!(out, "Weather in Seattle on $date");
    }

    #[tokio::test]
    async fn test_reference_at_end_of_sentence() {
        let memory = InMemoryBotMemory::new();
        memory.remember_entity("city", "Seattle").await;
        memory.remember_entity("~city", "Portland").await;
        memory.remember_entity("trip.city", "Boston").await;

        assert_eq!(
            memory.substitute_entities("Weather in $city.").await,
            "Weather in Seattle."
        );
        assert_eq!(
            memory.substitute_entities("Not $~city, but $trip.city.").await,
            "Not Portland, but Boston."
        );
    }

    #[tokio::test]
    async fn test_forget_entity() {
        let memory = InMemoryBotMemory::new();
        memory.remember_entity("city", "Seattle").await;
        memory.forget_entity("city").await;

        assert_eq!(memory.substitute_entities("$city").await, "$city");
    }

    #[tokio::test]
    async fn test_switching_app_clears_lookup() {
        let memory = InMemoryBotMemory::new();
        memory.set_app_id(Some("app-1".into())).await;
        memory.add_entity_lookup("city", "e-1").await;
        memory.set_model_id(Some("m-1".into())).await;

        memory.set_app_id(Some("app-1".into())).await;
        assert_eq!(memory.entity_name_to_id("city").await.as_deref(), Some("e-1"));

        memory.set_app_id(Some("app-2".into())).await;
        assert_eq!(memory.entity_name_to_id("city").await, None);
        assert_eq!(memory.model_id().await, None);
    }
}
