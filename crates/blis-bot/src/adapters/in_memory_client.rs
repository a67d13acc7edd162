//! In-process dialog service
//!
//! Offline stand-in for the remote store: keeps entities and action content
//! per application in memory.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use blis::{BlisClient, DomainError, Entity, EntityMetadata, EntityType};

#[derive(Debug, Default)]
struct AppContent {
    /// In creation order
    entities: Vec<Entity>,
    actions: Vec<Value>,
    models_trained: usize,
}

impl AppContent {
    fn entity_mut(&mut self, entity_id: &str) -> Result<&mut Entity, DomainError> {
        self.entities
            .iter_mut()
            .find(|e| e.id == entity_id)
            .ok_or_else(|| DomainError::not_found("Entity", entity_id))
    }
}

/// Dialog service held in process
#[derive(Debug, Default)]
pub struct InMemoryBlisClient {
    apps: RwLock<HashMap<String, AppContent>>,
}

impl InMemoryBlisClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add raw action content to an application.
    ///
    /// Actions are opaque here; they show up in exports and make the
    /// application trainable.
    pub async fn add_action(&self, app_id: &str, action: Value) {
        self.apps
            .write()
            .await
            .entry(app_id.to_string())
            .or_default()
            .actions
            .push(action);
    }

    /// Number of entities currently stored for an application
    pub async fn entity_count(&self, app_id: &str) -> usize {
        self.apps
            .read()
            .await
            .get(app_id)
            .map_or(0, |app| app.entities.len())
    }
}

#[async_trait]
impl BlisClient for InMemoryBlisClient {
    async fn add_entity(
        &self,
        app_id: &str,
        name: &str,
        entity_type: EntityType,
        prebuilt: Option<&str>,
        metadata: &EntityMetadata,
    ) -> Result<String, DomainError> {
        let mut apps = self.apps.write().await;
        let app = apps.entry(app_id.to_string()).or_default();

        if app.entities.iter().any(|e| e.name == name) {
            return Err(DomainError::Conflict(format!(
                "An entity named \"{name}\" already exists"
            )));
        }

        let entity_id = Uuid::new_v4().to_string();
        app.entities.push(Entity::new(
            entity_id.clone(),
            name,
            entity_type,
            prebuilt.map(str::to_string),
            metadata.clone(),
        ));
        Ok(entity_id)
    }

    async fn edit_entity(
        &self,
        app_id: &str,
        entity_id: &str,
        name: &str,
        entity_type: Option<EntityType>,
        prebuilt: Option<&str>,
        metadata: &EntityMetadata,
    ) -> Result<(), DomainError> {
        let mut apps = self.apps.write().await;
        let app = apps
            .get_mut(app_id)
            .ok_or_else(|| DomainError::not_found("App", app_id))?;

        let entity = app.entity_mut(entity_id)?;
        entity.name = name.to_string();
        if let Some(entity_type) = entity_type {
            entity.entity_type = entity_type;
        }
        entity.luis_pre_name = prebuilt.map(str::to_string);
        entity.metadata = metadata.clone();
        Ok(())
    }

    async fn delete_entity(&self, app_id: &str, entity_id: &str) -> Result<(), DomainError> {
        let mut apps = self.apps.write().await;
        let app = apps
            .get_mut(app_id)
            .ok_or_else(|| DomainError::not_found("App", app_id))?;

        let before = app.entities.len();
        app.entities.retain(|e| e.id != entity_id);
        if app.entities.len() == before {
            return Err(DomainError::not_found("Entity", entity_id));
        }
        Ok(())
    }

    async fn get_entity(&self, app_id: &str, entity_id: &str) -> Result<Entity, DomainError> {
        self.apps
            .read()
            .await
            .get(app_id)
            .and_then(|app| app.entities.iter().find(|e| e.id == entity_id))
            .cloned()
            .ok_or_else(|| DomainError::not_found("Entity", entity_id))
    }

    async fn get_entities(&self, app_id: &str) -> Result<Vec<String>, DomainError> {
        Ok(self
            .apps
            .read()
            .await
            .get(app_id)
            .map(|app| app.entities.iter().map(|e| e.id.clone()).collect())
            .unwrap_or_default())
    }

    async fn export_app(&self, app_id: &str) -> Result<Value, DomainError> {
        let apps = self.apps.read().await;
        let Some(app) = apps.get(app_id) else {
            return Ok(json!({ "entities": [], "actions": [] }));
        };
        let entities = serde_json::to_value(&app.entities)
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;
        Ok(json!({ "entities": entities, "actions": app.actions }))
    }

    /// Fails while the application has no actions to learn from
    async fn train_model(&self, app_id: &str) -> Result<String, DomainError> {
        let mut apps = self.apps.write().await;
        let app = apps.entry(app_id.to_string()).or_default();
        if app.actions.is_empty() {
            return Err(DomainError::Validation(
                "Application has no actions to train on".to_string(),
            ));
        }
        app.models_trained += 1;
        Ok(format!("{app_id}-model-{}", app.models_trained))
    }
}
