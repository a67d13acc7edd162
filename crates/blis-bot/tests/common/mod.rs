//! Shared fixtures for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use blis::{BlisClient, BotMemory, DomainError, Entity, EntityMetadata, EntityType};
use blis_bot::adapters::{InMemoryBlisClient, InMemoryBotMemory};
use blis_bot::application::EntityService;

pub const APP_ID: &str = "test-app";

/// Dialog service that records every call before delegating
#[derive(Default)]
pub struct RecordingClient {
    pub inner: InMemoryBlisClient,
    calls: Mutex<Vec<String>>,
}

impl RecordingClient {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl BlisClient for RecordingClient {
    async fn add_entity(
        &self,
        app_id: &str,
        name: &str,
        entity_type: EntityType,
        prebuilt: Option<&str>,
        metadata: &EntityMetadata,
    ) -> Result<String, DomainError> {
        self.record(format!("add {name}"));
        self.inner
            .add_entity(app_id, name, entity_type, prebuilt, metadata)
            .await
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
        self.record(format!("edit {name}"));
        self.inner
            .edit_entity(app_id, entity_id, name, entity_type, prebuilt, metadata)
            .await
    }

    async fn delete_entity(&self, app_id: &str, entity_id: &str) -> Result<(), DomainError> {
        self.record(format!("delete {entity_id}"));
        self.inner.delete_entity(app_id, entity_id).await
    }

    async fn get_entity(&self, app_id: &str, entity_id: &str) -> Result<Entity, DomainError> {
        self.record(format!("get {entity_id}"));
        self.inner.get_entity(app_id, entity_id).await
    }

    async fn get_entities(&self, app_id: &str) -> Result<Vec<String>, DomainError> {
        self.record("list".to_string());
        self.inner.get_entities(app_id).await
    }

    async fn export_app(&self, app_id: &str) -> Result<Value, DomainError> {
        self.record("export".to_string());
        self.inner.export_app(app_id).await
    }

    async fn train_model(&self, app_id: &str) -> Result<String, DomainError> {
        self.record("train".to_string());
        self.inner.train_model(app_id).await
    }
}

pub struct Fixture {
    pub client: Arc<RecordingClient>,
    pub memory: Arc<InMemoryBotMemory>,
    pub service: EntityService<RecordingClient, InMemoryBotMemory>,
}

/// Entity service with an app already loaded
pub async fn fixture() -> Fixture {
    let client = Arc::new(RecordingClient::default());
    let memory = Arc::new(InMemoryBotMemory::new());
    memory.set_app_id(Some(APP_ID.to_string())).await;
    let service = EntityService::new(Arc::clone(&client), Arc::clone(&memory));
    Fixture {
        client,
        memory,
        service,
    }
}

/// Every entity stored for the test app
pub async fn stored_entities(client: &RecordingClient) -> Vec<Entity> {
    let mut entities = Vec::new();
    for id in client.inner.get_entities(APP_ID).await.unwrap() {
        entities.push(client.inner.get_entity(APP_ID, &id).await.unwrap());
    }
    entities
}
