//! Dialog Service Port
//!
//! Abstract interface for the remote store that owns entities, actions and
//! trained models for an application.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, Entity, EntityMetadata, EntityType};

/// Remote entity/action/model store
///
/// Every call is a suspension point; callers issue them one at a time and in
/// the order their invariants require.
#[async_trait]
pub trait BlisClient: Send + Sync {
    /// Create an entity, returning the id assigned by the store
    async fn add_entity(
        &self,
        app_id: &str,
        name: &str,
        entity_type: EntityType,
        prebuilt: Option<&str>,
        metadata: &EntityMetadata,
    ) -> Result<String, DomainError>;

    /// Replace name, prebuilt and metadata of an entity.
    ///
    /// `entity_type` is `None` to leave the stored type unchanged.
    async fn edit_entity(
        &self,
        app_id: &str,
        entity_id: &str,
        name: &str,
        entity_type: Option<EntityType>,
        prebuilt: Option<&str>,
        metadata: &EntityMetadata,
    ) -> Result<(), DomainError>;

    async fn delete_entity(&self, app_id: &str, entity_id: &str) -> Result<(), DomainError>;

    async fn get_entity(&self, app_id: &str, entity_id: &str) -> Result<Entity, DomainError>;

    /// Ids of every entity in the application
    async fn get_entities(&self, app_id: &str) -> Result<Vec<String>, DomainError>;

    /// Full application content (entities, actions, ...) as a JSON tree
    async fn export_app(&self, app_id: &str) -> Result<serde_json::Value, DomainError>;

    /// Train a model for the application, returning its id
    async fn train_model(&self, app_id: &str) -> Result<String, DomainError>;
}
