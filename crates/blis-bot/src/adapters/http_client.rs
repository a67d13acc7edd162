//! HTTP Dialog Service Client
//!
//! Talks to the remote dialog service using reqwest.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use urlencoding::encode;

use blis::{BlisClient, DomainError, Entity, EntityMetadata, EntityType};

/// Connection settings for the dialog service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    pub user: String,
    pub secret: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl ServiceConfig {
    pub fn new(
        base_url: impl Into<String>,
        user: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            user: user.into(),
            secret: secret.into(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// reqwest implementation of BlisClient
pub struct HttpBlisClient {
    client: Client,
    base_url: String,
    user: String,
    secret: String,
}

// ============================================
// Wire Types
// ============================================

#[derive(Serialize)]
struct EntityRequest<'a> {
    name: &'a str,
    #[serde(rename = "EntityType", skip_serializing_if = "Option::is_none")]
    entity_type: Option<EntityType>,
    #[serde(rename = "LUISPreName")]
    luis_pre_name: Option<&'a str>,
    metadata: &'a EntityMetadata,
}

#[derive(Deserialize)]
struct EntityIdResponse {
    #[serde(rename = "entityId")]
    entity_id: String,
}

#[derive(Deserialize)]
struct EntityIdsResponse {
    ids: Vec<String>,
}

#[derive(Deserialize)]
struct ModelIdResponse {
    #[serde(rename = "modelId")]
    model_id: String,
}

impl HttpBlisClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("blis-bot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                DomainError::ExternalService(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user: config.user.clone(),
            secret: config.secret.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn entities_path(app_id: &str) -> String {
        format!("app/{}/entity", encode(app_id))
    }

    fn entity_path(app_id: &str, entity_id: &str) -> String {
        format!("app/{}/entity/{}", encode(app_id), encode(entity_id))
    }

    /// Send with credentials; non-2xx statuses become errors carrying the body
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, DomainError> {
        let resp = request
            .basic_auth(&self.user, Some(&self.secret))
            .send()
            .await
            .map_err(|e| {
                DomainError::ExternalService(format!("Failed to connect to dialog service: {e}"))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::ExternalService(format!(
                "API error ({status}): {body}"
            )));
        }

        Ok(resp)
    }

    async fn parse<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, DomainError> {
        resp.json()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl BlisClient for HttpBlisClient {
    async fn add_entity(
        &self,
        app_id: &str,
        name: &str,
        entity_type: EntityType,
        prebuilt: Option<&str>,
        metadata: &EntityMetadata,
    ) -> Result<String, DomainError> {
        let path = Self::entities_path(app_id);
        tracing::debug!(method = "POST", path = %path, "Dialog service request");

        let body = EntityRequest {
            name,
            entity_type: Some(entity_type),
            luis_pre_name: prebuilt,
            metadata,
        };
        let resp = self.send(self.client.post(self.url(&path)).json(&body)).await?;
        let created: EntityIdResponse = Self::parse(resp).await?;
        Ok(created.entity_id)
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
        let path = Self::entity_path(app_id, entity_id);
        tracing::debug!(method = "PUT", path = %path, "Dialog service request");

        let body = EntityRequest {
            name,
            entity_type,
            luis_pre_name: prebuilt,
            metadata,
        };
        self.send(self.client.put(self.url(&path)).json(&body)).await?;
        Ok(())
    }

    async fn delete_entity(&self, app_id: &str, entity_id: &str) -> Result<(), DomainError> {
        let path = Self::entity_path(app_id, entity_id);
        tracing::debug!(method = "DELETE", path = %path, "Dialog service request");

        self.send(self.client.delete(self.url(&path))).await?;
        Ok(())
    }

    async fn get_entity(&self, app_id: &str, entity_id: &str) -> Result<Entity, DomainError> {
        let path = Self::entity_path(app_id, entity_id);
        tracing::debug!(method = "GET", path = %path, "Dialog service request");

        let resp = self.send(self.client.get(self.url(&path))).await?;
        Self::parse(resp).await
    }

    async fn get_entities(&self, app_id: &str) -> Result<Vec<String>, DomainError> {
        let path = Self::entities_path(app_id);
        tracing::debug!(method = "GET", path = %path, "Dialog service request");

        let resp = self.send(self.client.get(self.url(&path))).await?;
        let list: EntityIdsResponse = Self::parse(resp).await?;
        Ok(list.ids)
    }

    async fn export_app(&self, app_id: &str) -> Result<serde_json::Value, DomainError> {
        let path = format!("app/{}/source", encode(app_id));
        tracing::debug!(method = "GET", path = %path, "Dialog service request");

        let resp = self.send(self.client.get(self.url(&path))).await?;
        Self::parse(resp).await
    }

    async fn train_model(&self, app_id: &str) -> Result<String, DomainError> {
        let path = format!("app/{}/model", encode(app_id));
        tracing::debug!(method = "PUT", path = %path, "Dialog service request");

        let resp = self.send(self.client.put(self.url(&path))).await?;
        let model: ModelIdResponse = Self::parse(resp).await?;
        Ok(model.model_id)
    }
}
