//! Entity Application Service (Use Case)
//!
//! Keeps the dialog service's entities and the conversation's name → id
//! lookup cache consistent, and maintains positive/negative entity pairs.
//!
//! Every public operation returns the responses for the user exactly once.
//! Dialog service failures are logged and returned as a single text response.

use std::sync::Arc;

use blis::{
    describe, is_negative_name, negative_name, BlisClient, BotMemory, Button, DomainError,
    Entity, EntityInput, EntityMetadata, EntityType, HeroCard, Response,
};

use super::report_error;
use crate::commands;

const ENTITY_ADDED: &str = "Entity Added";
const ENTITY_EDITED: &str = "Entity Edited";
const ENTITY_DELETED: &str = "Entity Deleted";

/// Application service for entity operations
pub struct EntityService<C: ?Sized, M: ?Sized> {
    client: Arc<C>,
    memory: Arc<M>,
}

impl<C, M> EntityService<C, M>
where
    C: BlisClient + ?Sized,
    M: BotMemory + ?Sized,
{
    pub fn new(client: Arc<C>, memory: Arc<M>) -> Self {
        Self { client, memory }
    }

    /// Add a new entity, or edit `entity_id` when given.
    ///
    /// `user_input` carries the name plus optional `~` (negatable), `#`
    /// (bucket) markers and a `// task` suffix. `entity_type` is LOCAL, LUIS
    /// or a prebuilt name; it is ignored on edit.
    pub async fn add_or_edit(
        &self,
        entity_id: Option<&str>,
        entity_type: Option<&str>,
        user_input: &str,
    ) -> Vec<Response> {
        tracing::debug!(input = %user_input, "Trying to add entity");

        let Some(app_id) = self.memory.app_id().await else {
            return vec![no_app_response()];
        };

        let input = EntityInput::parse(user_input);
        if input.content.is_empty() {
            return vec![Response::text(
                "You must provide an entity name for the entity to create.",
            )];
        }

        let task_id = match &input.task {
            Some(task) => match self.memory.entity_name_to_id(task).await {
                Some(id) => Some(id),
                None => return vec![Response::text(format!("Task {task} not found."))],
            },
            None => None,
        };

        let result = match entity_id.filter(|id| !id.is_empty()) {
            Some(entity_id) => self.edit(&app_id, entity_id, &input, task_id).await,
            None => {
                let (kind, prebuilt) = entity_type
                    .map(EntityType::resolve)
                    .unwrap_or((EntityType::Luis, None));
                self.add(&app_id, kind, prebuilt.as_deref(), &input, task_id)
                    .await
            }
        };

        match result {
            Ok(responses) => {
                self.retrain(&app_id).await;
                responses
            }
            Err(e) => vec![Response::text(report_error(&e))],
        }
    }

    async fn add(
        &self,
        app_id: &str,
        kind: EntityType,
        prebuilt: Option<&str>,
        input: &EntityInput,
        task_id: Option<String>,
    ) -> Result<Vec<Response>, DomainError> {
        let name = input.content.as_str();
        let metadata = EntityMetadata::new(input.bucket, task_id);

        let entity_id = self
            .client
            .add_entity(app_id, name, kind, prebuilt, &metadata)
            .await?;
        self.memory.add_entity_lookup(name, &entity_id).await;
        tracing::info!(entity_id = %entity_id, name = %name, "Added entity");

        if !input.negatable {
            return Ok(vec![entity_card(
                ENTITY_ADDED, name, &entity_id, kind, prebuilt, &metadata, true,
            )]);
        }

        // Negative first, then link the positive to it
        let neg_name = negative_name(name);
        let neg_metadata = metadata.make_negative(&entity_id);
        let neg_id = self
            .client
            .add_entity(app_id, &neg_name, kind, prebuilt, &neg_metadata)
            .await?;
        self.memory.add_entity_lookup(&neg_name, &neg_id).await;

        let pos_metadata = metadata.with_negative(&neg_id);
        self.client
            .edit_entity(app_id, &entity_id, name, None, prebuilt, &pos_metadata)
            .await?;

        Ok(vec![
            entity_card(ENTITY_ADDED, &neg_name, &neg_id, kind, prebuilt, &neg_metadata, true),
            entity_card(ENTITY_EDITED, name, &entity_id, kind, prebuilt, &pos_metadata, true),
        ])
    }

    async fn edit(
        &self,
        app_id: &str,
        entity_id: &str,
        input: &EntityInput,
        task_id: Option<String>,
    ) -> Result<Vec<Response>, DomainError> {
        let old = self.client.get_entity(app_id, entity_id).await?;
        if old.metadata.is_negative() {
            return Err(DomainError::Conflict(
                "Can't edit a reversible Entity directly".to_string(),
            ));
        }

        // Type (and prebuilt) cannot change after creation
        let kind = old.entity_type;
        let prebuilt = old.luis_pre_name.as_deref();

        let name = input.content.as_str();
        let neg_name = negative_name(name);
        let old_neg_name = negative_name(&old.name);
        let metadata = EntityMetadata::new(input.bucket, task_id);
        let mut responses = Vec::new();

        match (old.metadata.negative.as_deref(), input.negatable) {
            (Some(neg_id), true) => {
                let pos_metadata = metadata.clone().with_negative(neg_id);
                self.edit_positive(app_id, &old, name, &pos_metadata).await?;
                responses.push(entity_card(
                    ENTITY_EDITED, name, entity_id, kind, prebuilt, &pos_metadata, true,
                ));

                let neg_metadata = metadata.make_negative(entity_id);
                self.client
                    .edit_entity(app_id, neg_id, &neg_name, None, prebuilt, &neg_metadata)
                    .await?;
                self.relink_lookup(&old_neg_name, &neg_name, neg_id).await;
                responses.push(entity_card(
                    ENTITY_EDITED, &neg_name, neg_id, kind, prebuilt, &neg_metadata, true,
                ));
            }
            (Some(neg_id), false) => {
                // Drop the reference first, then the negative itself
                self.edit_positive(app_id, &old, name, &metadata).await?;
                responses.push(entity_card(
                    ENTITY_EDITED, name, entity_id, kind, prebuilt, &metadata, true,
                ));

                self.client.delete_entity(app_id, neg_id).await?;
                self.memory.remove_entity_lookup(&old_neg_name).await;
                tracing::info!(entity_id = %neg_id, name = %old_neg_name, "Deleted negative entity");
                responses.push(entity_card(
                    ENTITY_DELETED,
                    &old_neg_name,
                    neg_id,
                    kind,
                    prebuilt,
                    &old.metadata,
                    false,
                ));
            }
            (None, true) => {
                // Negative first, then link the positive to it
                let neg_metadata = metadata.make_negative(entity_id);
                let neg_id = self
                    .client
                    .add_entity(app_id, &neg_name, kind, prebuilt, &neg_metadata)
                    .await?;
                self.memory.add_entity_lookup(&neg_name, &neg_id).await;
                tracing::info!(entity_id = %neg_id, name = %neg_name, "Added negative entity");
                responses.push(entity_card(
                    ENTITY_ADDED, &neg_name, &neg_id, kind, prebuilt, &neg_metadata, true,
                ));

                let pos_metadata = metadata.with_negative(&neg_id);
                self.edit_positive(app_id, &old, name, &pos_metadata).await?;
                responses.push(entity_card(
                    ENTITY_EDITED, name, entity_id, kind, prebuilt, &pos_metadata, true,
                ));
            }
            (None, false) => {
                self.edit_positive(app_id, &old, name, &metadata).await?;
                responses.push(entity_card(
                    ENTITY_EDITED, name, entity_id, kind, prebuilt, &metadata, true,
                ));
            }
        }

        Ok(responses)
    }

    async fn edit_positive(
        &self,
        app_id: &str,
        old: &Entity,
        name: &str,
        metadata: &EntityMetadata,
    ) -> Result<(), DomainError> {
        self.client
            .edit_entity(app_id, &old.id, name, None, old.luis_pre_name.as_deref(), metadata)
            .await?;
        self.relink_lookup(&old.name, name, &old.id).await;
        tracing::info!(entity_id = %old.id, name = %name, "Edited entity");
        Ok(())
    }

    async fn relink_lookup(&self, old_name: &str, new_name: &str, entity_id: &str) {
        if old_name != new_name {
            self.memory.remove_entity_lookup(old_name).await;
        }
        self.memory.add_entity_lookup(new_name, entity_id).await;
    }

    /// Retrain after a structural change.
    ///
    /// Fails routinely while no action references the entity yet.
    async fn retrain(&self, app_id: &str) {
        match self.client.train_model(app_id).await {
            Ok(model_id) => {
                tracing::info!(model_id = %model_id, "Retrained model");
                self.memory.set_model_id(Some(model_id)).await;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Retrain after entity change failed");
            }
        }
    }

    /// Delete an entity and, if it has one, its negative.
    ///
    /// Negative entities and entities referenced by the application are
    /// refused without deleting anything.
    pub async fn delete(&self, entity_id: &str) -> Vec<Response> {
        tracing::debug!(entity_id = %entity_id, "Trying to delete entity");

        if entity_id.trim().is_empty() {
            return vec![Response::text(format!(
                "You must provide the ID of the entity to delete.\n\n     {} {{entity ID}}",
                commands::DELETE_ENTITY
            ))];
        }

        let Some(app_id) = self.memory.app_id().await else {
            return vec![no_app_response()];
        };

        match self.try_delete(&app_id, entity_id.trim()).await {
            Ok(responses) => responses,
            Err(e) => vec![Response::text(report_error(&e))],
        }
    }

    async fn try_delete(&self, app_id: &str, entity_id: &str) -> Result<Vec<Response>, DomainError> {
        let entity = self.client.get_entity(app_id, entity_id).await?;

        if entity.metadata.is_negative() {
            return Err(DomainError::Conflict(
                "Can't delete a reversible Entity directly".to_string(),
            ));
        }

        let content = self.client.export_app(app_id).await?;
        if references_entity(content, &entity) {
            tracing::info!(entity_id = %entity.id, "Entity in use, not deleting");
            let card = HeroCard::new("Delete Failed")
                .with_subtitle(&entity.name)
                .with_text("Entity is being used by App");
            return Ok(vec![card.into()]);
        }

        self.client.delete_entity(app_id, &entity.id).await?;
        self.memory.remove_entity_lookup(&entity.name).await;
        tracing::info!(entity_id = %entity.id, name = %entity.name, "Deleted entity");

        let mut responses = vec![entity_card(
            ENTITY_DELETED,
            &entity.name,
            &entity.id,
            entity.entity_type,
            entity.luis_pre_name.as_deref(),
            &entity.metadata,
            false,
        )];

        if let Some(neg_id) = &entity.metadata.negative {
            let negative = self.client.get_entity(app_id, neg_id).await?;
            self.client.delete_entity(app_id, neg_id).await?;
            self.memory.remove_entity_lookup(&negative.name).await;
            tracing::info!(entity_id = %negative.id, name = %negative.name, "Deleted negative entity");

            responses.push(entity_card(
                ENTITY_DELETED,
                &negative.name,
                &negative.id,
                negative.entity_type,
                negative.luis_pre_name.as_deref(),
                &negative.metadata,
                false,
            ));
        }

        Ok(responses)
    }

    /// List entities whose name contains `search`, ignoring case.
    ///
    /// A `!` in the search switches to a single text block with ids. Every
    /// fetched entity is written to the lookup cache.
    pub async fn list(&self, search: Option<&str>) -> Vec<Response> {
        tracing::debug!("Getting entities");

        let Some(app_id) = self.memory.app_id().await else {
            return vec![no_app_response()];
        };

        let search = search.unwrap_or_default();
        let debug = search.contains(blis::domain::DEBUG);
        let search = search.replace(blis::domain::DEBUG, "").trim().to_lowercase();

        match self.try_list(&app_id, &search, debug).await {
            Ok(responses) => responses,
            Err(e) => vec![Response::text(report_error(&e))],
        }
    }

    async fn try_list(
        &self,
        app_id: &str,
        search: &str,
        debug: bool,
    ) -> Result<Vec<Response>, DomainError> {
        let entity_ids = self.client.get_entities(app_id).await?;
        tracing::debug!(count = entity_ids.len(), "Found entities");

        if entity_ids.is_empty() {
            return Ok(vec![Response::text("This app contains no Entities.")]);
        }

        let mut entities = Vec::new();
        for entity_id in &entity_ids {
            let entity = self.client.get_entity(app_id, entity_id).await?;
            self.memory.add_entity_lookup(&entity.name, entity_id).await;
            if search.is_empty() || entity.name.to_lowercase().contains(search) {
                entities.push(entity);
            }
        }

        if entities.is_empty() {
            return Ok(vec![Response::text("No Entities match your query.")]);
        }

        Entity::sort(&mut entities);

        if debug {
            let mut msg = String::from("**Entities**\n\n");
            for entity in &entities {
                msg.push_str(&format!(
                    "{}  {} {}\n\n",
                    entity.name,
                    entity.description(),
                    entity.id
                ));
            }
            return Ok(vec![Response::Text(msg)]);
        }

        Ok(entities
            .iter()
            .map(|entity| {
                Response::Card(
                    HeroCard::new(&entity.name)
                        .with_subtitle(entity.description())
                        .with_buttons(entity_buttons(&entity.name, &entity.id)),
                )
            })
            .collect())
    }
}

fn no_app_response() -> Response {
    Response::text(format!(
        "No app has been loaded. Use {} {{app ID}} to load one.",
        commands::APP
    ))
}

/// Whether `entity` (or its negative) is referenced outside the entity list.
///
/// Substring search over the serialized application content; an action whose
/// text happens to contain the id counts as a reference.
fn references_entity(mut content: serde_json::Value, entity: &Entity) -> bool {
    if let Some(fields) = content.as_object_mut() {
        fields.insert("entities".to_string(), serde_json::Value::Null);
    }
    let text = content.to_string();

    let negative_in_use = entity
        .metadata
        .negative
        .as_deref()
        .is_some_and(|neg_id| text.contains(neg_id));

    negative_in_use || text.contains(&entity.id)
}

/// Edit/Delete buttons; negative entities get none
fn entity_buttons(name: &str, entity_id: &str) -> Vec<Button> {
    if is_negative_name(name) {
        return Vec::new();
    }
    vec![
        Button::new("Edit", format!("{} {}", commands::EDIT_ENTITY, entity_id)),
        Button::new("Delete", format!("{} {}", commands::DELETE_ENTITY, entity_id)),
    ]
}

fn entity_card(
    title: &str,
    name: &str,
    entity_id: &str,
    kind: EntityType,
    prebuilt: Option<&str>,
    metadata: &EntityMetadata,
    with_buttons: bool,
) -> Response {
    let buttons = if with_buttons {
        entity_buttons(name, entity_id)
    } else {
        Vec::new()
    };
    HeroCard::new(title)
        .with_subtitle(describe(kind, prebuilt, metadata))
        .with_text(name)
        .with_buttons(buttons)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity(id: &str, negative: Option<&str>) -> Entity {
        let mut metadata = EntityMetadata::default();
        metadata.negative = negative.map(str::to_string);
        Entity::new(id, "city", EntityType::Local, None, metadata)
    }

    #[test]
    fn test_entity_list_is_not_a_reference() {
        let content = json!({
            "entities": [{ "id": "e-1", "name": "city" }],
            "actions": [{ "id": "a-1", "requiredEntities": [] }]
        });
        assert!(!references_entity(content, &entity("e-1", None)));
    }

    #[test]
    fn test_action_reference_found() {
        let content = json!({
            "entities": [],
            "actions": [{ "id": "a-1", "requiredEntities": ["e-1"] }]
        });
        assert!(references_entity(content, &entity("e-1", None)));
    }

    #[test]
    fn test_negative_reference_found() {
        let content = json!({ "actions": [{ "negativeEntities": ["e-2"] }] });
        assert!(references_entity(content, &entity("e-1", Some("e-2"))));
    }

    #[test]
    fn test_negative_entities_have_no_buttons() {
        assert!(entity_buttons("~city", "e-2").is_empty());

        let buttons = entity_buttons("city", "e-1");
        assert_eq!(buttons[0].command, "!editentity e-1");
        assert_eq!(buttons[1].command, "!deleteentity e-1");
    }
}
