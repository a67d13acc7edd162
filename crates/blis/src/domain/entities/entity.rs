//! Entity - Named slot tracked by the dialog service
//!
//! Pure domain entity without infrastructure dependencies.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::value_objects::EntityType;

/// Entity metadata
///
/// At most one of `negative` / `positive` is set: a positive entity may link
/// to its negative counterpart, a negative entity always links back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadata {
    /// Whether the entity holds multiple values
    #[serde(default, deserialize_with = "null_as_default")]
    pub bucket: bool,
    /// If negatable, id of the negative entity paired with this one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative: Option<String>,
    /// If a negative, id of the positive entity it belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive: Option<String>,
    /// Optional task (entity id) associated with this entity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
}

impl EntityMetadata {
    pub fn new(bucket: bool, task: Option<String>) -> Self {
        Self {
            bucket,
            task,
            ..Self::default()
        }
    }

    /// Same metadata, linked to the negative entity `negative_id`
    pub fn with_negative(mut self, negative_id: impl Into<String>) -> Self {
        self.negative = Some(negative_id.into());
        self.positive = None;
        self
    }

    /// Metadata for the negative counterpart of the positive entity `positive_id`
    pub fn make_negative(&self, positive_id: impl Into<String>) -> Self {
        Self {
            bucket: self.bucket,
            negative: None,
            positive: Some(positive_id.into()),
            task: self.task.clone(),
        }
    }

    pub fn is_negative(&self) -> bool {
        self.positive.is_some()
    }
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Entity - as stored by the dialog service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(rename = "EntityType")]
    pub entity_type: EntityType,
    #[serde(rename = "LUISPreName", default)]
    pub luis_pre_name: Option<String>,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: EntityMetadata,
}

impl Entity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        entity_type: EntityType,
        luis_pre_name: Option<String>,
        metadata: EntityMetadata,
    ) -> Self {
        Self {
            id: id.into(),
            entity_type,
            luis_pre_name,
            name: name.into(),
            metadata,
        }
    }

    pub fn description(&self) -> String {
        describe(self.entity_type, self.luis_pre_name.as_deref(), &self.metadata)
    }

    /// Sort entities by name, ignoring case
    pub fn sort(entities: &mut [Entity]) {
        entities.sort_by_key(|e| e.name.to_lowercase());
    }
}

/// One-line summary of an entity's kind and flags
pub fn describe(entity_type: EntityType, prebuilt: Option<&str>, metadata: &EntityMetadata) -> String {
    let mut description = match prebuilt {
        Some(prebuilt) => prebuilt.to_string(),
        None => entity_type.to_string(),
    };
    if metadata.bucket {
        description.push_str(" (bucket)");
    }
    if metadata.negative.is_some() {
        description.push_str(" (negatable)");
    }
    if metadata.positive.is_some() {
        description.push_str(" (delete)");
    }
    if let Some(task) = &metadata.task {
        description.push_str(&format!(" (Task: {task})"));
    }
    description
}
