//! EntityType - Structural kind of an entity

use serde::{Deserialize, Serialize};

/// Structural kind of an entity as stored by the dialog service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum EntityType {
    #[serde(rename = "LOCAL")]
    Local,
    #[default]
    #[serde(rename = "LUIS")]
    Luis,
}

impl EntityType {
    /// Interpret a user-supplied type.
    ///
    /// `LOCAL` and `LUIS` map to their structural kind. Anything else names a
    /// LUIS prebuilt, returned upper-cased alongside [`EntityType::Luis`].
    pub fn resolve(raw: &str) -> (Self, Option<String>) {
        let upper = raw.trim().to_uppercase();
        match upper.parse() {
            Ok(kind) => (kind, None),
            Err(_) => (EntityType::Luis, Some(upper)),
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Local => write!(f, "LOCAL"),
            EntityType::Luis => write!(f, "LUIS"),
        }
    }
}

impl std::str::FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOCAL" => Ok(EntityType::Local),
            "LUIS" => Ok(EntityType::Luis),
            _ => Err(format!("Unknown entity type: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_structural_kinds() {
        assert_eq!(EntityType::resolve("local"), (EntityType::Local, None));
        assert_eq!(EntityType::resolve("LUIS"), (EntityType::Luis, None));
    }

    #[test]
    fn test_resolve_prebuilt() {
        assert_eq!(
            EntityType::resolve("datetime"),
            (EntityType::Luis, Some("DATETIME".to_string()))
        );
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&EntityType::Local).unwrap(), "\"LOCAL\"");
        let kind: EntityType = serde_json::from_str("\"LUIS\"").unwrap();
        assert_eq!(kind, EntityType::Luis);
    }
}
