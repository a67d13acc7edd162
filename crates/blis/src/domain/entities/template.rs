//! Template - Response card template with `{{placeholder}}` variables

use serde::{Deserialize, Serialize};

/// A variable declared by a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateVariable {
    pub key: String,
    /// `type` of the object the placeholder appeared in, if it had one
    #[serde(rename = "type")]
    pub var_type: Option<String>,
}

impl TemplateVariable {
    pub fn new(key: impl Into<String>, var_type: Option<String>) -> Self {
        Self {
            key: key.into(),
            var_type,
        }
    }
}

/// A template as discovered in the template directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub name: String,
    pub variables: Vec<TemplateVariable>,
    /// Serialized JSON body
    pub body: String,
    /// Set when the template has no submit action
    pub validation_error: Option<String>,
}

impl Template {
    pub fn is_valid(&self) -> bool {
        self.validation_error.is_none()
    }
}

/// Named value supplied for a template placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionArgument {
    pub parameter: String,
    pub value: String,
}

impl ActionArgument {
    pub fn new(parameter: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            value: value.into(),
        }
    }
}

/// Request to render a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPayload {
    /// Template name
    pub payload: String,
    #[serde(default)]
    pub arguments: Vec<ActionArgument>,
}

impl ActionPayload {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            payload: template.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, parameter: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.push(ActionArgument::new(parameter, value));
        self
    }

    /// First argument supplied for `parameter`
    pub fn argument(&self, parameter: &str) -> Option<&ActionArgument> {
        self.arguments.iter().find(|a| a.parameter == parameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_lookup_takes_first() {
        let payload = ActionPayload::new("weather")
            .with_argument("city", "Seattle")
            .with_argument("city", "Portland");

        assert_eq!(payload.argument("city").unwrap().value, "Seattle");
        assert!(payload.argument("date").is_none());
    }

    #[test]
    fn test_payload_without_arguments_parses() {
        let payload: ActionPayload =
            serde_json::from_value(serde_json::json!({ "payload": "hello" })).unwrap();
        assert_eq!(payload.payload, "hello");
        assert!(payload.arguments.is_empty());
    }
}
