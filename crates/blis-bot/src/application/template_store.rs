//! Template Store
//!
//! Discovers response templates in a directory, extracts their declared
//! variables and checks each carries a submit action.

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use blis::{DomainError, Template, TemplateVariable};

use super::placeholders::placeholder_names;

/// File extension of template documents
pub const TEMPLATE_EXTENSION: &str = ".json";

/// Directory of `<name>.json` templates
///
/// Stateless: every call goes back to disk.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    directory: PathBuf,
}

impl TemplateStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Names of the templates in the directory, in directory order
    pub fn template_names(&self) -> Result<Vec<String>, DomainError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let file_name = entry?.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(name) = file_name.strip_suffix(TEMPLATE_EXTENSION) {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    /// Load and parse a single template document
    pub fn template(&self, name: &str) -> Result<Value, DomainError> {
        let path = self.directory.join(format!("{name}{TEMPLATE_EXTENSION}"));
        let text = fs::read_to_string(&path).map_err(|e| {
            DomainError::template(name, format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&text).map_err(|e| DomainError::template(name, e))
    }

    /// Every template with its variables and validation verdict
    pub fn templates(&self) -> Result<Vec<Template>, DomainError> {
        let names = self.template_names()?;
        let mut templates = Vec::with_capacity(names.len());

        for name in names {
            let body = self.template(&name)?;

            let mut scan = VariableScan::default();
            collect_variables(&body, &mut scan);

            let validation_error = (!scan.has_submit).then(|| {
                format!(
                    "Template \"{name}\" does not have an action with a \"submit\" item in the data. \
                     At least one action item must be of the form: \
                     \"type\": \"Action.Submit\", \"data\": {{ \"submit\": \"{{SUBMIT PAYLOAD}}\" }}"
                )
            });
            if validation_error.is_some() {
                tracing::warn!(template = %name, "Template has no submit action");
            }

            templates.push(Template {
                variables: unique_variables(&name, scan.variables),
                body: body.to_string(),
                validation_error,
                name,
            });
        }

        Ok(templates)
    }
}

/// Accumulator threaded through the variable walk
#[derive(Debug, Default)]
struct VariableScan {
    variables: Vec<TemplateVariable>,
    has_submit: bool,
}

/// Walk objects and arrays, scanning the primitive fields of objects for
/// placeholders. Bare primitives inside arrays carry no variables.
///
/// A variable's type is the `type` field of the object it appears in.
fn collect_variables(node: &Value, scan: &mut VariableScan) {
    match node {
        Value::Object(fields) => {
            if has_submit_data(fields) {
                scan.has_submit = true;
            }

            let var_type = fields.get("type").and_then(Value::as_str);
            for field in fields.values() {
                if matches!(field, Value::String(_) | Value::Number(_) | Value::Bool(_)) {
                    for key in placeholder_names(&field.to_string()) {
                        scan.variables
                            .push(TemplateVariable::new(key, var_type.map(str::to_string)));
                    }
                }
            }

            for field in fields.values() {
                collect_variables(field, scan);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_variables(item, scan);
            }
        }
        _ => {}
    }
}

fn has_submit_data(fields: &Map<String, Value>) -> bool {
    fields
        .get("data")
        .and_then(|data| data.get("submit"))
        .is_some_and(is_truthy)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Collapse repeated keys, filling a missing type from a later occurrence.
///
/// Conflicting types keep the first one seen.
fn unique_variables(template: &str, variables: Vec<TemplateVariable>) -> Vec<TemplateVariable> {
    let mut unique: Vec<TemplateVariable> = Vec::new();

    for variable in variables {
        let Some(existing) = unique.iter_mut().find(|u| u.key == variable.key) else {
            unique.push(variable);
            continue;
        };

        if existing.var_type.is_none() {
            existing.var_type = variable.var_type;
        } else if let (Some(first), Some(second)) = (&existing.var_type, &variable.var_type) {
            if first != second {
                tracing::warn!(
                    template = %template,
                    key = %variable.key,
                    first = %first,
                    second = %second,
                    "Template variable used for two different types, ignoring"
                );
            }
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scan(body: &Value) -> VariableScan {
        let mut scan = VariableScan::default();
        collect_variables(body, &mut scan);
        scan
    }

    #[test]
    fn test_submit_found_in_nested_action() {
        let body = json!({
            "type": "AdaptiveCard",
            "actions": [
                { "type": "Action.Submit", "data": { "submit": "done" } }
            ]
        });
        assert!(scan(&body).has_submit);
    }

    #[test]
    fn test_empty_submit_is_not_a_submit() {
        let body = json!({ "actions": [{ "data": { "submit": "" } }] });
        assert!(!scan(&body).has_submit);
    }

    #[test]
    fn test_variables_typed_by_enclosing_object() {
        let body = json!({
            "type": "AdaptiveCard",
            "title": "{{greeting}}",
            "body": [
                { "type": "TextBlock", "text": "Hello {{name}}" },
                { "text": "{{ name }} again" }
            ]
        });

        let vars = scan(&body).variables;
        assert_eq!(
            vars,
            vec![
                TemplateVariable::new("greeting", Some("AdaptiveCard".into())),
                TemplateVariable::new("name", Some("TextBlock".into())),
                TemplateVariable::new("name", None),
            ]
        );
    }

    #[test]
    fn test_strings_directly_in_arrays_are_ignored() {
        let body = json!({
            "choices": ["{{first}}", [{ "type": "Choice", "title": "{{second}}" }]]
        });
        let keys: Vec<_> = scan(&body).variables.into_iter().map(|v| v.key).collect();
        assert_eq!(keys, vec!["second"]);
    }

    #[test]
    fn test_unique_fills_missing_type() {
        let vars = vec![
            TemplateVariable::new("city", None),
            TemplateVariable::new("city", Some("Input.Text".into())),
        ];
        assert_eq!(
            unique_variables("t", vars),
            vec![TemplateVariable::new("city", Some("Input.Text".into()))]
        );
    }

    #[test]
    fn test_unique_keeps_first_on_conflict() {
        let vars = vec![
            TemplateVariable::new("city", Some("TextBlock".into())),
            TemplateVariable::new("city", Some("Input.Text".into())),
            TemplateVariable::new("city", None),
        ];
        assert_eq!(
            unique_variables("t", vars),
            vec![TemplateVariable::new("city", Some("TextBlock".into()))]
        );
    }
}
