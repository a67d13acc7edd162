//! Template discovery and rendering against a scratch directory

use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use blis::{ActionPayload, BotMemory, DomainError};
use blis_bot::adapters::InMemoryBotMemory;
use blis_bot::application::{TemplateRenderer, TemplateStore};

fn write_template(dir: &Path, name: &str, body: &Value) {
    fs::write(dir.join(format!("{name}.json")), body.to_string()).unwrap();
}

fn weather_card() -> Value {
    json!({
        "type": "AdaptiveCard",
        "body": [
            { "type": "TextBlock", "text": "Weather in {{city}}" },
            { "type": "Input.Date", "id": "when", "value": "{{ date }}" }
        ],
        "actions": [
            {
                "type": "Action.Submit",
                "title": "{{button}}",
                "data": { "submit": "weather" }
            }
        ]
    })
}

fn scratch() -> (TempDir, TemplateStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = TemplateStore::new(dir.path());
    (dir, store)
}

#[test]
fn test_template_names_strip_extension() {
    let (dir, store) = scratch();
    write_template(dir.path(), "weather", &weather_card());
    write_template(dir.path(), "v1.greeting", &json!({}));
    fs::write(dir.path().join("notes.txt"), "not a template").unwrap();

    let mut names = store.template_names().unwrap();
    names.sort();
    assert_eq!(names, vec!["v1.greeting", "weather"]);
}

#[test]
fn test_templates_collect_typed_variables() {
    let (dir, store) = scratch();
    write_template(dir.path(), "weather", &weather_card());

    let templates = store.templates().unwrap();
    assert_eq!(templates.len(), 1);

    let weather = &templates[0];
    assert_eq!(weather.name, "weather");
    assert!(weather.is_valid());
    assert_eq!(weather.validation_error, None);

    let mut variables: Vec<_> = weather
        .variables
        .iter()
        .map(|v| (v.key.as_str(), v.var_type.as_deref()))
        .collect();
    variables.sort();
    assert_eq!(
        variables,
        vec![
            ("button", Some("Action.Submit")),
            ("city", Some("TextBlock")),
            ("date", Some("Input.Date")),
        ]
    );
}

#[test]
fn test_template_without_submit_is_invalid() {
    let (dir, store) = scratch();
    write_template(
        dir.path(),
        "broken",
        &json!({
            "type": "AdaptiveCard",
            "actions": [{ "type": "Action.Submit", "data": { "other": "x" } }]
        }),
    );

    let templates = store.templates().unwrap();
    let broken = &templates[0];
    assert!(!broken.is_valid());
    let error = broken.validation_error.as_deref().unwrap();
    assert!(error.contains("\"broken\""));
    assert!(error.contains("submit"));
}

#[test]
fn test_missing_directory_is_an_error() {
    let (dir, _) = scratch();
    let store = TemplateStore::new(dir.path().join("missing"));
    assert!(matches!(store.templates(), Err(DomainError::Io(_))));
}

#[test]
fn test_malformed_template_is_an_error() {
    let (dir, store) = scratch();
    fs::write(dir.path().join("bad.json"), "{ \"type\": ").unwrap();

    let err = store.template("bad").unwrap_err();
    assert!(matches!(err, DomainError::Template { ref name, .. } if name == "bad"));
    assert!(store.templates().is_err());
}

#[tokio::test]
async fn test_render_leaves_unsupplied_placeholders() {
    let (dir, store) = scratch();
    write_template(dir.path(), "pair", &json!({ "text": "{{a}}{{b}}" }));
    let renderer = TemplateRenderer::new(store);
    let memory = InMemoryBotMemory::new();

    let action = ActionPayload::new("pair").with_argument("a", "first");
    let rendered = renderer.render(&action, &memory).await.unwrap();
    assert_eq!(rendered, json!({ "text": "first{{b}}" }));
}

#[tokio::test]
async fn test_render_is_repeatable() {
    let (dir, store) = scratch();
    write_template(dir.path(), "weather", &weather_card());
    let renderer = TemplateRenderer::new(store.clone());
    let memory = InMemoryBotMemory::new();

    let action = ActionPayload::new("weather")
        .with_argument("city", "Paris")
        .with_argument("date", "2024-05-01");

    let first = renderer.render(&action, &memory).await.unwrap();
    let second = renderer.render(&action, &memory).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first["body"][0]["text"], "Weather in Paris");
    assert_eq!(first["body"][1]["value"], "2024-05-01");
    assert_eq!(first["actions"][0]["title"], "{{button}}");

    // Stored template untouched
    assert_eq!(store.template("weather").unwrap(), weather_card());
}

#[tokio::test]
async fn test_render_expands_remembered_entities() {
    let (dir, store) = scratch();
    write_template(dir.path(), "weather", &weather_card());
    let renderer = TemplateRenderer::new(store);
    let memory = InMemoryBotMemory::new();
    memory.remember_entity("city", "São \"Paulo\"").await;

    let action = ActionPayload::new("weather").with_argument("city", "$city");
    let rendered = renderer.render(&action, &memory).await.unwrap();
    assert_eq!(rendered["body"][0]["text"], "Weather in São \"Paulo\"");
}

#[tokio::test]
async fn test_render_missing_template_fails() {
    let (_dir, store) = scratch();
    let renderer = TemplateRenderer::new(store);
    let memory = InMemoryBotMemory::new();

    let result = renderer
        .render(&ActionPayload::new("nowhere"), &memory)
        .await;
    assert!(matches!(result, Err(DomainError::Template { .. })));
}
