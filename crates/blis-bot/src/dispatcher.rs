//! Command Dispatcher
//!
//! Parses one line of user text and routes it to the entity service or the
//! template store/renderer. Entity results are followed by a menu row.

use std::sync::Arc;

use blis::{ActionPayload, BlisClient, BotMemory, Button, HeroCard, Response};

use crate::application::{report_error, EntityService, TemplateRenderer, TemplateStore};
use crate::commands;

/// Routes user commands for one conversation
pub struct CommandDispatcher<C: ?Sized, M: ?Sized> {
    entities: EntityService<C, M>,
    store: TemplateStore,
    renderer: TemplateRenderer,
    memory: Arc<M>,
}

impl<C, M> CommandDispatcher<C, M>
where
    C: BlisClient + ?Sized,
    M: BotMemory + ?Sized,
{
    pub fn new(client: Arc<C>, memory: Arc<M>, store: TemplateStore) -> Self {
        Self {
            entities: EntityService::new(client, Arc::clone(&memory)),
            renderer: TemplateRenderer::new(store.clone()),
            store,
            memory,
        }
    }

    pub fn entities(&self) -> &EntityService<C, M> {
        &self.entities
    }

    /// Handle one line of user input
    pub async fn dispatch(&self, line: &str) -> Vec<Response> {
        let line = line.trim();
        let (command, rest) = split_word(line);
        tracing::debug!(command = %command, "Dispatching command");

        match command.to_lowercase().as_str() {
            commands::ADD_ENTITY => with_menu(self.entities.add_or_edit(None, None, rest).await),
            commands::ADD_LOCAL_ENTITY => {
                with_menu(self.entities.add_or_edit(None, Some("LOCAL"), rest).await)
            }
            commands::ADD_PREBUILT_ENTITY => {
                let (prebuilt, content) = split_word(rest);
                if prebuilt.is_empty() {
                    return vec![usage(commands::ADD_PREBUILT_ENTITY)];
                }
                with_menu(
                    self.entities
                        .add_or_edit(None, Some(prebuilt), content)
                        .await,
                )
            }
            commands::EDIT_ENTITY => {
                let (entity_id, content) = split_word(rest);
                if entity_id.is_empty() {
                    return vec![usage(commands::EDIT_ENTITY)];
                }
                with_menu(
                    self.entities
                        .add_or_edit(Some(entity_id), None, content)
                        .await,
                )
            }
            commands::DELETE_ENTITY => with_menu(self.entities.delete(rest).await),
            commands::ENTITIES => {
                let search = (!rest.is_empty()).then_some(rest);
                with_menu(self.entities.list(search).await)
            }
            commands::TEMPLATES => self.templates(),
            commands::RENDER => self.render(rest).await,
            commands::REMEMBER => self.remember(rest).await,
            commands::FORGET => {
                if rest.is_empty() {
                    return vec![usage(commands::FORGET)];
                }
                self.memory.forget_entity(rest).await;
                vec![Response::text(format!("Forgot {rest}."))]
            }
            commands::APP => {
                if rest.is_empty() {
                    return vec![usage(commands::APP)];
                }
                self.memory.set_app_id(Some(rest.to_string())).await;
                tracing::info!(app_id = %rest, "Loaded app");
                vec![Response::text(format!("Loaded app {rest}."))]
            }
            commands::HELP => vec![Response::text(commands::help_text())],
            _ => vec![
                Response::text(format!("Unknown command \"{command}\".")),
                Response::text(commands::help_text()),
            ],
        }
    }

    fn templates(&self) -> Vec<Response> {
        let templates = match self.store.templates() {
            Ok(templates) => templates,
            Err(e) => return vec![Response::text(report_error(&e))],
        };

        if templates.is_empty() {
            return vec![Response::text(format!(
                "No templates found in {}.",
                self.store.directory().display()
            ))];
        }

        templates
            .into_iter()
            .map(|template| {
                let variables = if template.variables.is_empty() {
                    "no variables".to_string()
                } else {
                    template
                        .variables
                        .iter()
                        .map(|v| v.key.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                let mut card = HeroCard::new(&template.name).with_subtitle(variables);
                if let Some(error) = template.validation_error {
                    card = card.with_text(error);
                }
                Response::Card(card)
            })
            .collect()
    }

    async fn render(&self, rest: &str) -> Vec<Response> {
        let (template, args) = split_word(rest);
        if template.is_empty() {
            return vec![usage(commands::RENDER)];
        }

        let mut action = ActionPayload::new(template);
        for (parameter, value) in parse_assignments(args) {
            action = action.with_argument(parameter, value);
        }

        match self.renderer.render(&action, self.memory.as_ref()).await {
            Ok(payload) => vec![Response::Payload(payload)],
            Err(e) => vec![Response::text(report_error(&e))],
        }
    }

    async fn remember(&self, rest: &str) -> Vec<Response> {
        let Some((name, value)) = rest.split_once('=') else {
            return vec![usage(commands::REMEMBER)];
        };
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() {
            return vec![usage(commands::REMEMBER)];
        }
        self.memory.remember_entity(name, value).await;
        vec![Response::text(format!("Remembered {name} = {value}."))]
    }
}

/// First whitespace-separated word and the trimmed remainder
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim();
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}

/// `a=1 b=two words c=3` → [(a, 1), (b, two words), (c, 3)]
///
/// Words without `=` continue the previous value.
fn parse_assignments(text: &str) -> Vec<(String, String)> {
    let mut assignments: Vec<(String, String)> = Vec::new();
    for word in text.split_whitespace() {
        match word.split_once('=') {
            Some((name, value)) if !name.is_empty() => {
                assignments.push((name.to_string(), value.to_string()));
            }
            _ => {
                if let Some((_, value)) = assignments.last_mut() {
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(word);
                }
            }
        }
    }
    assignments
}

fn usage(command: &str) -> Response {
    let line = commands::USAGE
        .iter()
        .find(|(c, _)| *c == command)
        .map(|(_, usage)| *usage)
        .unwrap_or_default();
    Response::text(format!("Usage: {command} {line}"))
}

fn with_menu(mut responses: Vec<Response>) -> Vec<Response> {
    responses.push(Response::Suggestions(vec![
        Button::new("Add Entity", commands::ADD_ENTITY),
        Button::new("Entities", commands::ENTITIES),
        Button::new("Templates", commands::TEMPLATES),
        Button::new("Help", commands::HELP),
    ]));
    responses
}
