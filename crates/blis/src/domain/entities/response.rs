//! Response - What a command hands back to the transport

use serde::{Deserialize, Serialize};

/// A button carrying the command it sends back when pressed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub command: String,
}

impl Button {
    pub fn new(label: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            command: command.into(),
        }
    }
}

/// Hero card with optional action buttons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroCard {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub buttons: Vec<Button>,
}

impl HeroCard {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            text: None,
            buttons: Vec::new(),
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }
}

/// A single item returned to the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Response {
    Text(String),
    Card(HeroCard),
    /// Rendered template payload
    Payload(serde_json::Value),
    /// Row of suggested actions shown under the other responses
    Suggestions(Vec<Button>),
}

impl Response {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn as_card(&self) -> Option<&HeroCard> {
        match self {
            Self::Card(card) => Some(card),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<HeroCard> for Response {
    fn from(card: HeroCard) -> Self {
        Self::Card(card)
    }
}

/// Hero cards among `responses`, in order
pub fn cards(responses: &[Response]) -> Vec<&HeroCard> {
    responses.iter().filter_map(Response::as_card).collect()
}
