//! BLIS Domain Library
//!
//! Core domain types and interfaces for the BLIS entity and template core.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Entity, Template, Response
//!   - `value_objects/`: EntityType, command markers
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `blis_client`: Remote dialog service
//!   - `memory`: Conversation memory
//!
//! # Usage
//!
//! ```rust,ignore
//! use blis::domain::{Entity, EntityMetadata};
//! use blis::ports::{BlisClient, BotMemory};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    cards, describe, is_negative_name, negative_name, ActionArgument, ActionPayload, Button,
    DomainError, Entity, EntityInput, EntityMetadata, EntityType, HeroCard, Response, Template,
    TemplateVariable,
};
pub use ports::{BlisClient, BotMemory};
