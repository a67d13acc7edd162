//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Entity: Named slot tracked by the dialog service
//! - Template: Response card template with placeholders
//! - Response: What a command hands back to the transport

mod entity;
mod response;
mod template;

pub use entity::*;
pub use response::*;
pub use template::*;
