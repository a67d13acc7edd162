//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod action_command;
mod entity_type;

pub use action_command::*;
pub use entity_type::*;
