//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the domain layer
//! interacts with external systems (the dialog service, conversation memory).
//!
//! Implementations of these traits live in the infrastructure layer.

pub mod blis_client;
pub mod memory;

// Re-exports
pub use blis_client::*;
pub use memory::*;
