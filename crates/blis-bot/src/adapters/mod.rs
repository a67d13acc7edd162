//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod http_client;
pub mod in_memory_client;
pub mod memory;

// Re-exports
pub use http_client::{HttpBlisClient, ServiceConfig};
pub use in_memory_client::InMemoryBlisClient;
pub use memory::InMemoryBotMemory;
