//! BLIS bot
//!
//! Entity registry and template rendering on top of the `blis` domain crate,
//! with HTTP and in-memory dialog service adapters.

pub mod adapters;
pub mod application;
pub mod commands;
pub mod config;
pub mod dispatcher;

pub use config::Config;
pub use dispatcher::CommandDispatcher;
