//! Ports (Interfaces)
//!
//! Abstract interfaces that define how features reach the outside world:
//! the generative endpoint, durable credential storage, and output sinks.
//!
//! Implementations live in `services/` (HTTP) or in the CLI (config file,
//! clipboard, downloads).

pub mod services;

// Re-exports
pub use services::*;
