//! Service Ports
//!
//! Abstract interfaces for external services.

mod credential_storage;
mod generative_model;
mod output_sink;

pub use credential_storage::*;
pub use generative_model::*;
pub use output_sink::*;
