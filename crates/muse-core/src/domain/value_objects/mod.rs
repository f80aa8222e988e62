//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod content_kind;
mod lifecycle_state;
mod sender;

pub use content_kind::*;
pub use lifecycle_state::*;
pub use sender::*;
