//! Domain Entities

mod conversation;
mod credential;
mod request;
mod template;

pub use conversation::*;
pub use credential::*;
pub use request::*;
pub use template::*;
