//! Credential Entity
//!
//! The API key used to authorize calls to the generative endpoint.

/// Opaque API credential
///
/// An empty value means "unset". `Debug` never prints the key.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential {
    value: String,
}

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn unset() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        !self.value.is_empty()
    }

    /// Raw key, for building the request URL
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Masked form for display, e.g. `AIza…x9Q`
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.value.chars().collect();
        if chars.is_empty() {
            return String::new();
        }
        if chars.len() <= 8 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 3..].iter().collect();
        format!("{}…{}", head, tail)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("set", &self.is_set())
            .finish()
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self { value }
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
