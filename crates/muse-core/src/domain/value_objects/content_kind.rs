//! ContentKind - Classification hint for text generation

use serde::{Deserialize, Serialize};

/// Kind of content the text generator is asked to produce
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[default]
    Article,
    Story,
    Email,
    Social,
    Blog,
    Product,
}

impl ContentKind {
    pub const ALL: [ContentKind; 6] = [
        ContentKind::Article,
        ContentKind::Story,
        ContentKind::Email,
        ContentKind::Social,
        ContentKind::Blog,
        ContentKind::Product,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Article => "Article",
            ContentKind::Story => "Creative Story",
            ContentKind::Email => "Email",
            ContentKind::Social => "Social Media Post",
            ContentKind::Blog => "Blog Post",
            ContentKind::Product => "Product Description",
        }
    }

    /// Machine name, also used in download file names
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Article => "article",
            ContentKind::Story => "story",
            ContentKind::Email => "email",
            ContentKind::Social => "social",
            ContentKind::Blog => "blog",
            ContentKind::Product => "product",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        ContentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == needle)
            .ok_or_else(|| format!("Unknown content kind: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Story".parse::<ContentKind>().unwrap(), ContentKind::Story);
        assert_eq!(" product ".parse::<ContentKind>().unwrap(), ContentKind::Product);
    }

    #[test]
    fn test_parse_unknown() {
        assert!("poem".parse::<ContentKind>().is_err());
    }

    #[test]
    fn test_default_is_article() {
        assert_eq!(ContentKind::default(), ContentKind::Article);
        assert_eq!(ContentKind::default().to_string(), "article");
    }
}
