//! Prompt Template Entity
//!
//! Reusable prompts with `[PLACEHOLDER]` markers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A reusable prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Prompt body; `[NAME]` marks a value to fill in
    pub prompt: String,
    pub category: String,
}

impl PromptTemplate {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        prompt: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            prompt: prompt.into(),
            category: category.into(),
        }
    }

    /// Placeholder names in order of first appearance
    pub fn placeholders(&self) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        let mut rest = self.prompt.as_str();
        while let Some(start) = rest.find('[') {
            let after = &rest[start + 1..];
            let Some(end) = after.find(']') else {
                break;
            };
            let name = &after[..end];
            if !name.is_empty() && !found.iter().any(|n| n == name) {
                found.push(name.to_string());
            }
            rest = &after[end + 1..];
        }
        found
    }

    /// Substitute placeholders; markers without a value are left as-is
    ///
    /// Values are inserted verbatim; markers inside a value are not expanded.
    pub fn fill(&self, values: &HashMap<String, String>) -> String {
        let mut filled = String::with_capacity(self.prompt.len());
        let mut rest = self.prompt.as_str();
        while let Some(start) = rest.find('[') {
            let after = &rest[start + 1..];
            let Some(end) = after.find(']') else {
                break;
            };
            let name = &after[..end];
            filled.push_str(&rest[..start]);
            match values.get(name) {
                Some(value) if !name.is_empty() => filled.push_str(value),
                _ => filled.push_str(&rest[start..start + end + 2]),
            }
            rest = &after[end + 1..];
        }
        filled.push_str(rest);
        filled
    }
}

/// The set of templates offered to the user
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<PromptTemplate>,
}

impl TemplateCatalog {
    pub fn new(templates: Vec<PromptTemplate>) -> Self {
        Self { templates }
    }

    /// Templates bundled with the crate
    pub fn builtin() -> Self {
        Self::new(vec![
            PromptTemplate::new(
                "1",
                "Blog Post Outline",
                "Structure a blog post before writing it",
                "Draft an outline for a blog post on [TOPIC] with a hook, three to five sections with key points, and a closing takeaway.",
                "Blog",
            ),
            PromptTemplate::new(
                "2",
                "Email Marketing",
                "Promotional email for a product or service",
                "Write a marketing email for [PRODUCT]. Give it a subject line, a short opening, the main benefits, and one clear call to action.",
                "Marketing",
            ),
            PromptTemplate::new(
                "3",
                "Social Media Post",
                "Short post meant to be shared",
                "Write a social media post about [TOPIC] in under 280 characters and suggest three hashtags.",
                "Social Media",
            ),
            PromptTemplate::new(
                "4",
                "Product Description",
                "Store listing copy",
                "Describe [PRODUCT] for an online store listing. Cover what it is, who it is for, and its standout features.",
                "E-commerce",
            ),
            PromptTemplate::new(
                "5",
                "Business Proposal",
                "Proposal for a client or partner",
                "Write a business proposal for [PROJECT] addressed to [CLIENT], with a summary, scope, timeline, and pricing section.",
                "Business",
            ),
            PromptTemplate::new(
                "6",
                "Cover Letter",
                "Job application letter",
                "Write a cover letter for the [ROLE] position at [COMPANY], highlighting relevant experience and motivation.",
                "Career",
            ),
            PromptTemplate::new(
                "7",
                "Short Story",
                "Opening scene of a story",
                "Write the opening scene of a short story set in [SETTING] about [CHARACTER].",
                "Creative",
            ),
            PromptTemplate::new(
                "8",
                "Product Review",
                "Balanced review of something you used",
                "Write a balanced review of [PRODUCT] listing strengths, weaknesses, and who should buy it.",
                "E-commerce",
            ),
        ])
    }

    pub fn all(&self) -> &[PromptTemplate] {
        &self.templates
    }

    pub fn find(&self, id: &str) -> Option<&PromptTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Distinct categories in catalog order
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for template in &self.templates {
            if !categories.contains(&template.category.as_str()) {
                categories.push(&template.category);
            }
        }
        categories
    }

    pub fn by_category(&self, category: &str) -> Vec<&PromptTemplate> {
        self.templates
            .iter()
            .filter(|t| t.category.eq_ignore_ascii_case(category))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_in_order_without_duplicates() {
        let template = PromptTemplate::new("x", "t", "d", "[A] then [B] and [A] again", "c");
        assert_eq!(template.placeholders(), vec!["A", "B"]);
    }

    #[test]
    fn test_fill_leaves_unknown_markers() {
        let template = PromptTemplate::new("x", "t", "d", "Pitch [PROJECT] to [CLIENT]", "c");
        let mut values = HashMap::new();
        values.insert("PROJECT".to_string(), "a rooftop garden".to_string());

        assert_eq!(template.fill(&values), "Pitch a rooftop garden to [CLIENT]");
    }

    #[test]
    fn test_fill_does_not_expand_markers_inside_values() {
        let template = PromptTemplate::new("x", "t", "d", "Ideas on [TOPIC] for [PRODUCT]", "c");
        let mut values = HashMap::new();
        values.insert("TOPIC".to_string(), "[PRODUCT] launches".to_string());
        values.insert("PRODUCT".to_string(), "a kettle".to_string());

        assert_eq!(template.fill(&values), "Ideas on [PRODUCT] launches for a kettle");
    }

    #[test]
    fn test_fill_repeated_marker_and_trailing_text() {
        let template = PromptTemplate::new("x", "t", "d", "[A] and [A], then [broken", "c");
        let mut values = HashMap::new();
        values.insert("A".to_string(), "x".to_string());

        assert_eq!(template.fill(&values), "x and x, then [broken");
    }

    #[test]
    fn test_unterminated_marker_is_ignored() {
        let template = PromptTemplate::new("x", "t", "d", "About [TOPIC] and [broken", "c");
        assert_eq!(template.placeholders(), vec!["TOPIC"]);
    }

    #[test]
    fn test_builtin_catalog_lookup() {
        let catalog = TemplateCatalog::builtin();
        assert_eq!(catalog.find("1").map(|t| t.title.as_str()), Some("Blog Post Outline"));
        assert!(catalog.find("999").is_none());
        assert_eq!(catalog.by_category("e-commerce").len(), 2);
        assert_eq!(catalog.categories().first(), Some(&"Blog"));
    }
}
