//! Grouping fragments into the sections of a release.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::fragment::Fragment;

/// A section as declared in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionConfig {
    /// Title written to the news file
    pub name: String,
    /// Key used in fragment file names
    pub short_name: String,
    /// Render the section even when it has no fragments.
    /// Unset and `false` render the same; unset never overrides a default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_always: Option<bool>,
}

impl SectionConfig {
    pub fn new(name: &str, short_name: &str) -> Self {
        Self {
            name: name.to_string(),
            short_name: short_name.to_string(),
            show_always: None,
        }
    }

    pub fn show_always(mut self, show: bool) -> Self {
        self.show_always = Some(show);
        self
    }
}

/// A section of a release, ready for the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Section {
    pub title: String,
    pub show_always: bool,
    pub fragments: Vec<Fragment>,
}

/// Build the rendered sections, in configured order.
///
/// A configured section appears when it has fragments, or when it is
/// explicitly marked `show_always = true`. Fragments whose category is
/// not configured are dropped; see [`unknown_categories`].
pub fn aggregate(configured: &[SectionConfig], fragments: Vec<Fragment>) -> Vec<Section> {
    let mut by_key: IndexMap<String, Vec<Fragment>> = IndexMap::new();
    for fragment in fragments {
        by_key.entry(fragment.category.clone()).or_default().push(fragment);
    }

    let mut sections = Vec::with_capacity(configured.len());
    for cfg in configured {
        let show_always = cfg.show_always.unwrap_or(false);
        match by_key.shift_remove(&cfg.short_name) {
            Some(fragments) => sections.push(Section {
                title: cfg.name.clone(),
                show_always,
                fragments,
            }),
            None if show_always => sections.push(Section {
                title: cfg.name.clone(),
                show_always,
                fragments: Vec::new(),
            }),
            None => {}
        }
    }

    sections
}

/// Indices of the fragments whose category matches no configured section,
/// in input order.
pub fn unknown_categories(configured: &[SectionConfig], fragments: &[Fragment]) -> Vec<usize> {
    fragments
        .iter()
        .enumerate()
        .filter(|(_, f)| !configured.iter().any(|c| c.short_name == f.category))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(issue: &str, category: &str, text: &str) -> Fragment {
        Fragment {
            issue: issue.into(),
            category: category.into(),
            text: text.into(),
        }
    }

    #[test]
    fn test_configured_order_wins() {
        let configured = vec![SectionConfig::new("Added", "feature"), SectionConfig::new("Fixed", "fix")];
        let fragments = vec![fragment("2", "fix", "Crash."), fragment("1", "feature", "Widget.")];

        let sections = aggregate(&configured, fragments);
        let titles: Vec<_> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Added", "Fixed"]);
    }

    #[test]
    fn test_show_always_section_follows_populated_one() {
        let configured = vec![
            SectionConfig::new("A", "a").show_always(false),
            SectionConfig::new("B", "b").show_always(true),
        ];
        let fragments = vec![fragment("1", "a", "one"), fragment("2", "a", "two")];

        let sections = aggregate(&configured, fragments);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "A");
        assert_eq!(sections[0].fragments.len(), 2);
        assert!(!sections[0].show_always);
        assert_eq!(sections[1].title, "B");
        assert!(sections[1].fragments.is_empty());
        assert!(sections[1].show_always);
    }

    #[test]
    fn test_empty_sections_are_omitted_unless_shown_always() {
        let configured = vec![
            SectionConfig::new("Unset", "unset"),
            SectionConfig::new("Off", "off").show_always(false),
            SectionConfig::new("On", "on").show_always(true),
        ];

        let sections = aggregate(&configured, Vec::new());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "On");
    }

    #[test]
    fn test_fragment_order_within_section() {
        let configured = vec![SectionConfig::new("Fixed", "fix")];
        let fragments = vec![fragment("3", "fix", "c"), fragment("1", "fix", "a"), fragment("2", "fix", "b")];

        let sections = aggregate(&configured, fragments);
        let issues: Vec<_> = sections[0].fragments.iter().map(|f| f.issue.as_str()).collect();
        assert_eq!(issues, ["3", "1", "2"]);
    }

    #[test]
    fn test_unknown_categories() {
        let configured = vec![SectionConfig::new("Fixed", "fix")];
        let fragments = vec![fragment("1", "fix", "a"), fragment("2", "typo", "b"), fragment("3", "misc", "c")];

        let unknown = unknown_categories(&configured, &fragments);
        assert_eq!(unknown, [1, 2]);

        // and the aggregator simply drops them
        let sections = aggregate(&configured, fragments);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].fragments.len(), 1);
    }
}
