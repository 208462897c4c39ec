//! The release record handed to templates.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use url::Url;

use crate::core::markup::{Hosting, Markup};
use crate::core::section::Section;

/// Format of the `Date` field as seen by templates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated repository identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repository {
    /// `owner/name`, resolved against the hosting provider
    Slug(String),
    /// Absolute http(s) URL, without query, fragment or trailing slash
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository is required")]
    Missing,
    #[error("repository must be in the format <owner>/<name> or an http(s) URL, got {0:?}")]
    BadSlug(String),
    #[error("invalid repository URL {url:?}: {reason}")]
    BadUrl { url: String, reason: String },
}

impl Repository {
    pub fn parse(raw: &str) -> Result<Self, RepositoryError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(RepositoryError::Missing);
        }

        if raw.contains("://") {
            let bad = |reason: String| RepositoryError::BadUrl {
                url: raw.to_string(),
                reason,
            };
            let mut url = Url::parse(raw).map_err(|e| bad(e.to_string()))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(bad("only http or https schemes".to_string()));
            }
            url.set_query(None);
            url.set_fragment(None);
            return Ok(Repository::Url(url.as_str().trim_end_matches('/').to_string()));
        }

        if raw.matches('/').count() != 1 || raw.starts_with('/') || raw.ends_with('/') {
            return Err(RepositoryError::BadSlug(raw.to_string()));
        }
        Ok(Repository::Slug(raw.to_string()))
    }

    /// Web root of the repository, used to build compare and issue links.
    pub fn web_url(&self, hosting: Hosting) -> String {
        match self {
            Repository::Slug(slug) => format!("{}/{slug}", hosting.base_url()),
            Repository::Url(url) => url.clone(),
        }
    }
}

/// Data for one changelog entry. Field names are PascalCase in templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Release {
    pub version: String,
    pub previous_version: String,
    #[serde(serialize_with = "serialize_date")]
    pub date: DateTime<Utc>,
    pub repository: String,
    pub header: String,
    pub section_header: String,
    pub sections: Vec<Section>,
}

impl Release {
    /// Start a release dated now, with markup-specific heading glyphs and
    /// no sections.
    pub fn build(
        repository: &Repository,
        hosting: Hosting,
        markup: Markup,
        version: &str,
        previous_version: &str,
    ) -> Self {
        let style = markup.style();
        Self {
            version: version.to_string(),
            previous_version: previous_version.to_string(),
            date: Utc::now(),
            repository: repository.web_url(hosting),
            header: style.header.to_string(),
            section_header: style.section_header.to_string(),
            sections: Vec::new(),
        }
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    pub fn with_sections(mut self, sections: Vec<Section>) -> Self {
        self.sections = sections;
        self
    }

    pub fn fragment_count(&self) -> usize {
        self.sections.iter().map(|s| s.fragments.len()).sum()
    }
}

fn serialize_date<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(DATE_FORMAT))
}
