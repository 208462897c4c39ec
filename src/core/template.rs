//! Release entry templates.
//!
//! Templates are Jinja-style (minijinja) with `trim_blocks` and
//! `lstrip_blocks` on, so block tags may sit on their own lines. Besides
//! the builtin filters (`indent`, `length`, ...) a `repeat(n)` filter is
//! available for reStructuredText underlines.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use minijinja::{AutoEscape, Environment};
use serde::Serialize;

use crate::core::markup::{Hosting, Markup};

const GITHUB_MARKDOWN_SECTION: &str = include_str!("../../templates/github-markdown-section.j2");
const GITLAB_MARKDOWN_SECTION: &str = include_str!("../../templates/gitlab-markdown-section.j2");
const GITHUB_RST_SECTION: &str = include_str!("../../templates/github-rst-section.j2");
const GITLAB_RST_SECTION: &str = include_str!("../../templates/gitlab-rst-section.j2");
const MARKDOWN_HEADER: &str = include_str!("../../templates/markdown-header.j2");
const RST_HEADER: &str = include_str!("../../templates/rst-header.j2");

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("cannot read template {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse template {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: minijinja::Error,
    },
    #[error("cannot render template {name}: {source}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

/// A named template source, either builtin or loaded from disk.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    source: Cow<'static, str>,
}

impl Template {
    /// Builtin template for the release body.
    pub fn section(hosting: Hosting, markup: Markup) -> Self {
        let source = match (hosting, markup) {
            (Hosting::Github, Markup::Markdown) => GITHUB_MARKDOWN_SECTION,
            (Hosting::Gitlab, Markup::Markdown) => GITLAB_MARKDOWN_SECTION,
            (Hosting::Github, Markup::Rst) => GITHUB_RST_SECTION,
            (Hosting::Gitlab, Markup::Rst) => GITLAB_RST_SECTION,
        };
        Self {
            name: format!("{hosting}-{markup}-section"),
            source: Cow::Borrowed(source),
        }
    }

    /// Builtin news file header. Ends with the markup's start marker.
    pub fn header(markup: Markup) -> Self {
        let source = match markup {
            Markup::Markdown => MARKDOWN_HEADER,
            Markup::Rst => RST_HEADER,
        };
        Self {
            name: format!("{markup}-header"),
            source: Cow::Borrowed(source),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let source = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_source(path.display().to_string(), source))
    }

    pub fn from_source(name: impl Into<String>, source: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render with `ctx` as the root context.
    pub fn render<S: Serialize>(&self, ctx: &S) -> Result<String, TemplateError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_filter("repeat", repeat);

        env.add_template(&self.name, &self.source)
            .map_err(|source| TemplateError::Parse {
                name: self.name.clone(),
                source,
            })?;
        let tmpl = env.get_template(&self.name).map_err(|source| TemplateError::Parse {
            name: self.name.clone(),
            source,
        })?;

        tmpl.render(ctx).map_err(|source| TemplateError::Render {
            name: self.name.clone(),
            source,
        })
    }
}

fn repeat(value: String, n: usize) -> String {
    value.repeat(n)
}
