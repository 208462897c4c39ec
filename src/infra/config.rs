//! Configuration file model, defaults and validation.
//!
//! The file is TOML with everything under a `[crier]` table. Loading is
//! strict: unknown keys are rejected so typos surface instead of being
//! silently ignored.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Style};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::{AppContext, InitArgs};
use crate::core::markup::{Hosting, Markup, UnknownVariant};
use crate::core::release::{Repository, RepositoryError};
use crate::core::section::SectionConfig;
use crate::core::template::Template;

/// Directory holding the config file and the fragments.
pub const DEFAULT_FRAGMENT_DIR: &str = ".crier.d";

/// Config file name inside [`DEFAULT_FRAGMENT_DIR`].
pub const CONFIG_FILE_NAME: &str = "crier.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration from {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },
    #[error("repository is required")]
    MissingRepository,
    #[error(transparent)]
    BadRepository(RepositoryError),
    #[error(transparent)]
    BadHosting(UnknownVariant),
    #[error(transparent)]
    BadMarkup(UnknownVariant),
    #[error("at least one section must be configured")]
    BadSections,
    #[error("section short name {0:?} is used more than once")]
    DuplicateSection(String),
}

/// On-disk layout: a single `[crier]` table.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub crier: Config,
}

/// The `[crier]` table as written by the user. Every key is optional;
/// [`Config::resolve`] fills in defaults and validates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// `owner/name` or an http(s) URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// `github` or `gitlab`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosting: Option<String>,

    /// `markdown` or `rst`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub news_file: Option<PathBuf>,

    /// Template file name, relative to the fragment directory. When set,
    /// the news file header is re-rendered on every release.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_template: Option<String>,

    /// Template file name, relative to the fragment directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_template: Option<String>,

    /// Omitted means [`default_sections`]; present but empty is an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<SectionConfig>>,
}

/// A validated configuration with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub repository: Repository,
    pub hosting: Hosting,
    pub markup: Markup,
    pub fragment_dir: PathBuf,
    pub news_file: PathBuf,
    pub header_template: Option<PathBuf>,
    pub section_template: Option<PathBuf>,
    pub sections: Vec<SectionConfig>,
}

/// Sections used when the config does not list any, in Keep a Changelog
/// order.
pub fn default_sections() -> Vec<SectionConfig> {
    vec![
        SectionConfig::new("Security", "security"),
        SectionConfig::new("Deprecated", "deprecate"),
        SectionConfig::new("Removed", "remove"),
        SectionConfig::new("Changed", "change"),
        SectionConfig::new("Added", "feature"),
        SectionConfig::new("Fixed", "fix"),
    ]
}

impl Config {
    pub fn resolve(self) -> Result<Settings, ConfigError> {
        let repository = match self.repository.as_deref() {
            None => return Err(ConfigError::MissingRepository),
            Some(raw) => Repository::parse(raw).map_err(|e| match e {
                RepositoryError::Missing => ConfigError::MissingRepository,
                other => ConfigError::BadRepository(other),
            })?,
        };

        let hosting = match self.hosting.as_deref() {
            None => Hosting::default(),
            Some(s) => s.parse().map_err(ConfigError::BadHosting)?,
        };
        let markup = match self.markup.as_deref() {
            None => Markup::default(),
            Some(s) => s.parse().map_err(ConfigError::BadMarkup)?,
        };

        let sections = match self.sections {
            None => default_sections(),
            Some(s) if s.is_empty() => return Err(ConfigError::BadSections),
            Some(s) => s,
        };
        for (i, section) in sections.iter().enumerate() {
            if sections[..i].iter().any(|s| s.short_name == section.short_name) {
                return Err(ConfigError::DuplicateSection(section.short_name.clone()));
            }
        }

        let fragment_dir = self.fragment_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_FRAGMENT_DIR));
        let news_file = self.news_file.unwrap_or_else(|| PathBuf::from(markup.style().news_file));
        let header_template = self.header_template.map(|name| fragment_dir.join(name));
        let section_template = self.section_template.map(|name| fragment_dir.join(name));

        Ok(Settings {
            repository,
            hosting,
            markup,
            fragment_dir,
            news_file,
            header_template,
            section_template,
            sections,
        })
    }
}

/// Read the config file at `path`. Validation is left to [`Config::resolve`].
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let load_err = |source| ConfigError::Load {
        path: path.to_path_buf(),
        source,
    };

    let file: ConfigFile = config::Config::builder()
        .add_source(config::File::from(path).format(config::FileFormat::Toml).required(true))
        .build()
        .map_err(load_err)?
        .try_deserialize()
        .map_err(load_err)?;

    debug!(path = %path.display(), "loaded configuration");
    Ok(file.crier)
}

/// Load and validate in one step.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    load(path)?.resolve()
}

pub fn init(args: InitArgs, ctx: &AppContext) -> Result<()> {
    let fragment_dir = args.path.join(DEFAULT_FRAGMENT_DIR);
    let config_path = fragment_dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let file = ConfigFile {
        crier: Config {
            repository: Some(args.repository),
            hosting: Some(args.hosting.to_string()),
            markup: Some(args.markup.to_string()),
            sections: Some(default_sections()),
            ..Config::default()
        },
    };
    // the written file must load back cleanly
    file.crier.clone().resolve().context("Invalid init arguments")?;

    let toml_string = toml::to_string_pretty(&file).context("Failed to serialize default config")?;

    fs::create_dir_all(&fragment_dir)
        .with_context(|| format!("Failed to create {}", fragment_dir.display()))?;
    fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet {
        println!(
            "Created config file at {}",
            config_path.display().style(ctx.style(Style::new().green()))
        );
    }

    let news_file = args.path.join(args.markup.style().news_file);
    if news_file.exists() {
        debug!(path = %news_file.display(), "news file exists, leaving it alone");
        return Ok(());
    }

    let header = Template::header(args.markup).render(&()).context("Failed to render news file header")?;
    fs::write(&news_file, header).with_context(|| format!("Failed to write {}", news_file.display()))?;

    if !ctx.quiet {
        println!(
            "Created news file at {}",
            news_file.display().style(ctx.style(Style::new().green()))
        );
    }
    Ok(())
}
