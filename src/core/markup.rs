//! Markup styles and hosting providers.
//!
//! Everything that varies by markup (heading glyphs, fragment extension,
//! start marker, default news file) lives in one static table keyed by
//! [`Markup`]. Nothing here is mutable.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Changelog markup language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Markup {
    #[default]
    Markdown,
    Rst,
}

/// Source hosting provider. Decides the URL layout used in links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hosting {
    #[default]
    Github,
    Gitlab,
}

/// Per-markup constants.
#[derive(Debug)]
pub struct MarkupStyle {
    /// Glyph used for the release heading
    pub header: &'static str,
    /// Glyph used for section headings
    pub section_header: &'static str,
    /// Extension of fragment files, without the dot
    pub extension: &'static str,
    /// Comment that separates the news file header from the releases.
    /// The rst directive includes its line break so the entry that
    /// follows it is a separate paragraph.
    pub marker: &'static str,
    /// News file name used when the config does not name one
    pub news_file: &'static str,
}

const MARKDOWN: MarkupStyle = MarkupStyle {
    header: "##",
    section_header: "###",
    extension: "md",
    marker: "<!-- crier output starts -->",
    news_file: "CHANGELOG.md",
};

const RST: MarkupStyle = MarkupStyle {
    header: "=",
    section_header: "-",
    extension: "rst",
    marker: ".. crier output starts\n",
    news_file: "CHANGELOG.rst",
};

impl Markup {
    pub const fn style(self) -> &'static MarkupStyle {
        match self {
            Markup::Markdown => &MARKDOWN,
            Markup::Rst => &RST,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Markup::Markdown => "markdown",
            Markup::Rst => "rst",
        }
    }
}

impl Hosting {
    pub const fn as_str(self) -> &'static str {
        match self {
            Hosting::Github => "github",
            Hosting::Gitlab => "gitlab",
        }
    }

    /// Web root that `owner/name` slugs are resolved against.
    pub const fn base_url(self) -> &'static str {
        match self {
            Hosting::Github => "https://github.com",
            Hosting::Gitlab => "https://gitlab.com",
        }
    }
}

/// Returned when a markup or hosting name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {kind} {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for Markup {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markdown" => Ok(Markup::Markdown),
            "rst" => Ok(Markup::Rst),
            _ => Err(UnknownVariant { kind: "markup", value: s.to_string() }),
        }
    }
}

impl FromStr for Hosting {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(Hosting::Github),
            "gitlab" => Ok(Hosting::Gitlab),
            _ => Err(UnknownVariant { kind: "hosting", value: s.to_string() }),
        }
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Hosting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
