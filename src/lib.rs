//! **crier** - Changelog generation from news fragments
//!
//! Each change lands as a small fragment file named
//! `<issue>.<category>[.summary].<ext>`. On release the fragments are
//! grouped into the configured sections, rendered through a template, and
//! spliced into the news file right after its start marker. The news file
//! is rewritten through a temporary file and an atomic rename.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Release pipeline - parsing, grouping, rendering and splicing
pub mod core {
    /// Markup and hosting lookup tables
    pub mod markup;
    pub use markup::{Hosting, Markup, MarkupStyle};

    /// Fragment file name parsing
    pub mod fragment;
    pub use fragment::{Fragment, FragmentError};

    /// Grouping fragments into configured sections
    pub mod section;
    pub use section::{Section, SectionConfig, aggregate};

    /// The release record handed to templates
    pub mod release;
    pub use release::{Release, Repository};

    /// Builtin and custom templates (minijinja)
    pub mod template;
    pub use template::{Template, TemplateError};

    /// Chunked marker search and atomic news file rewrite
    pub mod newsfile;
    pub use newsfile::{SpliceError, Splicer, splice};

    /// The release command end to end
    pub mod generate;
    pub use generate::run as release_run;
}

/// Infrastructure - configuration and fragment discovery
pub mod infra {
    /// Configuration file model, validation and `init`
    pub mod config;
    pub use config::{Config, ConfigError, Settings, init as config_init, load_settings};

    /// Fragment directory listing
    pub mod walk;
    pub use walk::FragmentWalker;
}

pub use cli::{AppContext, Cli, Commands};
pub use core::release_run;
pub use infra::{Config, FragmentWalker, Settings, load_settings};
