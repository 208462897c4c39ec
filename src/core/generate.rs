//! The release command: fragments in, news file entry out.
//!
//! Without `--release` the rendered entry is only printed. With it, the
//! entry is spliced into the news file and the consumed fragment files
//! are removed. Every validation and rendering step runs before the news
//! file is touched, so a failure leaves the working tree as it was.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveTime;
use owo_colors::{OwoColorize, Style};
use tracing::{debug, info, instrument, warn};

use crate::cli::{AppContext, OutputFormat, ReleaseArgs};
use crate::core::fragment::Fragment;
use crate::core::newsfile;
use crate::core::release::Release;
use crate::core::section;
use crate::core::template::Template;
use crate::infra::config::{self, Settings};
use crate::infra::walk::FragmentWalker;

#[instrument(skip_all, fields(config = %args.config.display()))]
pub fn run(args: ReleaseArgs, ctx: &AppContext) -> Result<()> {
    // clap requires both unless a subcommand is given
    let (Some(version), Some(previous)) = (args.new.as_deref(), args.previous.as_deref()) else {
        bail!("both the NEW and PREVIOUS versions are required");
    };

    let settings = config::load_settings(&args.config).context("invalid configuration")?;
    debug!(?settings, "resolved configuration");

    let (paths, fragments) = discover(&settings)?;
    check_categories(&settings, &paths, &fragments)?;

    let sections = section::aggregate(&settings.sections, fragments);
    if sections.is_empty() {
        info!("no fragments to release, nothing to do");
        return Ok(());
    }

    let mut release = Release::build(&settings.repository, settings.hosting, settings.markup, version, previous)
        .with_sections(sections);
    if let Some(date) = args.date {
        release = release.with_date(date.and_time(NaiveTime::MIN).and_utc());
    }

    let header = match &settings.header_template {
        Some(path) => Some(
            Template::from_file(path)
                .and_then(|t| t.render(&release))
                .context("cannot render header template")?,
        ),
        None => None,
    };
    let section_template = match &settings.section_template {
        Some(path) => Template::from_file(path).context("cannot load section template")?,
        None => Template::section(settings.hosting, settings.markup),
    };
    let body = section_template
        .render(&release)
        .context("cannot render section template")?;

    let keep_header = header.is_none();
    let mut entry = header.unwrap_or_default();
    entry.push_str(&body);

    if !args.release {
        match args.format {
            OutputFormat::Text => print!("{entry}"),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&release).context("cannot serialize release")?;
                println!("{json}");
            }
        }
        return Ok(());
    }

    write_news_file(&settings, keep_header, &entry)?;

    let failed = remove_fragments(&paths);
    if !ctx.quiet {
        let style = ctx.style(Style::new().green());
        println!(
            "Updated {} with {} fragment{}",
            settings.news_file.display().style(style),
            release.fragment_count(),
            if release.fragment_count() == 1 { "" } else { "s" }
        );
    }
    if failed > 0 {
        bail!("{failed} fragment file(s) could not be removed; delete them by hand");
    }

    Ok(())
}

/// Parse every fragment candidate, skipping invalid ones with a warning.
fn discover(settings: &Settings) -> Result<(Vec<PathBuf>, Vec<Fragment>)> {
    let walker = FragmentWalker::new(settings.markup.style().extension)?;
    let candidates = walker.walk_files(&settings.fragment_dir)?;

    let mut paths = Vec::with_capacity(candidates.len());
    let mut fragments = Vec::with_capacity(candidates.len());
    for path in candidates {
        match Fragment::parse(&path) {
            Ok(fragment) => {
                paths.push(path);
                fragments.push(fragment);
            }
            Err(e) => warn!("ignoring invalid fragment file: {e}"),
        }
    }

    debug!(count = fragments.len(), "parsed fragments");
    Ok((paths, fragments))
}

fn check_categories(settings: &Settings, paths: &[PathBuf], fragments: &[Fragment]) -> Result<()> {
    let unknown = section::unknown_categories(&settings.sections, fragments);
    if unknown.is_empty() {
        return Ok(());
    }

    let offending: Vec<String> = unknown
        .into_iter()
        .map(|i| format!("{} (section {:?})", paths[i].display(), fragments[i].category))
        .collect();
    let known: Vec<&str> = settings.sections.iter().map(|s| s.short_name.as_str()).collect();

    bail!(
        "fragments for unconfigured sections: {}; configured sections are: {}",
        offending.join(", "),
        known.join(", ")
    )
}

fn write_news_file(settings: &Settings, keep_header: bool, entry: &str) -> Result<()> {
    let news_file = &settings.news_file;
    let style = settings.markup.style();

    let text = if !keep_header {
        // the rendered header replaces everything up to the marker
        entry.as_bytes().to_vec()
    } else if news_file.exists() {
        format!("\n{entry}").into_bytes()
    } else {
        // first release: lay the entry into the builtin header exactly as a
        // release into a freshly initialized news file would
        let header = Template::header(settings.markup)
            .render(&())
            .context("cannot render news file header")?;
        seed_news_file(&header, style.marker, entry)?
    };

    if !keep_header && !entry.contains(style.marker) {
        warn!(
            "header template output has no {:?} marker; the next release will not find it",
            style.marker
        );
    }

    newsfile::splice(news_file, style.marker, &text, keep_header)
        .with_context(|| format!("cannot update {}", news_file.display()))?;

    info!(path = %news_file.display(), "news file updated");
    Ok(())
}

/// The builtin `header` with `entry` spliced in after its marker.
fn seed_news_file(header: &str, marker: &str, entry: &str) -> Result<Vec<u8>> {
    let text = format!("\n{entry}");
    let mut seeded = Vec::with_capacity(header.len() + text.len());
    let found = newsfile::Splicer::new(marker, text.as_bytes()).copy_into(header.as_bytes(), &mut seeded)?;
    if !found {
        bail!("builtin news file header has no {marker:?} marker");
    }
    Ok(seeded)
}

/// Remove consumed fragments. Returns how many could not be removed.
fn remove_fragments(paths: &[PathBuf]) -> usize {
    paths
        .iter()
        .map(PathBuf::as_path)
        .filter(|p| !remove_fragment(p))
        .count()
}

fn remove_fragment(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed fragment");
            true
        }
        Err(e) => {
            warn!("cannot remove fragment file {}: {e}", path.display());
            false
        }
    }
}
