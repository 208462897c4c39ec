//! Fragment file discovery.
//!
//! Fragments live flat in the fragment directory; subdirectories are not
//! traversed. Ignore files are not consulted: a fragment that is
//! gitignored is still a fragment. Results are sorted by path so the
//! discovery order (and therefore the order within a rendered section) is
//! stable across platforms.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};
use ignore::WalkBuilder;
use tracing::debug;

/// Lists the regular files in one directory whose names end in the
/// fragment extension.
pub struct FragmentWalker
{
    /// `*.<ext>` matched against the file name only
    matcher: GlobMatcher,

    /// Follow symbolic links; default true so linked fragments are seen
    follow_symlinks: bool,
}

impl FragmentWalker
{
    /// Build a walker for fragments with the given extension (no dot).
    pub fn new(extension: &str) -> Result<Self>
    {
        let pattern = format!("*.{extension}");
        let glob = Glob::new(&pattern).with_context(|| format!("invalid fragment pattern {pattern:?}"))?;

        Ok(Self {
            matcher: glob.compile_matcher(),
            follow_symlinks: true,
        })
    }

    pub fn with_follow_symlinks(
        mut self,
        follow: bool,
    ) -> Self
    {
        self.follow_symlinks = follow;
        self
    }

    /// Fragment candidates directly under `dir`, sorted.
    ///
    /// A missing directory yields no fragments. Candidates are not
    /// validated here; the name check belongs to the parser.
    pub fn walk_files(
        &self,
        dir: &Path,
    ) -> Result<Vec<PathBuf>>
    {
        if !dir.exists()
        {
            debug!(dir = %dir.display(), "fragment directory does not exist");
            return Ok(Vec::new());
        }

        let mut b = WalkBuilder::new(dir);
        b.standard_filters(false);
        b.follow_links(self.follow_symlinks);
        // depth 0 is `dir` itself, depth 1 its entries
        b.max_depth(Some(1));

        let mut out = Vec::new();
        for res in b.build()
        {
            let entry = res.with_context(|| format!("failed to list fragment directory {}", dir.display()))?;

            if entry.depth() == 0
                || !entry
                    .file_type()
                    .is_some_and(|ft| ft.is_file())
            {
                continue;
            }

            if self
                .matcher
                .is_match(entry.file_name())
            {
                out.push(entry.into_path());
            }
        }

        out.sort();
        debug!(dir = %dir.display(), count = out.len(), "discovered fragment files");

        Ok(out)
    }
}

#[cfg(test)]
mod tests
{
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn names(
        root: &Path,
        files: &[PathBuf],
    ) -> Vec<String>
    {
        files
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    #[test]
    fn test_only_matching_extension() -> Result<()>
    {
        let tmp = TempDir::new()?;
        let root = tmp.path();

        fs::write(root.join("2.fix.md"), "b")?;
        fs::write(root.join("1.feature.md"), "a")?;
        fs::write(root.join("crier.toml"), "[crier]")?;
        fs::write(root.join("3.fix.rst"), "c")?;
        fs::write(root.join("README"), "d")?;

        let files = FragmentWalker::new("md")?.walk_files(root)?;
        assert_eq!(names(root, &files), ["1.feature.md", "2.fix.md"]);
        Ok(())
    }

    #[test]
    fn test_no_recursion_and_hidden_included() -> Result<()>
    {
        let tmp = TempDir::new()?;
        let root = tmp.path();

        fs::create_dir_all(root.join("sub"))?;
        fs::write(root.join("sub/9.fix.md"), "nested")?;
        fs::write(root.join(".gitignore"), "*.md\n")?;
        fs::write(root.join(".5.fix.md"), "hidden")?;
        fs::write(root.join("4.fix.md"), "ignored by git but still a fragment")?;

        let files = FragmentWalker::new("md")?.walk_files(root)?;
        assert_eq!(names(root, &files), [".5.fix.md", "4.fix.md"]);
        Ok(())
    }

    #[test]
    fn test_missing_directory_is_empty() -> Result<()>
    {
        let tmp = TempDir::new()?;
        let files = FragmentWalker::new("md")?.walk_files(&tmp.path().join("nope"))?;
        assert!(files.is_empty());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_fragment() -> Result<()>
    {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new()?;
        let root = tmp.path().join("frags");
        fs::create_dir_all(&root)?;
        fs::write(tmp.path().join("elsewhere.md"), "x")?;
        symlink(tmp.path().join("elsewhere.md"), root.join("6.fix.md"))?;

        let files = FragmentWalker::new("md")?.walk_files(&root)?;
        assert_eq!(names(&root, &files), ["6.fix.md"]);

        let files = FragmentWalker::new("md")?
            .with_follow_symlinks(false)
            .walk_files(&root)?;
        assert!(files.is_empty());
        Ok(())
    }
}
