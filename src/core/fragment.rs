//! News fragment files.
//!
//! A fragment file is named `<issue>.<category>[.<summary>...].<ext>` and
//! holds the text of a single change. The summary segments are free-form
//! and ignored.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// A single change destined for the next release entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Fragment {
    /// Issue or pull request the change refers to
    pub issue: String,
    /// Short key of the section this fragment belongs to
    pub category: String,
    /// Trimmed file contents
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum FragmentError {
    #[error("not a valid fragment file {}: {reason}", path.display())]
    InvalidName { path: PathBuf, reason: &'static str },
    #[error("failed to read fragment file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Fragment {
    /// Parse the fragment stored at `path`.
    ///
    /// The name is validated before the file is opened, so a badly named
    /// file never costs a read.
    pub fn parse(path: &Path) -> Result<Self, FragmentError> {
        let (issue, category) = split_name(path)?;

        let data = fs::read_to_string(path).map_err(|source| FragmentError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            issue,
            category,
            text: data.trim().to_string(),
        })
    }
}

fn split_name(path: &Path) -> Result<(String, String), FragmentError> {
    let invalid = |reason| FragmentError::InvalidName {
        path: path.to_path_buf(),
        reason,
    };

    let name = path
        .file_name()
        .ok_or_else(|| invalid("no file name"))?
        .to_str()
        .ok_or_else(|| invalid("file name is not valid UTF-8"))?;

    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() < 3 {
        return Err(invalid("not enough parts"));
    }
    if parts[0].is_empty() {
        return Err(invalid("empty issue"));
    }
    if parts[1].is_empty() {
        return Err(invalid("empty section"));
    }

    Ok((parts[0].to_string(), parts[1].to_string()))
}
