//! In-place changelog splicing.
//!
//! The news file is streamed in fixed-size chunks into a temporary file in
//! the same directory, with the new release text inserted right after the
//! start marker. The temporary file then atomically replaces the original,
//! so readers of the news file never observe a partial write.
//!
//! Scanning keeps a carry-over buffer of bytes that cannot be classified
//! yet because the marker may continue in the next chunk. The carry-over
//! always holds the bytes after the last newline and never fewer than
//! `marker.len() - 1` bytes, so a marker straddling a chunk boundary is
//! still found.

use std::fs::{self, File};
use std::io::{self, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use memchr::memmem;
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

/// Bytes read from the news file per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

#[derive(Debug, thiserror::Error)]
pub enum SpliceError {
    #[error("start marker must not be empty")]
    EmptyMarker,
    #[error(
        "no start comment {marker:?} found in {}; add it where new releases should go",
        path.display()
    )]
    MarkerNotFound { path: PathBuf, marker: String },
    #[error("failed to {op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_err<'a>(op: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> SpliceError + 'a {
    move |source| SpliceError::Io {
        op,
        path: path.to_path_buf(),
        source,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Searching,
    Found,
}

/// Inserts `text` after the first occurrence of `marker`.
#[derive(Debug, Clone)]
pub struct Splicer<'a> {
    marker: &'a [u8],
    text: &'a [u8],
    keep_header: bool,
    chunk_size: usize,
}

impl<'a> Splicer<'a> {
    pub fn new(marker: &'a str, text: &'a [u8]) -> Self {
        Self {
            marker: marker.as_bytes(),
            text,
            keep_header: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Keep everything up to and including the marker (default), or drop
    /// it so `text` becomes the new head of the file.
    pub fn keep_header(mut self, keep: bool) -> Self {
        self.keep_header = keep;
        self
    }

    /// Read size used while scanning. Clamped to at least one byte.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Stream `src` into `dst`, splicing in the text after the marker.
    ///
    /// Returns whether the marker was found. When it was not, `dst` holds
    /// an unspecified prefix of the output and should be discarded.
    pub fn copy_into<R: Read, W: Write>(&self, mut src: R, mut dst: W) -> io::Result<bool> {
        let finder = memmem::Finder::new(self.marker);
        let mut chunk = vec![0u8; self.chunk_size];
        let mut carry: Vec<u8> = Vec::new();
        let mut state = ScanState::Searching;

        loop {
            let n = match src.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            match state {
                ScanState::Found => dst.write_all(&chunk[..n])?,
                ScanState::Searching => {
                    carry.extend_from_slice(&chunk[..n]);

                    if let Some(idx) = finder.find(&carry) {
                        let end = idx + self.marker.len();
                        if self.keep_header {
                            dst.write_all(&carry[..end])?;
                        }
                        dst.write_all(self.text)?;
                        dst.write_all(&carry[end..])?;
                        carry.clear();
                        state = ScanState::Found;
                    } else {
                        let cut = self.settled_len(&carry);
                        if self.keep_header {
                            dst.write_all(&carry[..cut])?;
                        }
                        carry.drain(..cut);
                    }
                }
            }
        }

        if state == ScanState::Searching && self.keep_header {
            dst.write_all(&carry)?;
        }
        dst.flush()?;

        Ok(state == ScanState::Found)
    }

    /// Length of the prefix of `buf` that cannot be part of a marker match.
    fn settled_len(&self, buf: &[u8]) -> usize {
        let after_newline = memchr::memrchr(b'\n', buf).map_or(0, |i| i + 1);
        let keep_for_marker = buf.len().saturating_sub(self.marker.len().saturating_sub(1));
        after_newline.min(keep_for_marker)
    }

    /// Splice into the file at `target`, replacing it atomically.
    ///
    /// A missing `target` is created with just the text; no marker is
    /// needed in that case.
    #[instrument(skip(self), fields(keep_header = self.keep_header))]
    pub fn splice(&self, target: &Path) -> Result<(), SpliceError> {
        if self.marker.is_empty() {
            return Err(SpliceError::EmptyMarker);
        }

        // Same directory as the target so the final rename stays on one filesystem
        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err("create temporary file in", dir))?;

        match File::open(target) {
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("news file does not exist, writing release text only");
                tmp.write_all(self.text).map_err(io_err("write", tmp.path()))?;
            }
            Err(e) => return Err(io_err("open", target)(e)),
            Ok(src) => {
                let perms = src.metadata().map_err(io_err("stat", target))?.permissions();
                fs::set_permissions(tmp.path(), perms).map_err(io_err("set permissions on", tmp.path()))?;

                let tmp_path = tmp.path().to_path_buf();
                let found = self
                    .copy_into(src, BufWriter::new(&mut tmp))
                    .map_err(io_err("copy news file into", &tmp_path))?;
                if !found {
                    // dropping `tmp` removes the temporary file
                    return Err(SpliceError::MarkerNotFound {
                        path: target.to_path_buf(),
                        marker: String::from_utf8_lossy(self.marker).into_owned(),
                    });
                }
            }
        }

        tmp.as_file().sync_all().map_err(io_err("sync", tmp.path()))?;
        tmp.persist(target).map_err(|e| SpliceError::Io {
            op: "replace",
            path: target.to_path_buf(),
            source: e.error,
        })?;

        debug!(path = %target.display(), "news file updated");
        Ok(())
    }
}

/// Insert `text` after `marker` in the file at `target`.
pub fn splice(target: &Path, marker: &str, text: &[u8], keep_header: bool) -> Result<(), SpliceError> {
    Splicer::new(marker, text).keep_header(keep_header).splice(target)
}
