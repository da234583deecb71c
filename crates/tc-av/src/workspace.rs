//! Process-lifetime scratch directory for generated HLS artifacts.
//!
//! A [`StreamWorkspace`] owns one uniquely named temporary directory. Every
//! song that gets streamed receives a subdirectory named after its id,
//! holding the playlist and its segments:
//!
//! ```text
//! <workspace>/
//!   42/
//!     prog_index.m3u8
//!     fileSequence0.aac
//!     fileSequence1.aac
//!   .7.partial/
//! ```
//!
//! A song is segmented into its hidden `.<id>.partial` staging directory and
//! only renamed to `<id>` once the segmenter has succeeded, so a song
//! directory that exists is always complete.
//!
//! Nothing below the workspace is deleted individually; the whole tree goes
//! away in [`StreamWorkspace::destroy`] (or on drop, if destroy never ran).
//! Handlers get a [`WorkspaceLayout`], which computes paths but cannot
//! remove anything.

use std::fmt;
use std::path::{Path, PathBuf};

use tc_core::{Error, Result, SongId};
use tempfile::TempDir;

use crate::segmenter::PLAYLIST_FILE;

/// Prefix for the workspace directory name.
const WORKSPACE_PREFIX: &str = "hls";

/// Scratch directory holding every song's playlist and segments.
///
/// Owned by whoever controls the process lifecycle; request handlers only
/// ever see a [`WorkspaceLayout`].
#[derive(Debug)]
pub struct StreamWorkspace {
    dir: TempDir,
}

impl StreamWorkspace {
    /// Allocate a uniquely named directory under `root`, or under the
    /// system temp directory when `root` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directory cannot be created. Callers
    /// should treat this as fatal.
    pub fn create(root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);
        let dir = match root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        tracing::info!(path = %dir.path().display(), "Created stream workspace");
        Ok(Self { dir })
    }

    /// Root of the workspace.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path arithmetic for the artifacts inside this workspace.
    pub fn layout(&self) -> WorkspaceLayout {
        WorkspaceLayout {
            root: self.dir.path().to_path_buf(),
        }
    }

    /// Remove the workspace and everything beneath it.
    ///
    /// Failures are logged and otherwise ignored so shutdown never stalls.
    pub fn destroy(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => tracing::info!(path = %path.display(), "Removed stream workspace"),
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to remove stream workspace"
            ),
        }
    }
}

/// Where a song's artifacts live inside the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl WorkspaceLayout {
    /// Directory holding the artifacts for one song.
    pub fn song_dir(&self, song_id: SongId) -> PathBuf {
        self.root.join(song_id.to_string())
    }

    /// Scratch directory a song is segmented into before it is published.
    pub fn staging_dir(&self, song_id: SongId) -> PathBuf {
        self.root.join(format!(".{song_id}.partial"))
    }

    /// Path of the playlist for one song.
    pub fn playlist_path(&self, song_id: SongId) -> PathBuf {
        self.song_dir(song_id).join(PLAYLIST_FILE)
    }

    /// Path of one segment for one song.
    pub fn segment_path(&self, song_id: SongId, segment: &SegmentName) -> PathBuf {
        self.song_dir(song_id).join(segment.as_str())
    }
}

// ---------------------------------------------------------------------------
// SegmentName
// ---------------------------------------------------------------------------

/// A segment filename of the form `fileSequence<digits>.aac`.
///
/// Constructing one is the only way to build a segment path, so every
/// filename taken from a URL has passed validation before it is joined onto
/// the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentName(String);

impl SegmentName {
    pub const PREFIX: &'static str = "fileSequence";
    pub const EXTENSION: &'static str = ".aac";

    /// Validate a raw filename.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPath`] if the name could escape its directory
    ///   (separators, `..`, NUL, leading dot).
    /// - [`Error::NotFound`] if the name is safe but is not a segment name.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty()
            || raw.contains('/')
            || raw.contains('\\')
            || raw.contains("..")
            || raw.contains('\0')
            || raw.starts_with('.')
            || Path::new(raw).is_absolute()
        {
            return Err(Error::InvalidPath(raw.to_string()));
        }

        let digits = raw
            .strip_prefix(Self::PREFIX)
            .and_then(|s| s.strip_suffix(Self::EXTENSION))
            .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()));

        match digits {
            Some(_) => Ok(Self(raw.to_string())),
            None => Err(Error::not_found("segment", raw)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SegmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
