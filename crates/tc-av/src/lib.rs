//! # tc-av
//!
//! External tool management and HLS segmentation for tunecast.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache paths to
//!   `mediafilesegmenter` and `ffmpeg`.
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support for running external processes.
//! - **Segmentation** ([`Segmenter`]) -- turn one audio file into an HLS
//!   playlist plus segment files in a target directory.
//! - **Workspace management** ([`StreamWorkspace`]) -- the process-lifetime
//!   scratch directory that holds every generated playlist and segment.

pub mod command;
pub mod segmenter;
pub mod tools;
pub mod workspace;

// ---- Re-exports for convenience ----

pub use command::{ToolCommand, ToolOutput};
pub use segmenter::{
    segmenter_from_config, FfmpegSegmenter, MediaFileSegmenter, Segmenter, PLAYLIST_FILE,
};
pub use tools::{ToolInfo, ToolRegistry};
pub use workspace::{SegmentName, StreamWorkspace, WorkspaceLayout};
