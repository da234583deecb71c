//! HLS segmentation through external tools.
//!
//! A [`Segmenter`] takes one source audio file and an output directory and
//! leaves `prog_index.m3u8` plus `fileSequence<N>.aac` segments in that
//! directory, or fails. How the audio gets encoded is entirely up to the
//! tool; callers only rely on those file names.

mod ffmpeg;
mod mediafilesegmenter;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tc_core::config::{SegmenterKind, ToolsConfig};

use crate::tools::ToolRegistry;

pub use ffmpeg::FfmpegSegmenter;
pub use mediafilesegmenter::MediaFileSegmenter;

/// Name of the playlist every segmenter writes.
pub const PLAYLIST_FILE: &str = "prog_index.m3u8";

/// Converts one media file into an HLS playlist and segments.
#[async_trait]
pub trait Segmenter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Segment `source` into `output_dir`, which already exists.
    ///
    /// Implementations need not bound their own run time or clean up after
    /// a failure: the caller does both.
    async fn segment(&self, source: &Path, output_dir: &Path) -> tc_core::Result<()>;
}

/// Build the segmenter selected in configuration.
///
/// A tool missing from the registry is not fatal here: the bare program name
/// is used instead so the library endpoints keep working, and stream
/// requests fail when the spawn fails.
pub fn segmenter_from_config(
    tools: &ToolRegistry,
    config: &ToolsConfig,
) -> Arc<dyn Segmenter> {
    let name = match config.segmenter {
        SegmenterKind::Mediafilesegmenter => "mediafilesegmenter",
        SegmenterKind::Ffmpeg => "ffmpeg",
    };

    let program = match tools.require(name) {
        Ok(path) => path.to_path_buf(),
        Err(e) => {
            tracing::warn!("{e}; stream preparation will fail until it is installed");
            name.into()
        }
    };

    match config.segmenter {
        SegmenterKind::Mediafilesegmenter => Arc::new(MediaFileSegmenter::new(
            program,
            config.segment_duration_secs,
        )),
        SegmenterKind::Ffmpeg => Arc::new(FfmpegSegmenter::new(
            program,
            config.segment_duration_secs,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn picks_configured_backend() {
        let tools = ToolRegistry::from_paths([(
            "ffmpeg".to_string(),
            PathBuf::from("/usr/bin/ffmpeg"),
        )]);

        let cfg = ToolsConfig {
            segmenter: SegmenterKind::Ffmpeg,
            ..Default::default()
        };
        let seg = segmenter_from_config(&tools, &cfg);
        assert_eq!(seg.name(), "ffmpeg");

        let seg = segmenter_from_config(&tools, &ToolsConfig::default());
        assert_eq!(seg.name(), "mediafilesegmenter");
    }
}
