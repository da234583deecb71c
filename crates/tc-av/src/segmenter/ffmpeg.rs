//! ffmpeg HLS-muxer backend.
//!
//! Mirrors mediafilesegmenter's naming so the rest of the system does not
//! care which tool produced the files.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{Segmenter, PLAYLIST_FILE};
use crate::command::ToolCommand;

/// Default segment length when none is configured.
const DEFAULT_SEGMENT_SECS: u32 = 10;

/// Runs ffmpeg's `hls` muxer, re-encoding the audio track to AAC.
#[derive(Debug, Clone)]
pub struct FfmpegSegmenter {
    program: PathBuf,
    segment_duration: u32,
}

impl FfmpegSegmenter {
    pub fn new(program: PathBuf, segment_duration: u32) -> Self {
        Self {
            program,
            segment_duration: if segment_duration == 0 {
                DEFAULT_SEGMENT_SECS
            } else {
                segment_duration
            },
        }
    }

    fn command(&self, source: &Path, output_dir: &Path) -> ToolCommand {
        let seg_pattern = output_dir.join("fileSequence%d.aac");
        let playlist_path = output_dir.join(PLAYLIST_FILE);

        let mut cmd = ToolCommand::new(self.program.clone());
        cmd.without_timeout();
        cmd.args(["-nostdin", "-y", "-loglevel", "error", "-i"]);
        cmd.arg(source.to_string_lossy().as_ref());
        cmd.args(["-vn", "-c:a", "aac", "-b:a", "128k", "-f", "hls"]);
        cmd.args(["-hls_time", &self.segment_duration.to_string()]);
        cmd.args(["-hls_playlist_type", "vod"]);
        cmd.args(["-hls_list_size", "0"]);
        cmd.args(["-start_number", "0"]);
        cmd.args(["-hls_segment_filename", &seg_pattern.to_string_lossy()]);
        cmd.arg(playlist_path.to_string_lossy().as_ref());
        cmd
    }
}

#[async_trait]
impl Segmenter for FfmpegSegmenter {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn segment(&self, source: &Path, output_dir: &Path) -> tc_core::Result<()> {
        tracing::debug!(
            "ffmpeg HLS: {:?} -> {:?} (segment_duration={}s)",
            source,
            output_dir,
            self.segment_duration
        );
        self.command(source, output_dir).execute().await?;
        Ok(())
    }
}
