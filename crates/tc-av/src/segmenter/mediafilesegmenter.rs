//! Apple `mediafilesegmenter` backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{Segmenter, PLAYLIST_FILE};
use crate::command::ToolCommand;

/// Runs `mediafilesegmenter -a` to produce audio-only segments.
///
/// The child runs without its own time limit; the caller bounds it.
#[derive(Debug, Clone)]
pub struct MediaFileSegmenter {
    program: PathBuf,
    target_duration: u32,
}

impl MediaFileSegmenter {
    pub fn new(program: PathBuf, target_duration: u32) -> Self {
        Self {
            program,
            target_duration,
        }
    }

    fn command(&self, source: &Path, output_dir: &Path) -> ToolCommand {
        let mut cmd = ToolCommand::new(self.program.clone());
        cmd.without_timeout();
        cmd.arg("-a");
        if self.target_duration > 0 {
            cmd.args(["-t", &self.target_duration.to_string()]);
        }
        cmd.args(["-i", PLAYLIST_FILE]);
        cmd.args(["-B", "fileSequence"]);
        cmd.args(["-f", &output_dir.to_string_lossy()]);
        cmd.arg(source.to_string_lossy().as_ref());
        cmd
    }
}

#[async_trait]
impl Segmenter for MediaFileSegmenter {
    fn name(&self) -> &str {
        "mediafilesegmenter"
    }

    async fn segment(&self, source: &Path, output_dir: &Path) -> tc_core::Result<()> {
        tracing::debug!(
            "mediafilesegmenter: {:?} -> {:?} (target_duration={}s)",
            source,
            output_dir,
            self.target_duration
        );
        self.command(source, output_dir).execute().await?;
        Ok(())
    }
}
