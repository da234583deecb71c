//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! server, stream and tool sub-configs. Every section defaults sensibly so a
//! completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub stream: StreamConfig,
    pub tools: ToolsConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.stream.segment_timeout_secs == 0 {
            warnings.push(
                "stream.segment_timeout_secs is 0; every segmentation will time out".into(),
            );
        }

        if let Some(ref root) = self.stream.workspace_root {
            if !root.is_dir() {
                warnings.push(format!(
                    "stream.workspace_root {} is not an existing directory",
                    root.display()
                ));
            }
        }

        if self.tools.segment_duration_secs == 0 {
            warnings.push("tools.segment_duration_secs is 0; the segmenter default applies".into());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// How long in-flight requests may run after a shutdown signal.
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            db_path: PathBuf::from("tunecast.db"),
            shutdown_grace_secs: 10,
        }
    }
}

impl ServerConfig {
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// Stream preparation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Parent directory for the scratch workspace (None = system temp dir).
    pub workspace_root: Option<PathBuf>,
    /// Upper bound on a single segmenter run.
    pub segment_timeout_secs: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            workspace_root: None,
            segment_timeout_secs: 300,
        }
    }
}

impl StreamConfig {
    pub fn segment_timeout(&self) -> Duration {
        Duration::from_secs(self.segment_timeout_secs)
    }
}

/// Which external program turns a song into HLS segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmenterKind {
    /// Apple's `mediafilesegmenter`.
    #[default]
    Mediafilesegmenter,
    /// ffmpeg's HLS muxer, configured to mimic mediafilesegmenter's output.
    Ffmpeg,
}

/// Paths to external CLI tools and segmentation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub segmenter: SegmenterKind,
    pub mediafilesegmenter_path: Option<PathBuf>,
    pub ffmpeg_path: Option<PathBuf>,
    pub segment_duration_secs: u32,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            segmenter: SegmenterKind::default(),
            mediafilesegmenter_path: None,
            ffmpeg_path: None,
            segment_duration_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.shutdown_grace(), Duration::from_secs(10));
        assert_eq!(cfg.stream.segment_timeout(), Duration::from_secs(300));
        assert!(cfg.stream.workspace_root.is_none());
        assert_eq!(cfg.tools.segmenter, SegmenterKind::Mediafilesegmenter);
        assert_eq!(cfg.tools.segment_duration_secs, 10);
    }

    #[test]
    fn default_config_no_warnings() {
        let cfg = Config::default();
        let warnings = cfg.validate();
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn zero_timeout_warns() {
        let mut cfg = Config::default();
        cfg.stream.segment_timeout_secs = 0;
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.contains("segment_timeout_secs")));
    }

    #[test]
    fn missing_workspace_root_warns() {
        let mut cfg = Config::default();
        cfg.stream.workspace_root = Some(PathBuf::from("/nonexistent/tunecast/scratch"));
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.contains("workspace_root")));
    }

    #[test]
    fn parse_json_config() {
        let json = r#"{"server": {"port": 9090}, "tools": {"segmenter": "ffmpeg"}}"#;
        let cfg = Config::from_json(json).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.tools.segmenter, SegmenterKind::Ffmpeg);
    }

    #[test]
    fn parse_empty_json_uses_defaults() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.stream.segment_timeout_secs, 300);
    }

    #[test]
    fn unknown_segmenter_is_rejected() {
        let err = Config::from_json(r#"{"tools": {"segmenter": "vlc"}}"#).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn load_or_default_with_none() {
        let cfg = Config::load_or_default(None);
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn load_or_default_with_missing_file() {
        let cfg = Config::load_or_default(Some(Path::new("/nonexistent/config.json")));
        assert_eq!(cfg.server.port, 8080);
    }
}
