use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tunecast")]
#[command(author, version, about = "Music library server with on-demand HLS audio streaming")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Register the audio files below a directory in the library
    Import {
        /// Directory laid out as <Artist>/<Album>/<NN Title>.<ext>
        #[arg(required = true)]
        dir: PathBuf,

        /// Genre assigned to every imported song and album
        #[arg(long)]
        genre: Option<String>,
    },

    /// Check that the external segmenters are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },
}
