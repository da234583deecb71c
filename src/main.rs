mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use tc_core::config::Config;
use tunecast::import;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults from the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "tunecast=debug,tc_server=debug,tc_av=debug,tc_db=debug,tower_http=debug".to_string()
        } else {
            "tunecast=info,tc_server=info,tc_av=info,tc_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Import { dir, genre } => {
            import_library(&dir, genre.as_deref(), cli.config.as_deref())
        }
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
    }
}

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = Config::load_or_default(config_path);
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting tunecast {}", env!("CARGO_PKG_VERSION"));
    tc_server::start(config).await?;
    Ok(())
}

fn import_library(dir: &Path, genre: Option<&str>, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load_or_default(config_path);
    let db_path = &config.server.db_path;
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create {}", parent.display()))?;
        }
    }
    let pool = tc_db::pool::init_pool(&db_path.to_string_lossy())?;

    let summary = import::import_directory(&pool, dir, genre)?;
    println!(
        "Imported {} songs ({} already present, {} failed)",
        summary.added, summary.skipped, summary.failed
    );
    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load_or_default(config_path);
    println!("Checking external tools...\n");

    let registry = tc_av::ToolRegistry::discover(&config.tools);
    for tool in registry.check_all() {
        let status = if tool.available { "✓" } else { "✗" };
        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({version})");
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    let segmenter = match config.tools.segmenter {
        tc_core::config::SegmenterKind::Mediafilesegmenter => "mediafilesegmenter",
        tc_core::config::SegmenterKind::Ffmpeg => "ffmpeg",
    };
    println!();
    match registry.require(segmenter) {
        Ok(_) => println!("Configured segmenter ({segmenter}) is available."),
        Err(_) => println!(
            "Configured segmenter ({segmenter}) is missing; stream requests will fail until it is installed."
        ),
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {}", p.display());
            let contents = std::fs::read_to_string(p)
                .with_context(|| format!("Cannot read {}", p.display()))?;
            let config = Config::from_json(&contents)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Database: {}", config.server.db_path.display());
    println!(
        "  Workspace root: {}",
        config
            .stream
            .workspace_root
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "system temp dir".to_string())
    );
    println!("  Segmenter: {:?}", config.tools.segmenter);

    for warning in config.validate() {
        println!("  warning: {warning}");
    }

    Ok(())
}
