use anyhow::{Context, Result};
use clap::Parser;
use sparkify_etl::{run, CliConfig, EtlConfig, FileConfig, SchemaRegistry, SqliteSparkifyStore};
use std::path::PathBuf;
use tracing::{debug, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let resolved = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if resolved.is_absolute() {
        return Ok(resolved);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(resolved))
}

#[derive(Parser, Debug)]
#[command(name = "sparkify-etl")]
#[command(about = "Load the Sparkify song and log datasets into a SQLite star schema")]
struct CliArgs {
    /// Root of the song metadata dataset.
    #[clap(long, value_parser = parse_path)]
    pub song_data: Option<PathBuf>,

    /// Root of the event log dataset.
    #[clap(long, value_parser = parse_path)]
    pub log_data: Option<PathBuf>,

    /// Path to the SQLite database file.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Drop and recreate every table before loading.
    #[clap(long)]
    pub reset: bool,

    /// Path to a TOML config file. Its values override the CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let cli_config = CliConfig {
        song_data_path: cli_args.song_data,
        log_data_path: cli_args.log_data,
        db_path: cli_args.db_path,
        reset: cli_args.reset,
    };
    let config = EtlConfig::resolve(&cli_config, file_config)?;
    debug!("Resolved config: {:?}", config);

    info!("Opening sparkify database at {:?}...", config.db_path);
    let store = SqliteSparkifyStore::new(&config.db_path, SchemaRegistry::sparkify())?;
    if config.reset {
        store.reset_schema()?;
    }

    let summary = run(&store, &config)?;
    debug!("Run summary: {}", serde_json::to_string(&summary)?);

    let counts = summary.table_counts;
    info!("Database contains:");
    info!("  {} songs", counts.songs);
    info!("  {} artists", counts.artists);
    info!("  {} users", counts.users);
    info!("  {} time rows", counts.time);
    info!("  {} songplays", counts.songplays);

    Ok(())
}
