use std::{
    env,
    fs::{self, File},
    io,
    path::PathBuf,
    sync::Mutex,
};

use anyhow::{Context, Result};
use clap::Parser;
use mimalloc::MiMalloc;
use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::{prelude::*, Registry};

use fillboard_cli::{run, Cli};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    enable_logging()?;

    run(&cli.command, &mut io::stdout().lock())
}

fn enable_logging() -> Result<()> {
    let log_path = match env::var_os("FILLBOARD_LOG_PATH") {
        Some(log_path) => PathBuf::from(log_path),
        None => get_default_log_path()?,
    };
    if let Some(log_path_dir) = log_path.parent() {
        if !log_path_dir.as_os_str().is_empty() && !log_path_dir.exists() {
            fs::create_dir_all(log_path_dir)
                .with_context(|| format!("Couldn't create directory {:?}", log_path_dir))?;
        }
    }

    let log_file =
        File::create(&log_path).with_context(|| format!("Couldn't create file {:?}", log_path))?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_writer(io::stderr)
        .with_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        );

    let log_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .with_filter(LevelFilter::from_level(Level::DEBUG));

    Registry::default().with(stderr_layer).with(log_layer).init();

    Ok(())
}

fn get_default_log_path() -> Result<PathBuf> {
    let mut log_path = match dirs::state_dir() {
        Some(state_dir) => state_dir,
        None => dirs::home_dir()
            .context("Home directory not set")?
            .join(".local/state"),
    };
    log_path.push("fillboard");
    log_path.push("fillboard.log");
    Ok(log_path)
}
