//! `ripwatch`: terminal dashboard for a headless CD ripping service.
//!
//! Built on [ratatui](https://ratatui.rs). Two background poll loops from
//! `ripwatch-core` feed the ripper's status and log tail into the action
//! loop; the settings screen (`,`) edits the service configuration.
//!
//! Logs are written to a file (default `/tmp/ripwatch.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app launch.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use ripwatch_config::{Config, LanguagePreference};
use ripwatch_core::{Catalog, Dashboard, RipperClient, Translator};

use crate::app::App;

/// Terminal dashboard for a headless CD ripping service.
#[derive(Parser, Debug)]
#[command(name = "ripwatch", version, about)]
struct Cli {
    /// Ripper service URL (e.g., http://ripper.local:8080)
    #[arg(short = 'u', long, env = "RIPWATCH_URL")]
    url: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    init_config: bool,

    /// Log file path (defaults to /tmp/ripwatch.log)
    #[arg(long, default_value = "/tmp/ripwatch.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Nothing may go to stdout/stderr while the
/// terminal is in raw mode. Hold the returned guard until exit so the
/// writer flushes.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "ripwatch={log_level},ripwatch_core={log_level},\
             ripwatch_api={log_level},ripwatch_config={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("ripwatch.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Config file (explicit or canonical) with CLI flags on top.
///
/// A broken canonical file is logged and replaced by defaults; a broken
/// file the user named explicitly is an error.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut cfg = match &cli.config {
        Some(path) => ripwatch_config::load_config_from(path)?,
        None => ripwatch_config::load_config().unwrap_or_else(|e| {
            warn!(error = %e, "config unreadable, using defaults");
            Config::default()
        }),
    };
    if let Some(url) = &cli.url {
        cfg.server.url.clone_from(url);
    }
    Ok(cfg)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let cfg = resolve_config(&cli)?;

    if cli.init_config {
        let path = cli.config.clone().unwrap_or_else(ripwatch_config::config_path);
        ripwatch_config::save_config_to(&path, &cfg)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let base_url = cfg.server_url()?;
    info!(url = %base_url, "starting ripwatch");

    let client = RipperClient::new(base_url.clone(), &cfg.transport())?;
    let translator = Translator::with_store(
        Catalog::builtin(),
        Box::new(LanguagePreference::new()),
        &cfg.ui.default_language,
    );
    let dashboard = Dashboard::new(translator, base_url);

    let mut app = App::new(dashboard, client, cfg.poller(), cfg.alert_lifetime());
    app.run().await?;

    Ok(())
}
