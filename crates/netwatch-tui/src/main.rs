//! `netwatch`: live terminal dashboard of established TCP connections.
//!
//! Every refresh the dashboard lists the remote endpoints of established
//! connections, geolocates each distinct peer, and shows the interface
//! throughput split evenly across the rows, headed by this host's public
//! address.
//!
//! Logs go to a file (default `/tmp/netwatch.log`) so they never corrupt
//! the terminal UI.

mod action;
mod app;
mod dashboard;
mod event;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use netwatch_config::Config;
use netwatch_core::{Monitor, MonitorConfig};

use crate::app::App;

/// Live dashboard of established connections, their locations, and bandwidth.
#[derive(Parser, Debug)]
#[command(name = "netwatch", version, about)]
struct Cli {
    /// Config file path (defaults to the per-user config location)
    #[arg(short = 'c', long, env = "NETWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Network interface whose counters drive the bandwidth figures
    #[arg(short = 'i', long)]
    interface: Option<String>,

    /// Log file path (defaults to /tmp/netwatch.log)
    #[arg(long, default_value = "/tmp/netwatch.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing; stdout belongs to the dashboard. The returned guard
/// must outlive the session so buffered lines are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "netwatch={log_level},netwatch_core={log_level},netwatch_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("netwatch.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Layer CLI overrides on top of the loaded configuration.
fn build_monitor_config(cli: &Cli) -> Result<MonitorConfig> {
    let mut config: Config = match &cli.config {
        Some(path) => netwatch_config::load_config_from(path)?,
        None => netwatch_config::load_config()?,
    };
    if let Some(interface) = &cli.interface {
        config.monitor.interface.clone_from(interface);
    }
    Ok(config.to_monitor_config()?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tui::install_hooks()?;

    let cli = Cli::parse();
    let _guard = setup_tracing(&cli);

    let monitor_config = build_monitor_config(&cli)?;
    info!(
        interface = %monitor_config.interface,
        command = ?monitor_config.connection_command,
        "starting netwatch"
    );

    let monitor = Monitor::new(monitor_config)?;
    App::new(monitor).run().await
}
