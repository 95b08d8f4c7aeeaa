// Prevents console window in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fakeshutdown::config::{self, AppConfig};
use fakeshutdown::error::StartupError;

fn main() -> anyhow::Result<()> {
    let loaded = config::load_config();
    let cfg = loaded.as_ref().cloned().unwrap_or_default();

    // RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level)),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "fakeshutdown starting");
    if let Err(e) = &loaded {
        warn!(error = %e, "using default settings");
    }

    let code = run_native(&cfg).context("could not blank the screens")?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

#[cfg(windows)]
fn run_native(cfg: &AppConfig) -> Result<i32, StartupError> {
    let mut platform = fakeshutdown::platform::NativePlatform::new();
    fakeshutdown::session::run(&mut platform, cfg)
}

#[cfg(not(windows))]
fn run_native(_cfg: &AppConfig) -> Result<i32, StartupError> {
    Err(StartupError::UnsupportedPlatform(std::env::consts::OS))
}
