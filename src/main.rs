//! Subdeco
//!
//! A Wayland client that draws its own window decorations: a title bar,
//! eight resize borders and close/maximize/minimize buttons, each on its
//! own subsurface around a plain content surface.

mod config;
mod frame;
mod wayland;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "subdeco=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting subdeco");

    let config = config::Config::load().context("Failed to load configuration")?;

    if let Err(e) = wayland::run(&config) {
        error!("Application error: {:#}", e);
        return Err(e);
    }

    info!("Exited cleanly");
    Ok(())
}
