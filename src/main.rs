//! # Bittle Bridge
//!
//! Control a Bittle quadruped robot with a gamepad over WiFi or Bluetooth.
//!
//! Reads the first joystick found under `/dev/input` and forwards stick,
//! button and d-pad input to the robot as OpenCat commands.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::sync::watch;
use tracing::{error, info, warn};

use bittle_bridge::bridge::{InputLoop, LoopSettings};
use bittle_bridge::config::{Config, TransportSelection};
use bittle_bridge::input::EvdevProvider;
use bittle_bridge::link::{BluetoothLink, RobotLink, WifiLink};

/// Configuration file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main entry point for Bittle Bridge application
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load configuration and resolve the transport
///    - Open the robot link and bind the first joystick
///
/// 2. **Main Loop**
///    - Poll the joystick and dispatch commands, pausing after each one
///    - Ctrl+C raises a quit flag checked between dispatches
///
/// 3. **Graceful Shutdown**
///    - Park the robot (Bluetooth sends the rest posture) and disconnect
///
/// # Errors
///
/// Returns error if:
/// - The configuration is invalid or selects no transport
/// - No joystick is found
/// - The Bluetooth port cannot be opened
///
/// # Examples
///
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Bittle Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run().await {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let config = load_config(std::env::args().nth(1))?;

    match config.transport()? {
        TransportSelection::Wifi { address, port } => {
            let link = WifiLink::new(address, port, config.link_timeout());
            drive(&config, link).await
        }
        TransportSelection::Bluetooth { device, port } => {
            let link = BluetoothLink::open(&device, &port, config.link.baud_rate)?;
            drive(&config, link).await
        }
    }
}

fn load_config(path: Option<String>) -> Result<Config> {
    match path {
        Some(path) => {
            Config::load(&path).with_context(|| format!("Failed to load configuration from {}", path))
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Config::load(DEFAULT_CONFIG_PATH)
                .with_context(|| format!("Failed to load configuration from {}", DEFAULT_CONFIG_PATH))
        }
        None => {
            warn!("No configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}

async fn drive<L: RobotLink>(config: &Config, link: L) -> Result<()> {
    info!("Robot link: {}", link.describe());

    let provider = EvdevProvider::with_device_path(&config.input.device_path);
    let mut input_loop = InputLoop::new(provider, link, LoopSettings::from(config));
    input_loop.activate()?;

    // Ctrl+C only raises the quit flag; a send in flight is never cut short
    let (quit_tx, quit_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down...");
            let _ = quit_tx.send(true);
        }
    });

    info!("Press Ctrl+C to exit");
    input_loop.run_until(quit_rx).await?;

    input_loop.shutdown().await;
    info!("Dispatch totals: {:?}", input_loop.stats());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path() {
        assert_eq!(DEFAULT_CONFIG_PATH, "config/default.toml");
    }

    #[test]
    fn test_load_config_missing_explicit_path_fails() {
        let result = load_config(Some("/nonexistent/bittle.toml".to_string()));
        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/bittle.toml"));
    }

    #[test]
    fn test_load_config_explicit_path() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[link]\nconnect_wifi = true\nwifi_address = \"10.0.0.2\"\n")
            .unwrap();
        temp_file.flush().unwrap();

        let config = load_config(Some(temp_file.path().display().to_string())).unwrap();
        assert!(matches!(
            config.transport().unwrap(),
            TransportSelection::Wifi { port: 80, .. }
        ));
    }
}
