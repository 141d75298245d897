//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! The loaded [`Config`] is immutable for the lifetime of the process. The
//! transport flags are resolved once into a [`TransportSelection`].

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

use crate::error::{BridgeError, Result};

/// Minimum cool-down between commands the robot hardware tolerates.
pub const MIN_DISPATCH_COOLDOWN_MS: u64 = 500;

/// Main configuration structure
#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub link: LinkConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub throttle: ThrottleConfig,
}

/// Robot link configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LinkConfig {
    #[serde(default)]
    pub connect_wifi: bool,

    #[serde(default)]
    pub connect_bluetooth: bool,

    #[serde(default = "default_wifi_address")]
    pub wifi_address: String,

    #[serde(default = "default_wifi_port")]
    pub wifi_port: u16,

    #[serde(default = "default_bluetooth_device")]
    pub bluetooth_device: String,

    #[serde(default = "default_bluetooth_port")]
    pub bluetooth_port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Input device configuration
#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    #[serde(default)]
    pub device_path: String,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Dispatch throttle configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ThrottleConfig {
    #[serde(default = "default_dispatch_cooldown_ms")]
    pub dispatch_cooldown_ms: u64,

    #[serde(default = "default_gait_settle_ms")]
    pub gait_settle_ms: u64,
}

/// Transport chosen at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportSelection {
    /// Robot WiFi adapter reachable at `address:port`
    Wifi { address: IpAddr, port: u16 },
    /// Paired robot reachable through an RFCOMM serial port
    Bluetooth { device: String, port: String },
}

// Default value functions
fn default_wifi_address() -> String { "192.168.1.138".to_string() }
fn default_wifi_port() -> u16 { 80 }
fn default_bluetooth_device() -> String { "BittleSPP".to_string() }
fn default_bluetooth_port() -> String { "/dev/rfcomm0".to_string() }
fn default_baud_rate() -> u32 { 115_200 }
fn default_timeout_ms() -> u64 { 2000 }

fn default_poll_interval_ms() -> u64 { 10 }

fn default_dispatch_cooldown_ms() -> u64 { MIN_DISPATCH_COOLDOWN_MS }
fn default_gait_settle_ms() -> u64 { 200 }

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            connect_wifi: false,
            connect_bluetooth: false,
            wifi_address: default_wifi_address(),
            wifi_port: default_wifi_port(),
            bluetooth_device: default_bluetooth_device(),
            bluetooth_port: default_bluetooth_port(),
            baud_rate: default_baud_rate(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            device_path: String::new(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            dispatch_cooldown_ms: default_dispatch_cooldown_ms(),
            gait_settle_ms: default_gait_settle_ms(),
        }
    }
}

fn invalid(msg: impl std::fmt::Display) -> BridgeError {
    BridgeError::Config(toml::de::Error::custom(msg))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bittle_bridge::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// Transport selection is not checked here: choosing neither transport is
    /// a startup error reported by [`Config::transport`].
    fn validate(&self) -> Result<()> {
        if self.link.connect_wifi && self.link.connect_bluetooth {
            return Err(invalid("connect_wifi and connect_bluetooth are mutually exclusive"));
        }

        if self.link.connect_wifi {
            self.link
                .wifi_address
                .parse::<IpAddr>()
                .map_err(|e| invalid(format!("wifi_address '{}': {}", self.link.wifi_address, e)))?;
        }

        if self.link.connect_bluetooth && self.link.bluetooth_port.is_empty() {
            return Err(invalid("bluetooth_port cannot be empty when Bluetooth is selected"));
        }

        if self.link.baud_rate == 0 {
            return Err(invalid("baud_rate must be greater than 0"));
        }

        if self.link.timeout_ms == 0 || self.link.timeout_ms > 60000 {
            return Err(invalid("timeout_ms must be between 1 and 60000"));
        }

        if self.input.poll_interval_ms > 1000 {
            return Err(invalid("poll_interval_ms must be between 0 and 1000"));
        }

        if self.throttle.dispatch_cooldown_ms < MIN_DISPATCH_COOLDOWN_MS
            || self.throttle.dispatch_cooldown_ms > 10000
        {
            return Err(invalid(format!(
                "dispatch_cooldown_ms must be between {} and 10000",
                MIN_DISPATCH_COOLDOWN_MS
            )));
        }

        if self.throttle.gait_settle_ms > 5000 {
            return Err(invalid("gait_settle_ms must be between 0 and 5000"));
        }

        Ok(())
    }

    /// Resolve the transport flags into a single selection
    ///
    /// # Errors
    ///
    /// - [`BridgeError::NoTransport`] when neither transport is enabled
    /// - [`BridgeError::Config`] when both are enabled or the WiFi address is malformed
    pub fn transport(&self) -> Result<TransportSelection> {
        match (self.link.connect_wifi, self.link.connect_bluetooth) {
            (true, false) => {
                let address = self
                    .link
                    .wifi_address
                    .parse::<IpAddr>()
                    .map_err(|e| invalid(format!("wifi_address '{}': {}", self.link.wifi_address, e)))?;
                Ok(TransportSelection::Wifi {
                    address,
                    port: self.link.wifi_port,
                })
            }
            (false, true) => Ok(TransportSelection::Bluetooth {
                device: self.link.bluetooth_device.clone(),
                port: self.link.bluetooth_port.clone(),
            }),
            (true, true) => Err(invalid("connect_wifi and connect_bluetooth are mutually exclusive")),
            (false, false) => Err(BridgeError::NoTransport),
        }
    }

    /// Time bound applied to every Robot Link call
    #[must_use]
    pub fn link_timeout(&self) -> Duration {
        Duration::from_millis(self.link.timeout_ms)
    }

    /// Cool-down enforced after every dispatch
    #[must_use]
    pub fn dispatch_cooldown(&self) -> Duration {
        Duration::from_millis(self.throttle.dispatch_cooldown_ms)
    }

    /// Settle delay after a gait selection
    #[must_use]
    pub fn gait_settle(&self) -> Duration {
        Duration::from_millis(self.throttle.gait_settle_ms)
    }

    /// Delay between input polls
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.input.poll_interval_ms)
    }
}
