//! # Robot Link Module
//!
//! Transports that deliver commands to the robot.
//!
//! This module handles:
//! - The [`RobotLink`] interface used by the input loop
//! - WiFi delivery through the robot's HTTP adapter
//! - Bluetooth delivery through an RFCOMM serial port
//! - Graceful shutdown (Bluetooth parks the robot before disconnecting)

pub mod bluetooth;
pub mod rfcomm_port;
pub mod wifi;

use async_trait::async_trait;

use crate::controller::{ActionCommand, Direction, Gait};
use crate::error::Result;

pub use bluetooth::BluetoothLink;
pub use wifi::WifiLink;

/// Command sink for the robot.
///
/// Calls are issued one at a time from the input loop. Failures are
/// reported, never retried by the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RobotLink: Send {
    /// Connectivity gate checked before sending
    async fn is_connected(&mut self) -> bool;

    /// Send a one-shot action
    async fn send_action(&mut self, action: ActionCommand) -> Result<()>;

    /// Send a movement, or the balance posture for [`Direction::Stop`]
    async fn send_direction(&mut self, direction: Direction, gait: Gait) -> Result<()>;

    /// Leave the robot in a safe state and release the transport
    async fn shutdown(&mut self) -> Result<()>;

    /// Short description for logs
    fn describe(&self) -> String;
}
