//! # Bluetooth Link Module
//!
//! Talks to the robot over its Bluetooth serial (SPP) module.
//!
//! The paired robot is expected to be bound to an RFCOMM device such as
//! `/dev/rfcomm0`. Commands are OpenCat tokens terminated by a newline.
//! Shutdown parks the robot in the rest posture before closing the port.

use async_trait::async_trait;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info};

use super::rfcomm_port::{RfcommPort, SerialRfcommPort};
use super::RobotLink;
use crate::controller::{ActionCommand, Direction, Gait};
use crate::error::{BridgeError, Result};
use crate::opencat::encoder::{encode_action, encode_direction, frame_serial};

/// Bluetooth serial link to the robot
///
/// Generic over the port so tests can substitute an in-memory mock.
pub struct BluetoothLink<P: RfcommPort = SerialRfcommPort> {
    /// Open port, `None` once disconnected
    port: Option<P>,
    /// Paired device identifier
    device: String,
    /// RFCOMM device path (e.g., /dev/rfcomm0)
    port_path: String,
}

impl<P: RfcommPort> std::fmt::Debug for BluetoothLink<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BluetoothLink")
            .field("device", &self.device)
            .field("port_path", &self.port_path)
            .field("connected", &self.port.is_some())
            .finish_non_exhaustive()
    }
}

impl BluetoothLink<SerialRfcommPort> {
    /// Open the RFCOMM port bound to the robot
    ///
    /// # Arguments
    ///
    /// * `device` - Paired device identifier, used for logging
    /// * `port_path` - RFCOMM device path (e.g., "/dev/rfcomm0")
    /// * `baud_rate` - Serial baud rate
    ///
    /// # Errors
    ///
    /// Returns `Link` error if the port cannot be opened
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bittle_bridge::link::bluetooth::BluetoothLink;
    ///
    /// let link = BluetoothLink::open("BittleSPP", "/dev/rfcomm0", 115_200)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(device: &str, port_path: &str, baud_rate: u32) -> Result<Self> {
        debug!("Opening Bluetooth serial port {} for {}", port_path, device);
        let stream = tokio_serial::new(port_path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| BridgeError::Link(format!("Failed to open {}: {}", port_path, e)))?;

        info!("Connected to {} over Bluetooth at {}", device, port_path);
        Ok(Self::from_port(SerialRfcommPort::new(stream), device, port_path))
    }
}

impl<P: RfcommPort> BluetoothLink<P> {
    /// Wrap an already opened port
    pub fn from_port(port: P, device: &str, port_path: &str) -> Self {
        Self {
            port: Some(port),
            device: device.to_string(),
            port_path: port_path.to_string(),
        }
    }

    /// Get the RFCOMM device path
    pub fn port_path(&self) -> &str {
        &self.port_path
    }

    async fn send_token(&mut self, token: &str) -> Result<()> {
        let port = self.port.as_mut().ok_or(BridgeError::NotConnected)?;
        let frame = frame_serial(token);

        port.send_frame(&frame)
            .await
            .map_err(|e| BridgeError::Link(format!("Failed to write command: {}", e)))?;

        debug!("Sent '{}' over Bluetooth ({} bytes)", token, frame.len());
        Ok(())
    }
}

#[async_trait]
impl<P: RfcommPort> RobotLink for BluetoothLink<P> {
    async fn is_connected(&mut self) -> bool {
        self.port.is_some()
    }

    async fn send_action(&mut self, action: ActionCommand) -> Result<()> {
        self.send_token(&encode_action(action)).await
    }

    async fn send_direction(&mut self, direction: Direction, gait: Gait) -> Result<()> {
        self.send_token(&encode_direction(direction, gait)).await
    }

    async fn shutdown(&mut self) -> Result<()> {
        if self.port.is_none() {
            return Ok(());
        }
        info!("Closing Bluetooth connection with {}", self.device);
        let result = self.send_action(ActionCommand::Rest).await;
        // Release the port even when the rest command failed
        if let Some(mut port) = self.port.take() {
            if let Err(e) = port.close().await {
                debug!("Closing {} failed: {}", self.port_path, e);
            }
        }
        result?;
        info!("Connection closed");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("Bluetooth {} ({})", self.device, self.port_path)
    }
}
