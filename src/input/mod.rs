//! # Input Device Module
//!
//! Abstraction over the joystick driver.
//!
//! The input loop only talks to an [`InputProvider`]; the Linux
//! implementation lives in [`evdev_provider`]. Readings are indexed the same
//! way a game library would expose them: axes, buttons and hats (pads) by
//! position.

pub mod evdev_provider;

pub use evdev_provider::EvdevProvider;

use crate::controller::ControllerSnapshot;

/// Opaque reference to a device enumerated by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceHandle(pub usize);

/// Provider-level events drained once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The user or the environment asked the program to stop
    Quit,
    /// The bound device disappeared
    DeviceRemoved(DeviceHandle),
}

/// Source of raw joystick readings.
///
/// Implementations are polled from a single task; readings for a tick are
/// taken after [`InputProvider::poll_lifecycle_events`].
#[cfg_attr(test, mockall::automock)]
pub trait InputProvider: Send {
    /// Devices available for binding.
    fn list_devices(&mut self) -> Vec<DeviceHandle>;

    /// Human-readable device name, if known.
    fn device_name(&self, handle: DeviceHandle) -> Option<String>;

    fn axis_count(&self, handle: DeviceHandle) -> usize;
    fn button_count(&self, handle: DeviceHandle) -> usize;
    fn pad_count(&self, handle: DeviceHandle) -> usize;

    /// Axis value in `-1.0..=1.0`.
    fn read_axis(&self, handle: DeviceHandle, index: usize) -> f32;

    fn read_button(&self, handle: DeviceHandle, index: usize) -> bool;

    /// Pad state `(x, y)`, each in `{-1, 0, 1}`, right and up positive.
    fn read_pad(&self, handle: DeviceHandle, index: usize) -> (i8, i8);

    /// Drains pending lifecycle events and refreshes device state.
    fn poll_lifecycle_events(&mut self) -> Vec<LifecycleEvent>;
}

/// Reads every axis, button and pad of a device into a snapshot.
pub fn capture_snapshot<P: InputProvider + ?Sized>(
    provider: &P,
    handle: DeviceHandle,
) -> ControllerSnapshot {
    let axes = (0..provider.axis_count(handle))
        .map(|i| provider.read_axis(handle, i))
        .collect();
    let buttons = (0..provider.button_count(handle))
        .map(|i| provider.read_button(handle, i))
        .collect();
    let pads = (0..provider.pad_count(handle))
        .map(|i| provider.read_pad(handle, i))
        .collect();
    ControllerSnapshot::new(axes, buttons, pads)
}
