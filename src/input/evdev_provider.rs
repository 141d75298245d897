//! # Evdev Input Provider
//!
//! Linux joystick provider built on the evdev interface.
//!
//! ## Device Detection
//!
//! A device under `/dev/input/event*` is treated as a joystick when it
//! reports `ABS_X` and `ABS_Y` and at least one gamepad button
//! (`BTN_SOUTH`). A configured device path bypasses the scan.
//!
//! ## Input Layout
//!
//! | Index | Axis | Button | Pad |
//! |-------|------|--------|-----|
//! | 0 | ABS_X | BTN_SOUTH (A) | ABS_HAT0X / ABS_HAT0Y |
//! | 1 | ABS_Y | BTN_EAST (B) | |
//! | 2 | ABS_RX | BTN_NORTH (X) | |
//! | 3 | ABS_RY | BTN_WEST (Y) | |
//! | 4 | ABS_Z | BTN_TL (LB) | |
//! | 5 | ABS_RZ | BTN_TR (RB) | |
//! | 6.. | | SELECT, START, MODE, THUMBL, THUMBR | |
//!
//! Only axes and buttons the device supports are exposed, in table order.
//! evdev reports hat Y as -1 for up, so it is negated to make up positive.

use evdev::{AbsoluteAxisType, Device, Key};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{DeviceHandle, InputProvider, LifecycleEvent};
use crate::error::{BridgeError, Result};

/// Axes exposed to the input loop, in index order.
const AXIS_ORDER: &[AbsoluteAxisType] = &[
    AbsoluteAxisType::ABS_X,
    AbsoluteAxisType::ABS_Y,
    AbsoluteAxisType::ABS_RX,
    AbsoluteAxisType::ABS_RY,
    AbsoluteAxisType::ABS_Z,
    AbsoluteAxisType::ABS_RZ,
];

/// Buttons exposed to the input loop, in index order.
const BUTTON_ORDER: &[Key] = &[
    Key::BTN_SOUTH,
    Key::BTN_EAST,
    Key::BTN_NORTH,
    Key::BTN_WEST,
    Key::BTN_TL,
    Key::BTN_TR,
    Key::BTN_SELECT,
    Key::BTN_START,
    Key::BTN_MODE,
    Key::BTN_THUMBL,
    Key::BTN_THUMBR,
];

/// Raw absolute axis reading with its range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct AbsReading {
    value: i32,
    minimum: i32,
    maximum: i32,
}

/// Scales a raw reading into `-1.0..=1.0`.
fn normalize_axis(reading: AbsReading) -> f32 {
    let span = reading.maximum - reading.minimum;
    if span <= 0 {
        return 0.0;
    }
    let fraction = (reading.value - reading.minimum) as f32 / span as f32;
    (fraction * 2.0 - 1.0).clamp(-1.0, 1.0)
}

/// Converts evdev hat values into a pad state with up positive.
fn pad_from_hat(hat_x: i32, hat_y: i32) -> (i8, i8) {
    (hat_x.signum() as i8, -(hat_y.signum() as i8))
}

/// One bound joystick and its cached state.
struct Joystick {
    device: Device,
    path: PathBuf,
    axes: Vec<AbsoluteAxisType>,
    buttons: Vec<Key>,
    has_pad: bool,
    axis_cache: Vec<AbsReading>,
    button_cache: Vec<bool>,
    pad_cache: (i8, i8),
}

impl Joystick {
    /// Wraps a device if it looks like a gamepad.
    fn probe(device: Device, path: PathBuf) -> Option<Self> {
        let supported_axes = device.supported_absolute_axes()?;
        if !supported_axes.contains(AbsoluteAxisType::ABS_X)
            || !supported_axes.contains(AbsoluteAxisType::ABS_Y)
        {
            return None;
        }
        let supported_keys = device.supported_keys()?;
        if !supported_keys.contains(Key::BTN_SOUTH) {
            return None;
        }

        let axes: Vec<_> = AXIS_ORDER
            .iter()
            .copied()
            .filter(|axis| supported_axes.contains(*axis))
            .collect();
        let buttons: Vec<_> = BUTTON_ORDER
            .iter()
            .copied()
            .filter(|key| supported_keys.contains(*key))
            .collect();
        let has_pad = supported_axes.contains(AbsoluteAxisType::ABS_HAT0X)
            && supported_axes.contains(AbsoluteAxisType::ABS_HAT0Y);

        let mut joystick = Self {
            axis_cache: vec![AbsReading::default(); axes.len()],
            button_cache: vec![false; buttons.len()],
            device,
            path,
            axes,
            buttons,
            has_pad,
            pad_cache: (0, 0),
        };
        // Start from the real resting position rather than zeros
        if let Err(e) = joystick.refresh() {
            debug!("Initial read of {} failed: {}", joystick.path.display(), e);
            return None;
        }
        Some(joystick)
    }

    /// Re-reads axis and key state from the kernel.
    fn refresh(&mut self) -> std::io::Result<()> {
        let abs_state = self.device.get_abs_state()?;
        let reading = |axis: AbsoluteAxisType| {
            abs_state
                .get(axis.0 as usize)
                .map(|info| AbsReading {
                    value: info.value,
                    minimum: info.minimum,
                    maximum: info.maximum,
                })
                .unwrap_or_default()
        };

        for (slot, axis) in self.axis_cache.iter_mut().zip(&self.axes) {
            *slot = reading(*axis);
        }
        if self.has_pad {
            let hat_x = reading(AbsoluteAxisType::ABS_HAT0X).value;
            let hat_y = reading(AbsoluteAxisType::ABS_HAT0Y).value;
            self.pad_cache = pad_from_hat(hat_x, hat_y);
        }

        let key_state = self.device.get_key_state()?;
        for (slot, key) in self.button_cache.iter_mut().zip(&self.buttons) {
            *slot = key_state.contains(*key);
        }
        Ok(())
    }
}

/// Input provider reading joysticks through `/dev/input/event*`.
pub struct EvdevProvider {
    device_path: Option<PathBuf>,
    joysticks: Vec<Joystick>,
    removed: Vec<bool>,
}

impl std::fmt::Debug for EvdevProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let paths: Vec<_> = self.joysticks.iter().map(|j| j.path.display().to_string()).collect();
        f.debug_struct("EvdevProvider")
            .field("device_path", &self.device_path)
            .field("joysticks", &paths)
            .finish_non_exhaustive()
    }
}

impl EvdevProvider {
    /// Creates a provider that scans all event devices.
    #[must_use]
    pub fn new() -> Self {
        Self {
            device_path: None,
            joysticks: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Creates a provider bound to a single device path.
    ///
    /// An empty path falls back to scanning.
    #[must_use]
    pub fn with_device_path(path: &str) -> Self {
        let mut provider = Self::new();
        if !path.is_empty() {
            provider.device_path = Some(PathBuf::from(path));
        }
        provider
    }

    /// Opens the configured device.
    ///
    /// # Errors
    ///
    /// - `Controller`: the device cannot be opened or is not a gamepad
    fn open_configured(path: &Path) -> Result<Joystick> {
        let device = Device::open(path)
            .map_err(|e| BridgeError::Controller(format!("Failed to open {}: {}", path.display(), e)))?;
        Joystick::probe(device, path.to_path_buf()).ok_or_else(|| {
            BridgeError::Controller(format!("{} is not a gamepad", path.display()))
        })
    }

    /// Scans event devices, sorted by path for deterministic selection.
    fn scan() -> Vec<Joystick> {
        let mut devices: Vec<(PathBuf, Device)> = evdev::enumerate().collect();
        devices.sort_by(|a, b| a.0.cmp(&b.0));

        devices
            .into_iter()
            .filter_map(|(path, device)| {
                debug!(
                    "Found input device: {} ({})",
                    path.display(),
                    device.name().unwrap_or("unnamed")
                );
                Joystick::probe(device, path)
            })
            .collect()
    }

    fn joystick(&self, handle: DeviceHandle) -> Option<&Joystick> {
        self.joysticks.get(handle.0)
    }
}

impl Default for EvdevProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InputProvider for EvdevProvider {
    fn list_devices(&mut self) -> Vec<DeviceHandle> {
        if self.joysticks.is_empty() {
            self.joysticks = match &self.device_path {
                Some(path) => match Self::open_configured(path) {
                    Ok(joystick) => vec![joystick],
                    Err(e) => {
                        warn!("{}", e);
                        Vec::new()
                    }
                },
                None => Self::scan(),
            };
            self.removed = vec![false; self.joysticks.len()];
            for joystick in &self.joysticks {
                info!(
                    "Joystick found: {} at {}",
                    joystick.device.name().unwrap_or("unnamed"),
                    joystick.path.display()
                );
            }
        }

        (0..self.joysticks.len())
            .filter(|&i| !self.removed[i])
            .map(DeviceHandle)
            .collect()
    }

    fn device_name(&self, handle: DeviceHandle) -> Option<String> {
        self.joystick(handle)
            .and_then(|j| j.device.name())
            .map(str::to_string)
    }

    fn axis_count(&self, handle: DeviceHandle) -> usize {
        self.joystick(handle).map_or(0, |j| j.axes.len())
    }

    fn button_count(&self, handle: DeviceHandle) -> usize {
        self.joystick(handle).map_or(0, |j| j.buttons.len())
    }

    fn pad_count(&self, handle: DeviceHandle) -> usize {
        self.joystick(handle).map_or(0, |j| usize::from(j.has_pad))
    }

    fn read_axis(&self, handle: DeviceHandle, index: usize) -> f32 {
        self.joystick(handle)
            .and_then(|j| j.axis_cache.get(index).copied())
            .map_or(0.0, normalize_axis)
    }

    fn read_button(&self, handle: DeviceHandle, index: usize) -> bool {
        self.joystick(handle)
            .and_then(|j| j.button_cache.get(index).copied())
            .unwrap_or(false)
    }

    fn read_pad(&self, handle: DeviceHandle, index: usize) -> (i8, i8) {
        match self.joystick(handle) {
            Some(j) if j.has_pad && index == 0 => j.pad_cache,
            _ => (0, 0),
        }
    }

    fn poll_lifecycle_events(&mut self) -> Vec<LifecycleEvent> {
        let mut events = Vec::new();
        for (i, joystick) in self.joysticks.iter_mut().enumerate() {
            if self.removed[i] {
                continue;
            }
            if let Err(e) = joystick.refresh() {
                warn!("Lost joystick at {}: {}", joystick.path.display(), e);
                self.removed[i] = true;
                events.push(LifecycleEvent::DeviceRemoved(DeviceHandle(i)));
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(value: i32, minimum: i32, maximum: i32) -> AbsReading {
        AbsReading { value, minimum, maximum }
    }

    #[test]
    fn test_normalize_unsigned_range() {
        // 8-bit sticks (e.g. DualSense): 0..255
        assert_eq!(normalize_axis(reading(0, 0, 255)), -1.0);
        assert_eq!(normalize_axis(reading(255, 0, 255)), 1.0);
        assert!(normalize_axis(reading(128, 0, 255)).abs() < 0.01);
    }

    #[test]
    fn test_normalize_signed_range() {
        // 16-bit sticks (e.g. xpad): -32768..32767
        assert_eq!(normalize_axis(reading(-32768, -32768, 32767)), -1.0);
        assert_eq!(normalize_axis(reading(32767, -32768, 32767)), 1.0);
        assert!(normalize_axis(reading(0, -32768, 32767)).abs() < 0.001);
    }

    #[test]
    fn test_normalize_out_of_range_is_clamped() {
        assert_eq!(normalize_axis(reading(300, 0, 255)), 1.0);
        assert_eq!(normalize_axis(reading(-5, 0, 255)), -1.0);
    }

    #[test]
    fn test_normalize_degenerate_range() {
        assert_eq!(normalize_axis(reading(5, 0, 0)), 0.0);
        assert_eq!(normalize_axis(reading(5, 10, 0)), 0.0);
    }

    #[test]
    fn test_pad_from_hat_flips_y() {
        assert_eq!(pad_from_hat(0, -1), (0, 1)); // up
        assert_eq!(pad_from_hat(0, 1), (0, -1)); // down
        assert_eq!(pad_from_hat(-1, 0), (-1, 0));
        assert_eq!(pad_from_hat(1, 0), (1, 0));
        assert_eq!(pad_from_hat(0, 0), (0, 0));
    }

    #[test]
    fn test_button_order_starts_with_face_buttons() {
        assert_eq!(BUTTON_ORDER[0], Key::BTN_SOUTH);
        assert_eq!(BUTTON_ORDER[1], Key::BTN_EAST);
        assert_eq!(BUTTON_ORDER[4], Key::BTN_TL);
        assert_eq!(BUTTON_ORDER[5], Key::BTN_TR);
        assert_eq!(AXIS_ORDER[0], AbsoluteAxisType::ABS_X);
        assert_eq!(AXIS_ORDER[1], AbsoluteAxisType::ABS_Y);
    }

    #[test]
    fn test_unknown_handle_reads_neutral() {
        let provider = EvdevProvider::new();
        let handle = DeviceHandle(3);
        assert_eq!(provider.axis_count(handle), 0);
        assert_eq!(provider.read_axis(handle, 0), 0.0);
        assert!(!provider.read_button(handle, 0));
        assert_eq!(provider.read_pad(handle, 0), (0, 0));
        assert_eq!(provider.device_name(handle), None);
    }

    #[test]
    fn test_missing_configured_device_lists_nothing() {
        let mut provider = EvdevProvider::with_device_path("/dev/input/nonexistent_event_12345");
        assert!(provider.list_devices().is_empty());
    }

    #[test]
    fn test_empty_device_path_scans() {
        let provider = EvdevProvider::with_device_path("");
        assert!(provider.device_path.is_none());
    }

    // Integration test - only runs with real hardware
    #[test]
    #[ignore]
    fn test_list_devices_with_real_hardware() {
        // This test requires a connected gamepad
        let mut provider = EvdevProvider::new();
        let devices = provider.list_devices();
        assert!(!devices.is_empty(), "Should detect a connected gamepad");

        let handle = devices[0];
        assert!(provider.axis_count(handle) >= 2);
        assert!(provider.button_count(handle) >= 1);
        assert!(provider.poll_lifecycle_events().is_empty());
        println!("Bound {:?}", provider.device_name(handle));
    }
}
