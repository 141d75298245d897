//! # Bittle Bridge Library
//!
//! Control a Bittle quadruped robot with a gamepad over WiFi or Bluetooth.
//!
//! This library turns live joystick state into a de-duplicated, throttled
//! stream of OpenCat commands: stick deflection becomes a movement direction,
//! the d-pad picks the gait and face/shoulder buttons trigger one-shot
//! actions.

pub mod bridge;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod link;
pub mod opencat;
