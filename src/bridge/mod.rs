//! # Bridge Module
//!
//! Ties controller input to the robot link.
//!
//! This module handles:
//! - The polling loop and its Idle/Active/Terminated lifecycle
//! - The cool-down enforced between commands

pub mod input_loop;
pub mod throttle;

pub use input_loop::{DispatchStats, InputLoop, LoopSettings, LoopState};
pub use throttle::DispatchThrottle;
