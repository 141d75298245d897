//! # Controller Module
//!
//! Interpretation of gamepad state into robot commands.
//!
//! This module handles:
//! - Capturing a per-tick [`snapshot::ControllerSnapshot`]
//! - Resolving the left stick into an angle and a discrete direction
//! - Selecting a gait from the directional pad
//! - Mapping buttons to one-shot actions
//! - Suppressing repeated direction commands

pub mod action;
pub mod angle;
pub mod debounce;
pub mod direction;
pub mod gait;
pub mod snapshot;

pub use action::ActionCommand;
pub use debounce::{CommandDebouncer, ControllerState};
pub use direction::Direction;
pub use gait::Gait;
pub use snapshot::ControllerSnapshot;
