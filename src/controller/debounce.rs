//! # Command Debouncer Module
//!
//! Suppresses repeated direction commands and owns the persisted
//! [`ControllerState`].
//!
//! A direction is reported for dispatch only when it differs from the last
//! one dispatched. Buttons are not debounced here; the input loop sends a
//! held button on every tick and relies on the dispatch throttle.
//!
//! ## Usage
//!
//! ```
//! use bittle_bridge::controller::debounce::CommandDebouncer;
//! use bittle_bridge::controller::direction::Direction;
//!
//! let mut debouncer = CommandDebouncer::new();
//! assert_eq!(debouncer.update(0.0, 1.0), Some(Direction::Forward));
//! assert_eq!(debouncer.update(0.0, 1.0), None); // unchanged
//! assert_eq!(debouncer.update(0.0, 0.0), Some(Direction::Stop));
//! ```

use super::direction::{classify, Direction};
use super::gait::Gait;

/// Direction and gait persisted across ticks.
///
/// Starts in [`Direction::Stop`] with [`Gait::Walk`], matching the pose the
/// robot boots into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerState {
    /// Last direction handed to the robot link.
    pub direction: Direction,
    /// Gait applied to the next movement command.
    pub gait: Gait,
}

/// Holds the controller state and decides when a direction must be sent.
#[derive(Debug, Default)]
pub struct CommandDebouncer {
    state: ControllerState,
}

impl CommandDebouncer {
    /// Creates a debouncer in the default state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current persisted state.
    #[must_use]
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Classifies the stick and commits the result when it changed.
    ///
    /// # Arguments
    ///
    /// * `x` - Lateral deflection
    /// * `y` - Forward deflection (forward positive)
    ///
    /// # Returns
    ///
    /// `Some(direction)` when a dispatch is required, `None` otherwise.
    pub fn update(&mut self, x: f32, y: f32) -> Option<Direction> {
        let next = classify(x, y, self.state.direction);
        if next == self.state.direction {
            return None;
        }
        self.state.direction = next;
        Some(next)
    }

    /// Stores a newly selected gait.
    ///
    /// Returns true when the gait actually changed.
    pub fn set_gait(&mut self, gait: Gait) -> bool {
        let changed = self.state.gait != gait;
        self.state.gait = gait;
        changed
    }
}
