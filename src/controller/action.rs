//! # Action Command Module
//!
//! One-shot robot behaviours bound to controller buttons.
//!
//! | Button | Index | Action |
//! |--------|-------|--------|
//! | A | 0 | Balance |
//! | B | 1 | Rest |
//! | X | 2 | Greeting |
//! | Y | 3 | Sit |
//! | LB | 4 | Step |
//! | RB | 5 | Gyro |
//!
//! Higher button indices have no action.

use std::fmt;

use crate::error::{BridgeError, Result};

/// Discrete robot behaviour, fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionCommand {
    Balance,
    Rest,
    Greeting,
    Sit,
    Step,
    /// Toggles the robot's gyro balancing.
    Gyro,
}

/// Button index → action table.
pub const BUTTON_ACTIONS: [ActionCommand; 6] = [
    ActionCommand::Balance,
    ActionCommand::Rest,
    ActionCommand::Greeting,
    ActionCommand::Sit,
    ActionCommand::Step,
    ActionCommand::Gyro,
];

impl ActionCommand {
    /// Looks up the action bound to a button index.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnmappedButton`] for indices without an action.
    ///
    /// # Examples
    ///
    /// ```
    /// use bittle_bridge::controller::action::ActionCommand;
    ///
    /// assert_eq!(ActionCommand::from_button(1).unwrap(), ActionCommand::Rest);
    /// assert!(ActionCommand::from_button(9).is_err());
    /// ```
    pub fn from_button(index: usize) -> Result<Self> {
        BUTTON_ACTIONS
            .get(index)
            .copied()
            .ok_or(BridgeError::UnmappedButton(index))
    }
}

impl fmt::Display for ActionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionCommand::Balance => "balance",
            ActionCommand::Rest => "rest",
            ActionCommand::Greeting => "greeting",
            ActionCommand::Sit => "sit",
            ActionCommand::Step => "step",
            ActionCommand::Gyro => "gyro",
        };
        f.write_str(name)
    }
}
