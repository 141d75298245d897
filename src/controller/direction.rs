//! # Direction Classifier Module
//!
//! Classifies the left stick into a discrete movement [`Direction`].
//!
//! ## Decision Order
//!
//! 1. Either axis beyond [`ACTIVE_THRESHOLD`]: resolve the angle and look it up
//!    in the sector table below.
//! 2. Both axes at or below [`STOP_THRESHOLD`]: [`Direction::Stop`].
//! 3. Anything in between: keep the previous direction.
//!
//! ## Sector Table
//!
//! Each sector spans 45°, centered on a cardinal or diagonal heading. The
//! robot has no pure strafe gait, so the sectors around 90° and 270° alias to
//! the forward diagonals:
//!
//! | Angle | Direction |
//! |-------|-----------|
//! | [337.5, 22.5) | Forward |
//! | [22.5, 67.5) | ForwardRight |
//! | [67.5, 112.5) | ForwardRight |
//! | [112.5, 157.5) | BackwardRight |
//! | [157.5, 202.5) | Backward |
//! | [202.5, 247.5) | BackwardLeft |
//! | [247.5, 292.5) | ForwardLeft |
//! | [292.5, 337.5) | ForwardLeft |

use std::fmt;

use super::angle::resolve_angle;

/// Deflection beyond this value on either axis is classified.
pub const ACTIVE_THRESHOLD: f32 = 0.8;

/// Deflection at or below this value on both axes is a stop.
pub const STOP_THRESHOLD: f32 = 0.2;

/// Width of one compass sector in degrees.
pub const SECTOR_WIDTH_DEG: f32 = 45.0;

/// Discrete movement command derived from stick deflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Forward,
    ForwardRight,
    BackwardRight,
    Backward,
    BackwardLeft,
    ForwardLeft,
    /// Neutral balance pose, sent as an action rather than a movement.
    #[default]
    Stop,
}

impl Direction {
    /// Returns true for every variant except [`Direction::Stop`].
    #[must_use]
    pub fn is_movement(self) -> bool {
        self != Direction::Stop
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Forward => "forward",
            Direction::ForwardRight => "forward-right",
            Direction::BackwardRight => "backward-right",
            Direction::Backward => "backward",
            Direction::BackwardLeft => "backward-left",
            Direction::ForwardLeft => "forward-left",
            Direction::Stop => "stop",
        };
        f.write_str(name)
    }
}

/// Sector lookup, indexed clockwise from the forward sector.
///
/// Only six directions are reachable: the 90° and 270° sectors fold into
/// the forward diagonals, so there is no pure turn.
const SECTORS: [Direction; 8] = [
    Direction::Forward,
    Direction::ForwardRight,
    Direction::ForwardRight,
    Direction::BackwardRight,
    Direction::Backward,
    Direction::BackwardLeft,
    Direction::ForwardLeft,
    Direction::ForwardLeft,
];

/// Maps an angle in degrees to its sector direction.
///
/// # Examples
///
/// ```
/// use bittle_bridge::controller::direction::{sector_direction, Direction};
///
/// assert_eq!(sector_direction(0.0), Direction::Forward);
/// assert_eq!(sector_direction(337.5), Direction::Forward);
/// assert_eq!(sector_direction(90.0), Direction::ForwardRight);
/// assert_eq!(sector_direction(270.0), Direction::ForwardLeft);
/// ```
#[must_use]
pub fn sector_direction(angle_deg: f32) -> Direction {
    let normalized = angle_deg.rem_euclid(360.0);
    let index = ((normalized + SECTOR_WIDTH_DEG / 2.0) / SECTOR_WIDTH_DEG) as usize % SECTORS.len();
    SECTORS[index]
}

/// Classifies a stick position into a direction.
///
/// # Arguments
///
/// * `x` - Lateral deflection (axis 0)
/// * `y` - Forward deflection (axis 1, negated so forward is positive)
/// * `previous` - Direction from the previous tick, kept inside the dead zone
///
/// # Examples
///
/// ```
/// use bittle_bridge::controller::direction::{classify, Direction};
///
/// assert_eq!(classify(0.0, 1.0, Direction::Stop), Direction::Forward);
/// assert_eq!(classify(0.05, 0.1, Direction::Forward), Direction::Stop);
/// assert_eq!(classify(0.5, 0.5, Direction::Backward), Direction::Backward);
/// ```
#[must_use]
pub fn classify(x: f32, y: f32, previous: Direction) -> Direction {
    if x.abs() > ACTIVE_THRESHOLD || y.abs() > ACTIVE_THRESHOLD {
        return match resolve_angle(x, y) {
            Some(angle) => sector_direction(angle),
            None => previous,
        };
    }

    if x.abs() <= STOP_THRESHOLD && y.abs() <= STOP_THRESHOLD {
        return Direction::Stop;
    }

    previous
}
