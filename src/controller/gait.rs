//! # Gait Selector Module
//!
//! Maps the directional pad to a locomotion [`Gait`].
//!
//! | D-Pad | Gait |
//! |-------|------|
//! | Left (-1, 0) | Crawl |
//! | Right (1, 0) | Trot |
//! | Down (0, -1) | Walk |
//! | Up (0, 1) | Run |
//!
//! Any other pad state (released, diagonals) selects nothing.

use std::fmt;

/// Robot locomotion pattern. Persists until the pad selects another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gait {
    #[default]
    Walk,
    Trot,
    Crawl,
    Run,
}

impl fmt::Display for Gait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Gait::Walk => "walk",
            Gait::Trot => "trot",
            Gait::Crawl => "crawl",
            Gait::Run => "run",
        };
        f.write_str(name)
    }
}

/// Selects a gait from a pad state `(x, y)` with up = +1.
///
/// # Examples
///
/// ```
/// use bittle_bridge::controller::gait::{select_gait, Gait};
///
/// assert_eq!(select_gait((-1, 0)), Some(Gait::Crawl));
/// assert_eq!(select_gait((0, 0)), None);
/// ```
#[must_use]
pub fn select_gait(pad: (i8, i8)) -> Option<Gait> {
    match pad {
        (-1, 0) => Some(Gait::Crawl),
        (1, 0) => Some(Gait::Trot),
        (0, -1) => Some(Gait::Walk),
        (0, 1) => Some(Gait::Run),
        _ => None,
    }
}
