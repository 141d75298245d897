//! # Controller Snapshot Module
//!
//! Immutable per-tick copy of the raw controller state.
//!
//! Axis values are in provider convention: `-1.0..=1.0`, with axis 1
//! positive when the stick is pulled back. [`ControllerSnapshot::stick`]
//! flips it so that forward is positive.

/// Lateral stick axis index.
pub const AXIS_LATERAL: usize = 0;

/// Vertical stick axis index.
pub const AXIS_VERTICAL: usize = 1;

/// Raw controller state captured once per poll tick.
///
/// # Examples
///
/// ```
/// use bittle_bridge::controller::snapshot::ControllerSnapshot;
///
/// let snapshot = ControllerSnapshot::new(vec![0.0, -1.0], vec![false, true], vec![(0, 0)]);
/// assert_eq!(snapshot.stick(), (0.0, 1.0)); // pushed forward
/// assert_eq!(snapshot.pressed_buttons().collect::<Vec<_>>(), vec![1]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControllerSnapshot {
    axes: Vec<f32>,
    buttons: Vec<bool>,
    pads: Vec<(i8, i8)>,
}

impl ControllerSnapshot {
    /// Creates a snapshot. Axis values are clamped to `-1.0..=1.0`.
    #[must_use]
    pub fn new(axes: Vec<f32>, buttons: Vec<bool>, pads: Vec<(i8, i8)>) -> Self {
        let axes = axes.into_iter().map(|v| v.clamp(-1.0, 1.0)).collect();
        Self { axes, buttons, pads }
    }

    /// Raw axis readings in device order.
    #[must_use]
    pub fn axes(&self) -> &[f32] {
        &self.axes
    }

    /// Button states in device order.
    #[must_use]
    pub fn buttons(&self) -> &[bool] {
        &self.buttons
    }

    /// Directional pad states, `(x, y)` with right and up positive.
    #[must_use]
    pub fn pads(&self) -> &[(i8, i8)] {
        &self.pads
    }

    /// Left stick as `(lateral, forward)`. Missing axes read as centered.
    #[must_use]
    pub fn stick(&self) -> (f32, f32) {
        let x = self.axes.get(AXIS_LATERAL).copied().unwrap_or(0.0);
        let y = self.axes.get(AXIS_VERTICAL).copied().unwrap_or(0.0);
        (x, -y)
    }

    /// Indices of the buttons currently held.
    pub fn pressed_buttons(&self) -> impl Iterator<Item = usize> + '_ {
        self.buttons
            .iter()
            .enumerate()
            .filter_map(|(index, &pressed)| pressed.then_some(index))
    }
}
