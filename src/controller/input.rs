//! # Input Capability
//!
//! The narrow read-only view of a game controller that the teleop core
//! consumes. Anything that can answer these three queries can drive the
//! robot: the live [`ControllerState`](super::mapper::ControllerState) built
//! from evdev events, or a hand-built state in tests.

use std::fmt;

/// Discrete controller buttons.
///
/// The d-pad is exposed as four buttons even though evdev reports it as a
/// pair of hat axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Cross,
    Circle,
    Square,
    Triangle,
    L1,
    R1,
    L2,
    R2,
    L3,
    R3,
    Share,
    Options,
    Ps,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    /// Touchpad click.
    Touchpad,
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Analog stick axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StickAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
}

/// Touchpad coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchAxis {
    /// Horizontal, 0 at the left edge.
    X,
    /// Vertical, 0 at the top edge.
    Y,
}

/// Read access to a controller snapshot.
///
/// All queries are non-blocking reads of already-sampled state.
pub trait InputSource {
    /// Returns true while `button` is held.
    fn button(&self, button: Button) -> bool;

    /// Signed stick deflection, roughly -128..=127.
    ///
    /// Right and up are positive; 0 is centered.
    fn stick(&self, axis: StickAxis) -> i32;

    /// Touchpad coordinate in the pad's native resolution, or `None` when no
    /// finger is on the pad.
    fn touch(&self, axis: TouchAxis) -> Option<i32>;
}
