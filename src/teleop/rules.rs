//! # Mapping Rules
//!
//! One table entry per (axis, input method) pair. Each entry is an ordered
//! list of `(signal, outcome)` arms; the first arm whose signal fires wins.
//! Servo axes resolve to a [`Direction`], the drive axis to a [`Motion`].
//!
//! ## Servo rules
//!
//! | Method | X −/+ | Y −/+ |
//! |--------|-------|-------|
//! | Buttons | Square / Circle | Cross / Triangle |
//! | LeftStick | LX < −dz / LX > dz | LY < −dz / LY > dz |
//! | RightStick | RX < −dz / RX > dz | RY < −dz / RY > dz |
//! | Dpad | Left / Right | Down / Up |
//! | Bumpers | L1 / R1 | L1 / R1 |
//! | Triggers | L2 / R2 | L2 / R2 |
//! | JoystickPress | L3 / R3 | L3 / R3 |
//! | Touchpad | x ≤ mid / x > mid | y ≤ mid / y > mid |
//!
//! ## Drive rules
//!
//! | Method | Arms, in priority order |
//! |--------|-------------------------|
//! | Buttons | △ fwd, × back, □ left, ○ right |
//! | Left/RightStick | X>dz right, X<−dz left, Y>dz fwd, Y<−dz back |
//! | Dpad | Up fwd, Down back, Right left, Left right |
//! | Triggers | L2 fwd, R2 back, L1 left, R1 right |
//! | Bumpers | L1 left, R1 right |
//! | JoystickPress | L3 left, R3 right |
//! | Touchpad | x ≤ mid left, x > mid right |
//!
//! The d-pad's reversed rotation (Right spins left) is how the rig has
//! always been driven and is kept as-is.

use crate::controller::input::{Button, InputSource, StickAxis, TouchAxis};

use super::axis::{InputMethod, ServoAxis};
use super::drive::Motion;

/// Default stick dead zone, in signed deflection units.
pub const DEFAULT_STICK_DEADZONE: i32 = 10;
/// Default horizontal touchpad midline.
pub const DEFAULT_TOUCH_MID_X: i32 = 960;
/// Default vertical touchpad midline.
pub const DEFAULT_TOUCH_MID_Y: i32 = 470;

/// Thresholds used to turn analog readings into discrete signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Stick deflection must exceed this magnitude (exclusive).
    pub stick_deadzone: i32,
    /// Touch X at or below this is "left".
    pub touch_mid_x: i32,
    /// Touch Y at or below this is "low".
    pub touch_mid_y: i32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            stick_deadzone: DEFAULT_STICK_DEADZONE,
            touch_mid_x: DEFAULT_TOUCH_MID_X,
            touch_mid_y: DEFAULT_TOUCH_MID_Y,
        }
    }
}

/// Servo step direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Decrease,
    Increase,
}

impl Direction {
    /// Applies the direction's sign to `step`.
    #[must_use]
    pub const fn signed(self, step: i32) -> i32 {
        match self {
            Direction::Decrease => -step,
            Direction::Increase => step,
        }
    }
}

/// A discrete condition read from the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Pressed(Button),
    /// Deflection above the dead zone.
    StickAbove(StickAxis),
    /// Deflection below the negative dead zone.
    StickBelow(StickAxis),
    /// Finger on the pad, coordinate past the midline.
    TouchAbove(TouchAxis),
    /// Finger on the pad, coordinate on or before the midline.
    TouchAtOrBelow(TouchAxis),
}

impl Signal {
    /// Whether this signal is currently active.
    pub fn fires<I: InputSource + ?Sized>(self, input: &I, thresholds: &Thresholds) -> bool {
        let touch_mid = |axis: TouchAxis| match axis {
            TouchAxis::X => thresholds.touch_mid_x,
            TouchAxis::Y => thresholds.touch_mid_y,
        };
        match self {
            Signal::Pressed(button) => input.button(button),
            Signal::StickAbove(axis) => input.stick(axis) > thresholds.stick_deadzone,
            Signal::StickBelow(axis) => input.stick(axis) < -thresholds.stick_deadzone,
            Signal::TouchAbove(axis) => input.touch(axis).is_some_and(|v| v > touch_mid(axis)),
            Signal::TouchAtOrBelow(axis) => {
                input.touch(axis).is_some_and(|v| v <= touch_mid(axis))
            }
        }
    }
}

type ServoArms = &'static [(Signal, Direction)];
type DriveArms = &'static [(Signal, Motion)];

use Direction::{Decrease, Increase};
use Motion::{Backward, Forward, RotateLeft, RotateRight};
use Signal::{Pressed, StickAbove, StickBelow, TouchAbove, TouchAtOrBelow};

const BUMPERS: ServoArms = &[(Pressed(Button::L1), Decrease), (Pressed(Button::R1), Increase)];
const TRIGGERS: ServoArms = &[(Pressed(Button::L2), Decrease), (Pressed(Button::R2), Increase)];
const STICK_CLICKS: ServoArms = &[(Pressed(Button::L3), Decrease), (Pressed(Button::R3), Increase)];

const fn stick_servo(axis: StickAxis) -> [(Signal, Direction); 2] {
    [(StickAbove(axis), Increase), (StickBelow(axis), Decrease)]
}

const fn stick_drive(x: StickAxis, y: StickAxis) -> [(Signal, Motion); 4] {
    [
        (StickAbove(x), RotateRight),
        (StickBelow(x), RotateLeft),
        (StickAbove(y), Forward),
        (StickBelow(y), Backward),
    ]
}

const LEFT_X: [(Signal, Direction); 2] = stick_servo(StickAxis::LeftX);
const LEFT_Y: [(Signal, Direction); 2] = stick_servo(StickAxis::LeftY);
const RIGHT_X: [(Signal, Direction); 2] = stick_servo(StickAxis::RightX);
const RIGHT_Y: [(Signal, Direction); 2] = stick_servo(StickAxis::RightY);
const LEFT_DRIVE: [(Signal, Motion); 4] = stick_drive(StickAxis::LeftX, StickAxis::LeftY);
const RIGHT_DRIVE: [(Signal, Motion); 4] = stick_drive(StickAxis::RightX, StickAxis::RightY);

/// Arms for a servo axis driven by `method`, in priority order.
#[must_use]
pub fn servo_arms(axis: ServoAxis, method: InputMethod) -> &'static [(Signal, Direction)] {
    match (axis, method) {
        (ServoAxis::X, InputMethod::Buttons) => {
            &[(Pressed(Button::Square), Decrease), (Pressed(Button::Circle), Increase)]
        }
        (ServoAxis::Y, InputMethod::Buttons) => {
            &[(Pressed(Button::Cross), Decrease), (Pressed(Button::Triangle), Increase)]
        }
        (ServoAxis::X, InputMethod::LeftStick) => &LEFT_X,
        (ServoAxis::Y, InputMethod::LeftStick) => &LEFT_Y,
        (ServoAxis::X, InputMethod::RightStick) => &RIGHT_X,
        (ServoAxis::Y, InputMethod::RightStick) => &RIGHT_Y,
        (ServoAxis::X, InputMethod::Dpad) => {
            &[(Pressed(Button::DpadLeft), Decrease), (Pressed(Button::DpadRight), Increase)]
        }
        (ServoAxis::Y, InputMethod::Dpad) => {
            &[(Pressed(Button::DpadDown), Decrease), (Pressed(Button::DpadUp), Increase)]
        }
        (_, InputMethod::Bumpers) => BUMPERS,
        (_, InputMethod::Triggers) => TRIGGERS,
        (_, InputMethod::JoystickPress) => STICK_CLICKS,
        (ServoAxis::X, InputMethod::Touchpad) => &[
            (TouchAtOrBelow(TouchAxis::X), Decrease),
            (TouchAbove(TouchAxis::X), Increase),
        ],
        (ServoAxis::Y, InputMethod::Touchpad) => &[
            (TouchAbove(TouchAxis::Y), Increase),
            (TouchAtOrBelow(TouchAxis::Y), Decrease),
        ],
        (_, InputMethod::None) => &[],
    }
}

/// Arms for the drive axis driven by `method`, in priority order.
#[must_use]
pub fn drive_arms(method: InputMethod) -> &'static [(Signal, Motion)] {
    match method {
        InputMethod::Buttons => &[
            (Pressed(Button::Triangle), Forward),
            (Pressed(Button::Cross), Backward),
            (Pressed(Button::Square), RotateLeft),
            (Pressed(Button::Circle), RotateRight),
        ],
        InputMethod::LeftStick => &LEFT_DRIVE,
        InputMethod::RightStick => &RIGHT_DRIVE,
        InputMethod::Dpad => &[
            (Pressed(Button::DpadUp), Forward),
            (Pressed(Button::DpadDown), Backward),
            (Pressed(Button::DpadRight), RotateLeft),
            (Pressed(Button::DpadLeft), RotateRight),
        ],
        InputMethod::Triggers => &[
            (Pressed(Button::L2), Forward),
            (Pressed(Button::R2), Backward),
            (Pressed(Button::L1), RotateLeft),
            (Pressed(Button::R1), RotateRight),
        ],
        InputMethod::Bumpers => &[(Pressed(Button::L1), RotateLeft), (Pressed(Button::R1), RotateRight)],
        InputMethod::JoystickPress => {
            &[(Pressed(Button::L3), RotateLeft), (Pressed(Button::R3), RotateRight)]
        }
        InputMethod::Touchpad => &[
            (TouchAtOrBelow(TouchAxis::X), RotateLeft),
            (TouchAbove(TouchAxis::X), RotateRight),
        ],
        InputMethod::None => &[],
    }
}

/// Resolves the servo direction requested by `method` on `axis`, if any.
pub fn servo_direction<I: InputSource + ?Sized>(
    axis: ServoAxis,
    method: InputMethod,
    input: &I,
    thresholds: &Thresholds,
) -> Option<Direction> {
    first_firing(servo_arms(axis, method), input, thresholds)
}

/// Resolves the drive motion requested by `method`, if any.
pub fn drive_motion<I: InputSource + ?Sized>(
    method: InputMethod,
    input: &I,
    thresholds: &Thresholds,
) -> Option<Motion> {
    first_firing(drive_arms(method), input, thresholds)
}

fn first_firing<T: Copy, I: InputSource + ?Sized>(
    arms: &[(Signal, T)],
    input: &I,
    thresholds: &Thresholds,
) -> Option<T> {
    arms.iter()
        .find(|(signal, _)| signal.fires(input, thresholds))
        .map(|&(_, outcome)| outcome)
}
