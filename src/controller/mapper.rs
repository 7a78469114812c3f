//! # Controller Event Mapper Module
//!
//! Folds raw evdev events from the PS5 DualSense controller into a
//! [`ControllerState`] snapshot that implements [`InputSource`].
//!
//! The DualSense shows up as several evdev nodes. Two of them matter here:
//!
//! - the **gamepad** node: sticks, d-pad hat and buttons (L2/R2 as clicks)
//! - the **touchpad** node: finger contact and position
//!
//! Both nodes emit `ABS_X`/`ABS_Y`, so their events go through separate entry
//! points ([`EventMapper::process_event`] and
//! [`EventMapper::process_touch_event`]).
//!
//! ## Gamepad Axis Codes (EV_ABS)
//!
//! | Axis | evdev Code | Range |
//! |------|------------|-------|
//! | Left Stick X | ABS_X | 0-255 |
//! | Left Stick Y | ABS_Y | 0-255 |
//! | Right Stick X | ABS_Z | 0-255 |
//! | Right Stick Y | ABS_RZ | 0-255 |
//! | D-Pad X | ABS_HAT0X | -1/0/1 |
//! | D-Pad Y | ABS_HAT0Y | -1/0/1 |
//!
//! ## Button Codes (EV_KEY)
//!
//! | Button | evdev Code |
//! |--------|------------|
//! | Cross (×) | BTN_SOUTH |
//! | Circle (○) | BTN_EAST |
//! | Square (□) | BTN_WEST |
//! | Triangle (△) | BTN_NORTH |
//! | L1 / R1 | BTN_TL / BTN_TR |
//! | L2 / R2 (click) | BTN_TL2 / BTN_TR2 |
//! | Share | BTN_SELECT |
//! | Options | BTN_START |
//! | PS | BTN_MODE |
//! | L3 / R3 | BTN_THUMBL / BTN_THUMBR |
//!
//! ## Touchpad Codes
//!
//! | Input | evdev Code | Range |
//! |-------|------------|-------|
//! | Contact | BTN_TOUCH | 0/1 |
//! | Click | BTN_LEFT | 0/1 |
//! | X | ABS_MT_POSITION_X / ABS_X | 0-1919 |
//! | Y | ABS_MT_POSITION_Y / ABS_Y | 0-1079 |
//!
//! ## Usage
//!
//! ```no_run
//! use robot_teleop::controller::mapper::EventMapper;
//! use robot_teleop::controller::ps5::DualSenseController;
//!
//! let mut controller = DualSenseController::open()?;
//! let mut mapper = EventMapper::new();
//!
//! for event in controller.fetch_events()? {
//!     mapper.process_event(&event);
//! }
//! let state = mapper.state();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use evdev::{AbsoluteAxisType, InputEvent, InputEventKind, Key};

use super::input::{Button, InputSource, StickAxis, TouchAxis};

/// Raw axis value range from DualSense controller.
pub const AXIS_MIN: i32 = 0;
/// Raw axis value range from DualSense controller.
pub const AXIS_MAX: i32 = 255;
/// Raw axis center value.
pub const AXIS_CENTER: i32 = 128;

/// D-Pad axis values.
pub const DPAD_RELEASED: i32 = 0;
/// D-Pad pressed negative direction (left or up).
pub const DPAD_NEGATIVE: i32 = -1;
/// D-Pad pressed positive direction (right or down).
pub const DPAD_POSITIVE: i32 = 1;

/// Complete state of the PS5 DualSense controller.
///
/// Sticks hold raw evdev values (0-255). The [`InputSource`]
/// impl converts sticks to signed deflection around [`AXIS_CENTER`].
///
/// # Examples
///
/// ```
/// use robot_teleop::controller::input::{InputSource, StickAxis};
/// use robot_teleop::controller::mapper::ControllerState;
///
/// let mut state = ControllerState::default();
/// assert_eq!(state.stick(StickAxis::LeftX), 0);
///
/// state.left_stick_y = 0; // pushed fully up
/// assert_eq!(state.stick(StickAxis::LeftY), 128);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerState {
    // Analog sticks (0-255, 128 = center)
    /// Left stick X axis. 0 = full left, 255 = full right.
    pub left_stick_x: i32,
    /// Left stick Y axis. 0 = full up, 255 = full down.
    pub left_stick_y: i32,
    /// Right stick X axis. 0 = full left, 255 = full right.
    pub right_stick_x: i32,
    /// Right stick Y axis. 0 = full up, 255 = full down.
    pub right_stick_y: i32,

    // D-Pad (-1, 0, 1)
    /// D-Pad X axis. -1 = left, 0 = center, 1 = right.
    pub dpad_x: i32,
    /// D-Pad Y axis. -1 = up, 0 = center, 1 = down.
    pub dpad_y: i32,

    // Face buttons
    pub btn_cross: bool,
    pub btn_circle: bool,
    pub btn_square: bool,
    pub btn_triangle: bool,

    // Shoulder buttons
    pub btn_l1: bool,
    pub btn_r1: bool,
    /// L2 digital click.
    pub btn_l2: bool,
    /// R2 digital click.
    pub btn_r2: bool,

    // System buttons
    /// Share button (cycles the speed level).
    pub btn_share: bool,
    pub btn_options: bool,
    pub btn_ps: bool,

    // Stick clicks
    pub btn_l3: bool,
    pub btn_r3: bool,

    // Touchpad
    /// Touchpad click.
    pub btn_touchpad: bool,
    /// A finger is on the touchpad.
    pub touch_active: bool,
    /// Last reported finger X position.
    pub touch_x: i32,
    /// Last reported finger Y position.
    pub touch_y: i32,
}

impl Default for ControllerState {
    /// Sticks centered, triggers and buttons released, no touch.
    fn default() -> Self {
        Self {
            left_stick_x: AXIS_CENTER,
            left_stick_y: AXIS_CENTER,
            right_stick_x: AXIS_CENTER,
            right_stick_y: AXIS_CENTER,

            dpad_x: DPAD_RELEASED,
            dpad_y: DPAD_RELEASED,

            btn_cross: false,
            btn_circle: false,
            btn_square: false,
            btn_triangle: false,
            btn_l1: false,
            btn_r1: false,
            btn_l2: false,
            btn_r2: false,
            btn_share: false,
            btn_options: false,
            btn_ps: false,
            btn_l3: false,
            btn_r3: false,
            btn_touchpad: false,
            touch_active: false,
            touch_x: 0,
            touch_y: 0,
        }
    }
}

impl ControllerState {
    /// Creates a new controller state with default (centered/released) values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputSource for ControllerState {
    fn button(&self, button: Button) -> bool {
        match button {
            Button::Cross => self.btn_cross,
            Button::Circle => self.btn_circle,
            Button::Square => self.btn_square,
            Button::Triangle => self.btn_triangle,
            Button::L1 => self.btn_l1,
            Button::R1 => self.btn_r1,
            Button::L2 => self.btn_l2,
            Button::R2 => self.btn_r2,
            Button::L3 => self.btn_l3,
            Button::R3 => self.btn_r3,
            Button::Share => self.btn_share,
            Button::Options => self.btn_options,
            Button::Ps => self.btn_ps,
            Button::DpadUp => self.dpad_y == DPAD_NEGATIVE,
            Button::DpadDown => self.dpad_y == DPAD_POSITIVE,
            Button::DpadLeft => self.dpad_x == DPAD_NEGATIVE,
            Button::DpadRight => self.dpad_x == DPAD_POSITIVE,
            Button::Touchpad => self.btn_touchpad,
        }
    }

    fn stick(&self, axis: StickAxis) -> i32 {
        // evdev Y grows downward; flip it so up is positive
        match axis {
            StickAxis::LeftX => self.left_stick_x - AXIS_CENTER,
            StickAxis::LeftY => AXIS_CENTER - self.left_stick_y,
            StickAxis::RightX => self.right_stick_x - AXIS_CENTER,
            StickAxis::RightY => AXIS_CENTER - self.right_stick_y,
        }
    }

    fn touch(&self, axis: TouchAxis) -> Option<i32> {
        if !self.touch_active {
            return None;
        }
        match axis {
            TouchAxis::X => Some(self.touch_x),
            TouchAxis::Y => Some(self.touch_y),
        }
    }
}

/// Parses raw evdev events and maintains controller state.
///
/// Not thread-safe; feed it from the single task that owns the device
/// streams.
#[derive(Debug, Default)]
pub struct EventMapper {
    state: ControllerState,
}

impl EventMapper {
    /// Creates a new event mapper with default controller state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ControllerState::default(),
        }
    }

    /// Returns a reference to the current controller state.
    #[must_use]
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Processes one event from the gamepad node.
    pub fn process_event(&mut self, event: &InputEvent) {
        match event.kind() {
            InputEventKind::AbsAxis(axis) => self.process_axis_event(axis, event.value()),
            InputEventKind::Key(key) => self.process_key_event(key, event.value() != 0),
            _ => {
                // Ignore sync events and other event types
            }
        }
    }

    /// Processes one event from the touchpad node.
    pub fn process_touch_event(&mut self, event: &InputEvent) {
        match event.kind() {
            InputEventKind::AbsAxis(axis) => match axis {
                AbsoluteAxisType::ABS_MT_POSITION_X | AbsoluteAxisType::ABS_X => {
                    self.state.touch_x = event.value();
                }
                AbsoluteAxisType::ABS_MT_POSITION_Y | AbsoluteAxisType::ABS_Y => {
                    self.state.touch_y = event.value();
                }
                _ => {}
            },
            InputEventKind::Key(Key::BTN_TOUCH) => self.state.touch_active = event.value() != 0,
            InputEventKind::Key(Key::BTN_LEFT) => self.state.btn_touchpad = event.value() != 0,
            _ => {}
        }
    }

    fn process_axis_event(&mut self, axis: AbsoluteAxisType, value: i32) {
        match axis {
            AbsoluteAxisType::ABS_X => self.state.left_stick_x = value,
            AbsoluteAxisType::ABS_Y => self.state.left_stick_y = value,

            // DualSense puts the right stick on ABS_Z/ABS_RZ
            AbsoluteAxisType::ABS_Z => self.state.right_stick_x = value,
            AbsoluteAxisType::ABS_RZ => self.state.right_stick_y = value,

            AbsoluteAxisType::ABS_HAT0X => self.state.dpad_x = value,
            AbsoluteAxisType::ABS_HAT0Y => self.state.dpad_y = value,

            _ => {
                // Ignore analog triggers, gyro, accelerometer, etc.
            }
        }
    }

    fn process_key_event(&mut self, key: Key, pressed: bool) {
        match key {
            Key::BTN_SOUTH => self.state.btn_cross = pressed,
            Key::BTN_EAST => self.state.btn_circle = pressed,
            Key::BTN_WEST => self.state.btn_square = pressed,
            Key::BTN_NORTH => self.state.btn_triangle = pressed,

            Key::BTN_TL => self.state.btn_l1 = pressed,
            Key::BTN_TR => self.state.btn_r1 = pressed,
            Key::BTN_TL2 => self.state.btn_l2 = pressed,
            Key::BTN_TR2 => self.state.btn_r2 = pressed,

            Key::BTN_SELECT => self.state.btn_share = pressed,
            Key::BTN_START => self.state.btn_options = pressed,
            Key::BTN_MODE => self.state.btn_ps = pressed,

            Key::BTN_THUMBL => self.state.btn_l3 = pressed,
            Key::BTN_THUMBR => self.state.btn_r3 = pressed,

            _ => {}
        }
    }

    /// Lifts the finger and releases the touchpad click.
    ///
    /// Call this when the touchpad stream goes away so a finger that was on
    /// the pad does not keep steering.
    pub fn clear_touch(&mut self) {
        self.state.touch_active = false;
        self.state.btn_touchpad = false;
    }
}
