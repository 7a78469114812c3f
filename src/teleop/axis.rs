//! Axis and input-method identifiers.

use serde::Deserialize;
use std::fmt;

/// A logical control dimension of the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisId {
    /// Horizontal (pan) servo.
    X,
    /// Vertical (tilt) servo.
    Y,
    /// Differential drive.
    Drive,
}

impl AxisId {
    /// All axes, in registry order.
    pub const ALL: [AxisId; 3] = [AxisId::X, AxisId::Y, AxisId::Drive];

    pub(crate) const fn index(self) -> usize {
        match self {
            AxisId::X => 0,
            AxisId::Y => 1,
            AxisId::Drive => 2,
        }
    }
}

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AxisId::X => "x",
            AxisId::Y => "y",
            AxisId::Drive => "drive",
        };
        f.write_str(name)
    }
}

/// The two position-controlled axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServoAxis {
    X,
    Y,
}

impl From<ServoAxis> for AxisId {
    fn from(axis: ServoAxis) -> Self {
        match axis {
            ServoAxis::X => AxisId::X,
            ServoAxis::Y => AxisId::Y,
        }
    }
}

/// The physical control surface that drives an axis.
///
/// Deserializes from snake_case names (`left_stick`, `joystick_press`, ...)
/// so bindings can be written directly in the TOML config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMethod {
    /// Face buttons.
    Buttons,
    LeftStick,
    RightStick,
    Dpad,
    /// L1 / R1.
    Bumpers,
    /// L2 / R2 clicks.
    Triggers,
    /// L3 / R3 stick clicks.
    JoystickPress,
    Touchpad,
    /// Unassigned. Never conflicts with anything.
    #[default]
    None,
}

impl fmt::Display for InputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputMethod::Buttons => "buttons",
            InputMethod::LeftStick => "left_stick",
            InputMethod::RightStick => "right_stick",
            InputMethod::Dpad => "dpad",
            InputMethod::Bumpers => "bumpers",
            InputMethod::Triggers => "triggers",
            InputMethod::JoystickPress => "joystick_press",
            InputMethod::Touchpad => "touchpad",
            InputMethod::None => "none",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Binding {
        method: InputMethod,
    }

    #[test]
    fn test_input_method_from_toml() {
        let binding: Binding = toml::from_str(r#"method = "joystick_press""#).unwrap();
        assert_eq!(binding.method, InputMethod::JoystickPress);

        let binding: Binding = toml::from_str(r#"method = "left_stick""#).unwrap();
        assert_eq!(binding.method, InputMethod::LeftStick);
    }

    #[test]
    fn test_input_method_rejects_unknown_name() {
        let result: std::result::Result<Binding, _> = toml::from_str(r#"method = "wiimote""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_display_matches_config_names() {
        assert_eq!(InputMethod::RightStick.to_string(), "right_stick");
        assert_eq!(InputMethod::None.to_string(), "none");
        assert_eq!(AxisId::Drive.to_string(), "drive");
    }

    #[test]
    fn test_servo_axis_into_axis_id() {
        assert_eq!(AxisId::from(ServoAxis::X), AxisId::X);
        assert_eq!(AxisId::from(ServoAxis::Y), AxisId::Y);
    }

    #[test]
    fn test_axis_indices_are_distinct() {
        let indices: Vec<usize> = AxisId::ALL.iter().map(|a| a.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
