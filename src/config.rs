//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every section and every key is optional; anything left out falls back to
//! the stock rig (D-pad pans, face buttons tilt, left stick drives).

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::teleop::{Bindings, ControlProfile, InputMethod, ServoRange, Thresholds};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub bindings: BindingsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    /// Empty means auto-detect
    #[serde(default = "default_serial_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Controller configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ControllerConfig {
    /// Gamepad event node; empty means auto-detect
    #[serde(default)]
    pub device_path: String,
}

/// Mapping tuning
#[derive(Debug, Deserialize, Clone)]
pub struct ControlConfig {
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,

    #[serde(default = "default_servo_step")]
    pub servo_step: i32,

    #[serde(default = "default_drive_power")]
    pub drive_power: i32,

    #[serde(default = "default_stick_deadzone")]
    pub stick_deadzone: i32,

    #[serde(default = "default_touch_mid_x")]
    pub touch_mid_x: i32,

    #[serde(default = "default_touch_mid_y")]
    pub touch_mid_y: i32,

    #[serde(default = "default_servo_min")]
    pub servo_min: i32,

    #[serde(default = "default_servo_max")]
    pub servo_max: i32,

    #[serde(default = "default_servo_center")]
    pub servo_center: i32,

    #[serde(default = "default_speed_mode")]
    pub speed_mode: bool,
}

/// Which input method drives each axis
#[derive(Debug, Deserialize, Clone)]
pub struct BindingsConfig {
    #[serde(default = "default_binding_x")]
    pub x: InputMethod,

    #[serde(default = "default_binding_y")]
    pub y: InputMethod,

    #[serde(default = "default_binding_drive")]
    pub drive: InputMethod,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` wins when set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily-rolled log files; console only when unset
    #[serde(default)]
    pub dir: Option<String>,
}

// Default value functions
fn default_serial_port() -> String { "/dev/ttyUSB0".to_string() }
fn default_baud_rate() -> u32 { 115200 }
fn default_timeout_ms() -> u64 { 100 }

fn default_update_interval_ms() -> u64 { 50 }
fn default_servo_step() -> i32 { 10 }
fn default_drive_power() -> i32 { 50 }
fn default_stick_deadzone() -> i32 { 10 }
fn default_touch_mid_x() -> i32 { 960 }
fn default_touch_mid_y() -> i32 { 470 }
fn default_servo_min() -> i32 { 0 }
fn default_servo_max() -> i32 { 180 }
fn default_servo_center() -> i32 { 90 }
fn default_speed_mode() -> bool { true }

fn default_binding_x() -> InputMethod { InputMethod::Dpad }
fn default_binding_y() -> InputMethod { InputMethod::Buttons }
fn default_binding_drive() -> InputMethod { InputMethod::LeftStick }

fn default_log_level() -> String { "info".to_string() }

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_serial_port(),
            baud_rate: default_baud_rate(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: default_update_interval_ms(),
            servo_step: default_servo_step(),
            drive_power: default_drive_power(),
            stick_deadzone: default_stick_deadzone(),
            touch_mid_x: default_touch_mid_x(),
            touch_mid_y: default_touch_mid_y(),
            servo_min: default_servo_min(),
            servo_max: default_servo_max(),
            servo_center: default_servo_center(),
            speed_mode: default_speed_mode(),
        }
    }
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            x: default_binding_x(),
            y: default_binding_y(),
            drive: default_binding_drive(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use robot_teleop::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns `Config` describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.serial.timeout_ms == 0 || self.serial.timeout_ms > 10000 {
            return Err(invalid("timeout_ms must be between 1 and 10000"));
        }

        if ![9600, 57600, 115200, 230400].contains(&self.serial.baud_rate) {
            return Err(invalid("baud_rate must be one of: 9600, 57600, 115200, 230400"));
        }

        let control = &self.control;

        if !(1..=1000).contains(&control.update_interval_ms) {
            return Err(invalid("update_interval_ms must be between 1 and 1000"));
        }

        if control.servo_step <= 0 {
            return Err(invalid("servo_step must be greater than 0"));
        }

        if !(1..=100).contains(&control.drive_power) {
            return Err(invalid("drive_power must be between 1 and 100"));
        }

        if !(0..=127).contains(&control.stick_deadzone) {
            return Err(invalid("stick_deadzone must be between 0 and 127"));
        }

        if control.touch_mid_x < 0 || control.touch_mid_y < 0 {
            return Err(invalid("touch midlines cannot be negative"));
        }

        if control.servo_min < 0 || control.servo_max > 255 {
            return Err(invalid("servo limits must be between 0 and 255"));
        }

        if control.servo_min >= control.servo_max {
            return Err(invalid("servo_min must be less than servo_max"));
        }

        if control.servo_center < control.servo_min || control.servo_center > control.servo_max {
            return Err(invalid("servo_center must be within servo range (servo_min to servo_max)"));
        }

        if let Some((a, b, method)) = self.to_bindings().duplicate() {
            return Err(invalid(format!(
                "{} and {} axes cannot share input method '{}'",
                a, b, method
            )));
        }

        if self.logging.level.trim().is_empty() {
            return Err(invalid("logging level cannot be empty"));
        }

        if let Err(e) = crate::logging::filter_for(&self.logging.level) {
            return Err(invalid(e));
        }

        Ok(())
    }

    /// Mapping profile described by `[control]`.
    pub fn to_profile(&self) -> ControlProfile {
        let control = &self.control;
        ControlProfile {
            update_interval: Duration::from_millis(control.update_interval_ms),
            servo_step: control.servo_step,
            drive_power: control.drive_power,
            servo_range: ServoRange {
                min: control.servo_min,
                max: control.servo_max,
                center: control.servo_center,
            },
            thresholds: Thresholds {
                stick_deadzone: control.stick_deadzone,
                touch_mid_x: control.touch_mid_x,
                touch_mid_y: control.touch_mid_y,
            },
            speed_mode: control.speed_mode,
            ..ControlProfile::default()
        }
    }

    /// Axis bindings described by `[bindings]`.
    pub fn to_bindings(&self) -> Bindings {
        Bindings {
            x: self.bindings.x,
            y: self.bindings.y,
            drive: self.bindings.drive,
        }
    }

    /// Serial read/write timeout.
    pub fn serial_timeout(&self) -> Duration {
        Duration::from_millis(self.serial.timeout_ms)
    }
}

fn invalid(msg: impl std::fmt::Display) -> crate::error::TeleopError {
    crate::error::TeleopError::Config(toml::de::Error::custom(msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TeleopError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn assert_invalid(config: &Config, needle: &str) {
        match config.validate() {
            Err(TeleopError::Config(e)) => assert!(
                e.to_string().contains(needle),
                "expected '{}' in '{}'",
                needle,
                e
            ),
            other => panic!("Expected Config error, got: {:?}", other),
        }
    }

    fn load_str(content: &str) -> Result<Config> {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        Config::load(temp_file.path())
    }

    // ==================== Default Tests ====================

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_default_profile_matches_rig() {
        let profile = Config::default().to_profile();
        assert_eq!(profile, ControlProfile::default());
    }

    #[test]
    fn test_default_bindings() {
        assert_eq!(Config::default().to_bindings(), Bindings::default());
    }

    // ==================== Load Tests ====================

    #[test]
    fn test_load_empty_file_uses_defaults() {
        let config = load_str("").unwrap();
        assert_eq!(config.serial.port, "/dev/ttyUSB0");
        assert_eq!(config.control.update_interval_ms, 50);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.dir.is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let config = load_str(
            r#"
[serial]
port = "/dev/ttyACM0"
baud_rate = 57600

[controller]
device_path = "/dev/input/event5"

[control]
update_interval_ms = 100
drive_power = 80
speed_mode = false

[bindings]
x = "touchpad"
y = "right_stick"
drive = "dpad"

[logging]
level = "debug"
dir = "./logs"
"#,
        )
        .unwrap();

        assert_eq!(config.serial.port, "/dev/ttyACM0");
        assert_eq!(config.serial.baud_rate, 57600);
        assert_eq!(config.controller.device_path, "/dev/input/event5");
        assert_eq!(config.logging.dir.as_deref(), Some("./logs"));

        let profile = config.to_profile();
        assert_eq!(profile.update_interval, Duration::from_millis(100));
        assert_eq!(profile.drive_power, 80);
        assert!(!profile.speed_mode);

        let bindings = config.to_bindings();
        assert_eq!(bindings.x, InputMethod::Touchpad);
        assert_eq!(bindings.y, InputMethod::RightStick);
        assert_eq!(bindings.drive, InputMethod::Dpad);
    }

    #[test]
    fn test_load_unknown_method_fails() {
        let result = load_str("[bindings]\nx = \"mouse\"\n");
        assert!(matches!(result, Err(TeleopError::Config(_))));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = Config::load("/nonexistent/robot-teleop.toml");
        assert!(matches!(result, Err(TeleopError::Io(_))));
    }

    #[test]
    fn test_load_runs_validation() {
        let result = load_str("[control]\ndrive_power = 0\n");
        assert!(matches!(result, Err(TeleopError::Config(_))));
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_timeout_ms_zero() {
        let mut config = Config::default();
        config.serial.timeout_ms = 0;
        assert_invalid(&config, "timeout_ms");
    }

    #[test]
    fn test_invalid_baud_rate() {
        let mut config = Config::default();
        config.serial.baud_rate = 420000;
        assert_invalid(&config, "baud_rate");
    }

    #[test]
    fn test_update_interval_bounds() {
        let mut config = Config::default();
        config.control.update_interval_ms = 0;
        assert_invalid(&config, "update_interval_ms");

        config.control.update_interval_ms = 1001;
        assert_invalid(&config, "update_interval_ms");

        config.control.update_interval_ms = 1000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_servo_step_zero() {
        let mut config = Config::default();
        config.control.servo_step = 0;
        assert_invalid(&config, "servo_step");
    }

    #[test]
    fn test_drive_power_too_high() {
        let mut config = Config::default();
        config.control.drive_power = 101;
        assert_invalid(&config, "drive_power");
    }

    #[test]
    fn test_stick_deadzone_too_high() {
        let mut config = Config::default();
        config.control.stick_deadzone = 128;
        assert_invalid(&config, "stick_deadzone");
    }

    #[test]
    fn test_negative_touch_midline() {
        let mut config = Config::default();
        config.control.touch_mid_y = -1;
        assert_invalid(&config, "touch midlines");
    }

    #[test]
    fn test_servo_min_equals_max() {
        let mut config = Config::default();
        config.control.servo_min = 90;
        config.control.servo_max = 90;
        assert_invalid(&config, "servo_min must be less than servo_max");
    }

    #[test]
    fn test_servo_center_outside_range() {
        let mut config = Config::default();
        config.control.servo_center = 200;
        assert_invalid(&config, "servo_center");
    }

    #[test]
    fn test_servo_max_too_high() {
        let mut config = Config::default();
        config.control.servo_max = 300;
        assert_invalid(&config, "servo limits");
    }

    #[test]
    fn test_duplicate_bindings_rejected() {
        let mut config = Config::default();
        config.bindings.drive = InputMethod::Dpad;
        assert_invalid(&config, "cannot share input method 'dpad'");
    }

    #[test]
    fn test_unbound_axes_allowed() {
        let mut config = Config::default();
        config.bindings.x = InputMethod::None;
        config.bindings.y = InputMethod::None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unparsable_log_level() {
        let mut config = Config::default();
        config.logging.level = "robot_teleop=loud".to_string();
        assert_invalid(&config, "Invalid log level");
    }

    #[test]
    fn test_empty_log_level() {
        let mut config = Config::default();
        config.logging.level = "  ".to_string();
        assert_invalid(&config, "logging level");
    }
}
