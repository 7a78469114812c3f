//! Servo accumulator and its travel limits.

/// Default lower servo limit, in degrees.
pub const SERVO_MIN: i32 = 0;
/// Default upper servo limit, in degrees.
pub const SERVO_MAX: i32 = 180;
/// Default starting angle.
pub const SERVO_CENTER: i32 = 90;

/// Inclusive servo travel limits plus the starting angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoRange {
    pub min: i32,
    pub max: i32,
    pub center: i32,
}

impl Default for ServoRange {
    fn default() -> Self {
        Self {
            min: SERVO_MIN,
            max: SERVO_MAX,
            center: SERVO_CENTER,
        }
    }
}

impl ServoRange {
    /// Clamps `value` into `[min, max]`.
    #[must_use]
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }

    /// A position parked at this range's center.
    #[must_use]
    pub fn centered(&self) -> ServoPosition {
        ServoPosition::new(self.clamp(self.center))
    }
}

/// Commanded angle of one servo.
///
/// Owned by the caller and handed to the mapping calls by `&mut`; only the
/// axis owner moves it, and every move is clamped to the controller's
/// [`ServoRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoPosition(i32);

impl Default for ServoPosition {
    fn default() -> Self {
        Self(SERVO_CENTER)
    }
}

impl ServoPosition {
    #[must_use]
    pub const fn new(angle: i32) -> Self {
        Self(angle)
    }

    /// Current angle.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Moves by `delta` and clamps into `range`. Returns true if the angle
    /// changed.
    pub fn step(&mut self, delta: i32, range: &ServoRange) -> bool {
        let next = range.clamp(self.0.saturating_add(delta));
        let changed = next != self.0;
        self.0 = next;
        changed
    }
}
