//! # Speed Level
//!
//! Cyclic 0 → 1 → 2 → 0 level advanced on rising edges of the speed button.
//! The level scales every servo step and drive power.
//!
//! | Level | Multiplier |
//! |-------|------------|
//! | 0 | 1.0 |
//! | 1 | 0.5 |
//! | 2 | 0.75 |

/// Number of distinct speed levels.
pub const SPEED_LEVELS: u8 = 3;

/// Multiplier for a speed level. Out-of-range levels fall back to full speed.
#[must_use]
pub fn multiplier_for(level: u8) -> f32 {
    match level {
        1 => 0.5,
        2 => 0.75,
        _ => 1.0,
    }
}

/// Scales `base` by `multiplier`, rounding half away from zero.
///
/// ```
/// use robot_teleop::teleop::speed::scale;
///
/// assert_eq!(scale(10, 0.75), 8);
/// assert_eq!(scale(50, 0.75), 38);
/// ```
#[must_use]
pub fn scale(base: i32, multiplier: f32) -> i32 {
    (base as f32 * multiplier).round() as i32
}

/// Speed level plus the previous button sample needed for edge detection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeedLevel {
    level: u8,
    was_pressed: bool,
}

impl SpeedLevel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current level, 0..=2.
    #[must_use]
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Multiplier for the current level.
    #[must_use]
    pub fn multiplier(&self) -> f32 {
        multiplier_for(self.level)
    }

    /// Feeds one button sample. Returns the new level when a rising edge
    /// advanced it.
    pub fn sample(&mut self, pressed: bool) -> Option<u8> {
        let rising = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        if !rising {
            return None;
        }
        self.level = (self.level + 1) % SPEED_LEVELS;
        Some(self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_full_speed() {
        let speed = SpeedLevel::new();
        assert_eq!(speed.level(), 0);
        assert_eq!(speed.multiplier(), 1.0);
    }

    #[test]
    fn test_multiplier_table() {
        assert_eq!(multiplier_for(0), 1.0);
        assert_eq!(multiplier_for(1), 0.5);
        assert_eq!(multiplier_for(2), 0.75);
        assert_eq!(multiplier_for(7), 1.0);
    }

    #[test]
    fn test_scaled_steps() {
        // Servo base step
        assert_eq!(scale(10, multiplier_for(0)), 10);
        assert_eq!(scale(10, multiplier_for(1)), 5);
        assert_eq!(scale(10, multiplier_for(2)), 8);

        // Drive base power
        assert_eq!(scale(50, multiplier_for(0)), 50);
        assert_eq!(scale(50, multiplier_for(1)), 25);
        assert_eq!(scale(50, multiplier_for(2)), 38);
    }

    #[test]
    fn test_cycles_on_rising_edges() {
        let mut speed = SpeedLevel::new();
        let mut seen = Vec::new();

        for _ in 0..4 {
            if let Some(level) = speed.sample(true) {
                seen.push(level);
            }
            speed.sample(false);
        }

        assert_eq!(seen, vec![1, 2, 0, 1]);
    }

    #[test]
    fn test_holding_does_not_repeat() {
        let mut speed = SpeedLevel::new();

        assert_eq!(speed.sample(true), Some(1));
        for _ in 0..10 {
            assert_eq!(speed.sample(true), None);
        }
        assert_eq!(speed.level(), 1);
    }

    #[test]
    fn test_release_alone_does_nothing() {
        let mut speed = SpeedLevel::new();
        assert_eq!(speed.sample(false), None);
        assert_eq!(speed.sample(false), None);
        assert_eq!(speed.level(), 0);
    }
}
