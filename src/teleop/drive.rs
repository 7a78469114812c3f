//! Differential-drive output types.

/// Power commands for the left and right drive channels.
///
/// Nominal range is -100..=100; positive drives the wheel forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotorPowers {
    pub left: i32,
    pub right: i32,
}

impl MotorPowers {
    /// Both motors off.
    pub const STOP: MotorPowers = MotorPowers { left: 0, right: 0 };

    #[must_use]
    pub const fn new(left: i32, right: i32) -> Self {
        Self { left, right }
    }
}

/// Requested drive motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Forward,
    Backward,
    /// Spin counter-clockwise in place.
    RotateLeft,
    /// Spin clockwise in place.
    RotateRight,
}

impl Motion {
    /// Signs `power` onto the two channels for this motion.
    ///
    /// ```
    /// use robot_teleop::teleop::{Motion, MotorPowers};
    ///
    /// assert_eq!(Motion::RotateLeft.powers(50), MotorPowers::new(-50, 50));
    /// ```
    #[must_use]
    pub const fn powers(self, power: i32) -> MotorPowers {
        match self {
            Motion::Forward => MotorPowers::new(power, power),
            Motion::Backward => MotorPowers::new(-power, -power),
            Motion::RotateLeft => MotorPowers::new(-power, power),
            Motion::RotateRight => MotorPowers::new(power, -power),
        }
    }
}

/// Anything that accepts drive commands.
///
/// Sending the same pair repeatedly must be safe.
#[cfg_attr(test, mockall::automock)]
pub trait MotorSink {
    fn set_motor_powers(&mut self, powers: MotorPowers);
}
