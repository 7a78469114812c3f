//! # Teleop Module
//!
//! Turns controller input into servo angles and differential-drive commands.
//!
//! This module handles:
//! - Exclusive axis ownership (one input method per axis)
//! - A shared minimum-interval rate gate
//! - Speed levels that scale every step and power
//! - The (axis, input method) rule table
//! - A session wrapper that runs all three axes each loop tick

pub mod axis;
pub mod controller;
pub mod drive;
pub mod ownership;
pub mod rate_gate;
pub mod rules;
pub mod servo;
pub mod session;
pub mod speed;

pub use axis::{AxisId, InputMethod, ServoAxis};
pub use controller::{ControlProfile, TeleopController};
pub use drive::{Motion, MotorPowers, MotorSink};
pub use ownership::OwnershipTable;
pub use rate_gate::{Clock, MonotonicClock, RateGate};
pub use rules::{Direction, Thresholds};
pub use servo::{ServoPosition, ServoRange};
pub use session::{Bindings, TeleopSession, TickOutput};
pub use speed::SpeedLevel;
