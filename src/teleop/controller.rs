//! # Teleop Controller
//!
//! Arbitrates which input method drives each axis, throttles actuator
//! updates, and applies the speed-scaled step or power for every accepted
//! move.
//!
//! Every mapping call runs the same sequence:
//!
//! 1. **Ownership**: reject (and log) if another axis holds the method.
//! 2. **Claim**: point the axis at the method, even if it already was.
//! 3. **Rate gate**: drop the call if the shared interval has not elapsed.
//! 4. **Rule**: resolve the method's direction or motion from the input.
//! 5. **Apply**: step and clamp the servo, or command the motors.
//!
//! A rejected call touches nothing, so it never consumes a gate tick.
//!
//! ## Usage
//!
//! ```
//! use robot_teleop::controller::mapper::ControllerState;
//! use robot_teleop::teleop::{ControlProfile, InputMethod, ServoPosition, TeleopController};
//!
//! let mut teleop = TeleopController::new(ControlProfile::default());
//! let mut pan = ServoPosition::new(90);
//!
//! let mut state = ControllerState::default();
//! state.btn_circle = true;
//!
//! teleop.update_speed(&state);
//! teleop.x_by(InputMethod::Buttons, &state, &mut pan);
//! assert_eq!(pan.get(), 100);
//! ```

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::controller::input::{Button, InputSource};

use super::axis::{AxisId, InputMethod, ServoAxis};
use super::drive::{MotorPowers, MotorSink};
use super::ownership::OwnershipTable;
use super::rate_gate::{Clock, MonotonicClock, RateGate, DEFAULT_UPDATE_INTERVAL};
use super::rules::{self, Thresholds};
use super::servo::{ServoPosition, ServoRange};
use super::speed::{self, SpeedLevel};

/// Servo step per accepted update at full speed, in degrees.
pub const DEFAULT_SERVO_STEP: i32 = 10;
/// Drive power per accepted update at full speed.
pub const DEFAULT_DRIVE_POWER: i32 = 50;

/// Tuning for one controller instance.
///
/// `speed_mode` selects between the two rig variants: with it off the speed
/// button is ignored and every move runs at full step.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlProfile {
    pub update_interval: Duration,
    pub servo_step: i32,
    pub drive_power: i32,
    pub servo_range: ServoRange,
    pub thresholds: Thresholds,
    pub speed_mode: bool,
    pub speed_button: Button,
}

impl Default for ControlProfile {
    fn default() -> Self {
        Self {
            update_interval: DEFAULT_UPDATE_INTERVAL,
            servo_step: DEFAULT_SERVO_STEP,
            drive_power: DEFAULT_DRIVE_POWER,
            servo_range: ServoRange::default(),
            thresholds: Thresholds::default(),
            speed_mode: true,
            speed_button: Button::Share,
        }
    }
}

impl ControlProfile {
    /// Default profile without the speed mode.
    #[must_use]
    pub fn fixed_speed() -> Self {
        Self {
            speed_mode: false,
            ..Self::default()
        }
    }
}

/// Axis-ownership arbiter and rate-limited input mapper.
///
/// Single-threaded by construction: every operation takes `&mut self` and
/// returns immediately.
#[derive(Debug)]
pub struct TeleopController<C: Clock = MonotonicClock> {
    profile: ControlProfile,
    clock: C,
    gate: RateGate,
    ownership: OwnershipTable,
    speed: SpeedLevel,
}

impl TeleopController<MonotonicClock> {
    /// Creates a controller timed by the system monotonic clock.
    #[must_use]
    pub fn new(profile: ControlProfile) -> Self {
        Self::with_clock(profile, MonotonicClock::new())
    }
}

impl<C: Clock> TeleopController<C> {
    /// Creates a controller with an explicit time source.
    pub fn with_clock(profile: ControlProfile, clock: C) -> Self {
        Self {
            gate: RateGate::new(profile.update_interval),
            profile,
            clock,
            ownership: OwnershipTable::new(),
            speed: SpeedLevel::new(),
        }
    }

    #[must_use]
    pub fn profile(&self) -> &ControlProfile {
        &self.profile
    }

    #[must_use]
    pub fn ownership(&self) -> &OwnershipTable {
        &self.ownership
    }

    #[must_use]
    pub fn rate_gate(&self) -> &RateGate {
        &self.gate
    }

    /// Current speed level, 0..=2. Always 0 without speed mode.
    #[must_use]
    pub fn speed_level(&self) -> u8 {
        self.speed.level()
    }

    /// Multiplier applied to steps and powers.
    #[must_use]
    pub fn speed_multiplier(&self) -> f32 {
        if self.profile.speed_mode {
            self.speed.multiplier()
        } else {
            1.0
        }
    }

    /// Servo step after speed scaling.
    #[must_use]
    pub fn servo_step(&self) -> i32 {
        speed::scale(self.profile.servo_step, self.speed_multiplier())
    }

    /// Drive power after speed scaling.
    #[must_use]
    pub fn drive_power(&self) -> i32 {
        speed::scale(self.profile.drive_power, self.speed_multiplier())
    }

    /// Consumes a rate-gate tick if the interval has elapsed.
    pub fn can_update(&mut self) -> bool {
        self.gate.try_accept(self.clock.now_ms())
    }

    /// Returns true, and logs, if `method` is already driving an axis other
    /// than `axis`.
    pub fn check_conflict(&self, method: InputMethod, axis: AxisId) -> bool {
        match self.ownership.conflicting_axis(method, axis) {
            Some(owner) => {
                warn!(
                    "Input method '{}' already drives the '{}' axis; cannot assign it to '{}'",
                    method, owner, axis
                );
                true
            }
            None => false,
        }
    }

    /// Samples the speed button and advances the level on a rising edge.
    ///
    /// Call once per loop iteration. Does nothing without speed mode.
    pub fn update_speed<I: InputSource + ?Sized>(&mut self, input: &I) {
        if !self.profile.speed_mode {
            return;
        }
        if let Some(level) = self.speed.sample(input.button(self.profile.speed_button)) {
            info!(
                "Speed level: {} ({}%)",
                level,
                (speed::multiplier_for(level) * 100.0).round()
            );
        }
    }

    /// Drives the X servo with `method`.
    pub fn x_by<I: InputSource + ?Sized>(
        &mut self,
        method: InputMethod,
        input: &I,
        position: &mut ServoPosition,
    ) {
        self.servo_by(ServoAxis::X, method, input, position);
    }

    /// Drives the Y servo with `method`.
    pub fn y_by<I: InputSource + ?Sized>(
        &mut self,
        method: InputMethod,
        input: &I,
        position: &mut ServoPosition,
    ) {
        self.servo_by(ServoAxis::Y, method, input, position);
    }

    /// Drives servo `axis` with `method`.
    pub fn servo_by<I: InputSource + ?Sized>(
        &mut self,
        axis: ServoAxis,
        method: InputMethod,
        input: &I,
        position: &mut ServoPosition,
    ) {
        if !self.claim(method, axis.into()) {
            return;
        }
        if !self.can_update() {
            return;
        }

        let Some(direction) =
            rules::servo_direction(axis, method, input, &self.profile.thresholds)
        else {
            return;
        };

        let delta = direction.signed(self.servo_step());
        if position.step(delta, &self.profile.servo_range) {
            debug!("Servo {:?} -> {} (by {})", axis, position.get(), method);
        }
    }

    /// Drives the differential drive with `method`, commanding `sink` once.
    ///
    /// No active input commands a stop.
    pub fn drive_by<I, S>(&mut self, method: InputMethod, input: &I, sink: &mut S)
    where
        I: InputSource + ?Sized,
        S: MotorSink + ?Sized,
    {
        if !self.claim(method, AxisId::Drive) {
            return;
        }
        if !self.can_update() {
            return;
        }

        let powers = rules::drive_motion(method, input, &self.profile.thresholds)
            .map_or(MotorPowers::STOP, |motion| motion.powers(self.drive_power()));
        sink.set_motor_powers(powers);
    }

    /// Ownership check plus unconditional (re)assignment.
    fn claim(&mut self, method: InputMethod, axis: AxisId) -> bool {
        if self.check_conflict(method, axis) {
            return false;
        }
        self.ownership.assign(axis, method);
        true
    }
}
