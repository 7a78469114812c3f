//! # Teleop Session
//!
//! Runs one [`TeleopController`] against a fixed set of axis bindings and
//! owns the two servo positions, so the main loop only has to feed input
//! snapshots and forward whatever comes out.
//!
//! All three axes share one rate gate, so within a gate window only the first
//! accepted mapping call does anything. The session rotates the call order
//! after every accepted tick so X, Y and Drive take turns instead of the first
//! binding starving the others.

use tracing::debug;

use crate::controller::input::InputSource;

use super::axis::{AxisId, InputMethod, ServoAxis};
use super::controller::{ControlProfile, TeleopController};
use super::drive::{MotorPowers, MotorSink};
use super::rate_gate::{Clock, MonotonicClock};
use super::servo::ServoPosition;

/// Which input method drives each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    pub x: InputMethod,
    pub y: InputMethod,
    pub drive: InputMethod,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            x: InputMethod::Dpad,
            y: InputMethod::Buttons,
            drive: InputMethod::LeftStick,
        }
    }
}

impl Bindings {
    /// Method bound to `axis`.
    #[must_use]
    pub fn method(&self, axis: AxisId) -> InputMethod {
        match axis {
            AxisId::X => self.x,
            AxisId::Y => self.y,
            AxisId::Drive => self.drive,
        }
    }

    /// First pair of axes bound to the same concrete method, if any.
    #[must_use]
    pub fn duplicate(&self) -> Option<(AxisId, AxisId, InputMethod)> {
        let pairs = [
            (AxisId::X, AxisId::Y),
            (AxisId::X, AxisId::Drive),
            (AxisId::Y, AxisId::Drive),
        ];
        pairs.into_iter().find_map(|(a, b)| {
            let method = self.method(a);
            (method != InputMethod::None && method == self.method(b)).then_some((a, b, method))
        })
    }
}

/// Motor sink that keeps only the latest command for the caller to collect.
#[derive(Debug, Default)]
pub struct PendingCommand {
    latest: Option<MotorPowers>,
}

impl PendingCommand {
    /// Takes the latest command, leaving nothing pending.
    pub fn take(&mut self) -> Option<MotorPowers> {
        self.latest.take()
    }
}

impl MotorSink for PendingCommand {
    fn set_motor_powers(&mut self, powers: MotorPowers) {
        self.latest = Some(powers);
    }
}

/// What one tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutput {
    /// Servo angles after the tick.
    pub servo_x: i32,
    pub servo_y: i32,
    /// True if either servo moved this tick.
    pub servo_changed: bool,
    /// Drive command issued this tick, if any.
    pub motors: Option<MotorPowers>,
}

/// A controller bound to a fixed set of input methods.
#[derive(Debug)]
pub struct TeleopSession<C: Clock = MonotonicClock> {
    controller: TeleopController<C>,
    bindings: Bindings,
    x: ServoPosition,
    y: ServoPosition,
    pending: PendingCommand,
    order: [AxisId; 3],
}

impl TeleopSession<MonotonicClock> {
    #[must_use]
    pub fn new(profile: ControlProfile, bindings: Bindings) -> Self {
        Self::with_controller(TeleopController::new(profile), bindings)
    }
}

impl<C: Clock> TeleopSession<C> {
    /// Wraps an existing controller. Both servos start at the profile's
    /// center.
    pub fn with_controller(controller: TeleopController<C>, bindings: Bindings) -> Self {
        let center = controller.profile().servo_range.centered();
        Self {
            controller,
            bindings,
            x: center,
            y: center,
            pending: PendingCommand::default(),
            order: AxisId::ALL,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &TeleopController<C> {
        &self.controller
    }

    #[must_use]
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Current `(x, y)` servo angles.
    #[must_use]
    pub fn servo_positions(&self) -> (i32, i32) {
        (self.x.get(), self.y.get())
    }

    /// Runs the speed update and one mapping call per bound axis.
    ///
    /// Axes bound to [`InputMethod::None`] are skipped and never take a gate
    /// window.
    pub fn tick<I: InputSource + ?Sized>(&mut self, input: &I) -> TickOutput {
        self.controller.update_speed(input);

        let before = (self.x, self.y);
        let mut served = None;

        for axis in self.order {
            let method = self.bindings.method(axis);
            if method == InputMethod::None {
                continue;
            }

            let last = self.controller.rate_gate().last_accepted();
            match axis {
                AxisId::X => self.controller.servo_by(ServoAxis::X, method, input, &mut self.x),
                AxisId::Y => self.controller.servo_by(ServoAxis::Y, method, input, &mut self.y),
                AxisId::Drive => self.controller.drive_by(method, input, &mut self.pending),
            }
            if self.controller.rate_gate().last_accepted() != last {
                served = Some(axis);
            }
        }

        // Send the axis that just got the tick to the back of the line
        if let Some(axis) = served {
            if let Some(pos) = self.order.iter().position(|&a| a == axis) {
                self.order[pos..].rotate_left(1);
            }
            debug!("Tick served {} axis; next order {:?}", axis, self.order);
        }

        TickOutput {
            servo_x: self.x.get(),
            servo_y: self.y.get(),
            servo_changed: (self.x, self.y) != before,
            motors: self.pending.take(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::mapper::ControllerState;
    use crate::teleop::rate_gate::mocks::ManualClock;

    fn session(bindings: Bindings) -> (TeleopSession<ManualClock>, ManualClock) {
        let clock = ManualClock::new(0);
        let controller = TeleopController::with_clock(ControlProfile::default(), clock.clone());
        (TeleopSession::with_controller(controller, bindings), clock)
    }

    fn busy_state() -> ControllerState {
        let mut state = ControllerState::default();
        state.dpad_x = 1; // X right
        state.btn_triangle = true; // Y up
        state.left_stick_y = 0; // drive forward
        state
    }

    // ==================== Bindings Tests ====================

    #[test]
    fn test_default_bindings_are_distinct() {
        assert_eq!(Bindings::default().duplicate(), None);
    }

    #[test]
    fn test_duplicate_binding_detected() {
        let bindings = Bindings {
            x: InputMethod::Touchpad,
            y: InputMethod::Buttons,
            drive: InputMethod::Touchpad,
        };
        assert_eq!(
            bindings.duplicate(),
            Some((AxisId::X, AxisId::Drive, InputMethod::Touchpad))
        );
    }

    #[test]
    fn test_none_bindings_may_repeat() {
        let bindings = Bindings {
            x: InputMethod::None,
            y: InputMethod::None,
            drive: InputMethod::RightStick,
        };
        assert_eq!(bindings.duplicate(), None);
    }

    // ==================== PendingCommand Tests ====================

    #[test]
    fn test_pending_command_keeps_latest() {
        let mut pending = PendingCommand::default();
        pending.set_motor_powers(MotorPowers::new(50, 50));
        pending.set_motor_powers(MotorPowers::STOP);

        assert_eq!(pending.take(), Some(MotorPowers::STOP));
        assert_eq!(pending.take(), None);
    }

    // ==================== Tick Tests ====================

    #[test]
    fn test_servos_start_centered() {
        let (session, _clock) = session(Bindings::default());
        assert_eq!(session.servo_positions(), (90, 90));
    }

    #[test]
    fn test_one_axis_served_per_gate_window() {
        let (mut session, clock) = session(Bindings::default());
        let state = busy_state();

        let out = session.tick(&state);
        assert_eq!((out.servo_x, out.servo_y), (100, 90));
        assert!(out.servo_changed);
        assert_eq!(out.motors, None);

        // Same window: nothing else happens
        clock.advance(10);
        let out = session.tick(&state);
        assert!(!out.servo_changed);
        assert_eq!(out.motors, None);
    }

    #[test]
    fn test_axes_take_turns() {
        let (mut session, clock) = session(Bindings::default());
        let state = busy_state();

        let first = session.tick(&state);
        clock.advance(50);
        let second = session.tick(&state);
        clock.advance(50);
        let third = session.tick(&state);
        clock.advance(50);
        let fourth = session.tick(&state);

        assert_eq!((first.servo_x, first.servo_y), (100, 90));
        assert_eq!((second.servo_x, second.servo_y), (100, 100));
        assert_eq!(third.motors, Some(MotorPowers::new(50, 50)));
        assert!(!third.servo_changed);
        assert_eq!(fourth.servo_x, 110);
    }

    #[test]
    fn test_all_axes_claimed_on_first_tick() {
        let (mut session, _clock) = session(Bindings::default());
        session.tick(&ControllerState::default());

        let ownership = session.controller().ownership();
        assert_eq!(ownership.owner(AxisId::X), InputMethod::Dpad);
        assert_eq!(ownership.owner(AxisId::Y), InputMethod::Buttons);
        assert_eq!(ownership.owner(AxisId::Drive), InputMethod::LeftStick);
    }

    #[test]
    fn test_idle_drive_tick_sends_stop() {
        let bindings = Bindings {
            x: InputMethod::None,
            y: InputMethod::None,
            drive: InputMethod::Dpad,
        };
        let (mut session, _clock) = session(bindings);

        let out = session.tick(&ControllerState::default());
        assert_eq!(out.motors, Some(MotorPowers::STOP));
    }

    #[test]
    fn test_sole_bound_axis_gets_every_window() {
        let bindings = Bindings {
            x: InputMethod::None,
            y: InputMethod::None,
            drive: InputMethod::Buttons,
        };
        let (mut session, clock) = session(bindings);
        let mut state = ControllerState::default();
        state.btn_triangle = true;

        let mut commands = 0;
        for _ in 0..6 {
            if session.tick(&state).motors == Some(MotorPowers::new(50, 50)) {
                commands += 1;
            }
            clock.advance(50);
        }

        assert_eq!(commands, 6);
        assert_eq!(session.servo_positions(), (90, 90));
    }

    #[test]
    fn test_unbound_axes_stay_unowned() {
        let bindings = Bindings {
            x: InputMethod::None,
            y: InputMethod::Dpad,
            drive: InputMethod::None,
        };
        let (mut session, _clock) = session(bindings);
        session.tick(&ControllerState::default());

        let ownership = session.controller().ownership();
        assert_eq!(ownership.owner(AxisId::X), InputMethod::None);
        assert_eq!(ownership.owner(AxisId::Y), InputMethod::Dpad);
        assert_eq!(ownership.owner(AxisId::Drive), InputMethod::None);
    }

    #[test]
    fn test_speed_button_applies_before_mapping() {
        let (mut session, _clock) = session(Bindings::default());
        let mut state = busy_state();
        state.btn_share = true;

        let out = session.tick(&state);
        assert_eq!(session.controller().speed_level(), 1);
        assert_eq!(out.servo_x, 95);
    }
}
