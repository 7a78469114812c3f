//! # Robot Teleop Library
//!
//! Drive a two-servo, differential-drive robot with a PS5 DualSense
//! controller.
//!
//! This library provides the pieces between the controller and the motor
//! board: evdev input decoding, the axis ownership and rate-limited mapping
//! core, and a framed serial link for the resulting commands.

pub mod config;
pub mod controller;
pub mod error;
pub mod link;
pub mod logging;
pub mod serial;
pub mod teleop;
