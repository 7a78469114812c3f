//! # Controller Module
//!
//! PS5 DualSense controller input handling.
//!
//! This module handles:
//! - PS5 controller detection and connection via evdev
//! - Folding gamepad and touchpad events into a state snapshot
//! - The [`InputSource`](input::InputSource) view the teleop core reads

pub mod input;
pub mod mapper;
pub mod ps5;
