//! # Motor Link Module
//!
//! Framed serial protocol between the teleop host and the motor/servo board.
//!
//! This module handles:
//! - Motor power and servo position frame encoding
//! - Frame validation and payload decoding on the receiving side
//! - CRC8-DVB-S2 checksum calculation

pub mod crc;
pub mod decoder;
pub mod encoder;
pub mod protocol;
