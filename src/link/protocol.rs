//! # Motor Link Protocol Constants and Types
//!
//! Frame layout:
//!
//! ```text
//! [sync 0xA5][len][type][payload ...][crc]
//! ```
//!
//! `len` counts type + payload + crc. The CRC covers len + type + payload.

use crate::error::{Result, TeleopError};

/// Frame sync byte (always 0xA5)
pub const LINK_SYNC_BYTE: u8 = 0xA5;

/// Motor powers frame: left and right power as two signed bytes
pub const FRAMETYPE_MOTOR_POWERS: u8 = 0x01;

/// Servo positions frame: X and Y angle as two unsigned bytes
pub const FRAMETYPE_SERVO_POSITIONS: u8 = 0x02;

/// Maximum payload size. Keeps `len` well inside one byte.
pub const LINK_MAX_PAYLOAD_SIZE: usize = 32;

/// Motor powers payload size
pub const MOTOR_POWERS_PAYLOAD_SIZE: usize = 2;

/// Servo positions payload size
pub const SERVO_POSITIONS_PAYLOAD_SIZE: usize = 2;

/// Motor power limit carried on the wire
pub const MOTOR_POWER_LIMIT: i32 = 100;

/// Smallest valid frame: sync + len + type + crc
pub const LINK_MIN_FRAME_SIZE: usize = 4;

/// Motor link frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFrame {
    /// Frame type
    pub frame_type: u8,

    /// Payload data
    pub payload: Vec<u8>,
}

impl LinkFrame {
    /// Create a new frame
    ///
    /// # Errors
    ///
    /// Returns `LinkProtocol` if the payload exceeds [`LINK_MAX_PAYLOAD_SIZE`].
    pub fn new(frame_type: u8, payload: Vec<u8>) -> Result<Self> {
        if payload.len() > LINK_MAX_PAYLOAD_SIZE {
            return Err(TeleopError::LinkProtocol(format!(
                "Payload size {} exceeds maximum {}",
                payload.len(),
                LINK_MAX_PAYLOAD_SIZE
            )));
        }

        Ok(Self {
            frame_type,
            payload,
        })
    }

    /// Frame length field value (type + payload + crc)
    pub fn length(&self) -> u8 {
        (1 + self.payload.len() + 1) as u8
    }
}

/// A decoded command, as the motor board sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkCommand {
    MotorPowers { left: i8, right: i8 },
    ServoPositions { x: u8, y: u8 },
}
