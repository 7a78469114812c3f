//! # Motor Link Decoder
//!
//! Validates frames and decodes their payloads. Used on the board side of
//! the link and to check what the host puts on the wire.

use super::crc::crc8_dvb_s2;
use super::protocol::*;
use crate::error::{Result, TeleopError};

/// Decode one complete frame.
///
/// Trailing bytes after the frame are ignored.
///
/// # Errors
///
/// Returns `LinkProtocol` if:
/// - Frame is too short
/// - Sync byte is incorrect
/// - Length field is out of range
/// - CRC check fails
pub fn decode_frame(frame: &[u8]) -> Result<LinkFrame> {
    if frame.len() < LINK_MIN_FRAME_SIZE {
        return Err(TeleopError::LinkProtocol("Frame too short".to_string()));
    }

    if frame[0] != LINK_SYNC_BYTE {
        return Err(TeleopError::LinkProtocol(format!(
            "Invalid sync byte: 0x{:02X}",
            frame[0]
        )));
    }

    let length = frame[1] as usize;
    if length < 2 {
        return Err(TeleopError::LinkProtocol(format!(
            "Invalid length field: {}",
            length
        )));
    }

    // sync(1) + len(1) + [type + payload + crc]
    if frame.len() < 2 + length {
        return Err(TeleopError::LinkProtocol(format!(
            "Frame too short: expected {} bytes, got {}",
            2 + length,
            frame.len()
        )));
    }

    let received_crc = frame[1 + length];
    let calculated_crc = crc8_dvb_s2(&frame[1..1 + length]);
    if calculated_crc != received_crc {
        return Err(TeleopError::LinkProtocol(format!(
            "CRC mismatch: expected 0x{:02X}, got 0x{:02X}",
            calculated_crc, received_crc
        )));
    }

    LinkFrame::new(frame[2], frame[3..1 + length].to_vec())
}

/// Decode a frame's payload into a command.
///
/// # Errors
///
/// Returns `LinkProtocol` for unknown frame types or short payloads.
pub fn decode_command(frame: &LinkFrame) -> Result<LinkCommand> {
    match frame.frame_type {
        FRAMETYPE_MOTOR_POWERS => {
            let [left, right] = two_bytes(&frame.payload, "Motor powers")?;
            Ok(LinkCommand::MotorPowers {
                left: left as i8,
                right: right as i8,
            })
        }
        FRAMETYPE_SERVO_POSITIONS => {
            let [x, y] = two_bytes(&frame.payload, "Servo positions")?;
            Ok(LinkCommand::ServoPositions { x, y })
        }
        other => Err(TeleopError::LinkProtocol(format!(
            "Unknown frame type: 0x{:02X}",
            other
        ))),
    }
}

fn two_bytes(payload: &[u8], what: &str) -> Result<[u8; 2]> {
    match payload {
        [a, b, ..] => Ok([*a, *b]),
        _ => Err(TeleopError::LinkProtocol(format!(
            "{} payload too short: {} bytes",
            what,
            payload.len()
        ))),
    }
}
