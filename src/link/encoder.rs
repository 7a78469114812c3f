//! # Motor Link Encoder
//!
//! Turns drive commands and servo angles into wire frames.

use bytes::{BufMut, Bytes, BytesMut};

use super::crc::crc8_dvb_s2;
use super::protocol::*;
use crate::teleop::MotorPowers;

/// Encode a complete frame: sync + len + type + payload + crc.
///
/// # Examples
///
/// ```
/// use robot_teleop::link::encoder::encode_frame;
/// use robot_teleop::link::protocol::{LinkFrame, FRAMETYPE_MOTOR_POWERS};
///
/// let frame = LinkFrame::new(FRAMETYPE_MOTOR_POWERS, vec![50, 50])?;
/// let bytes = encode_frame(&frame);
/// assert_eq!(&bytes[..4], &[0xA5, 0x04, 0x01, 50]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn encode_frame(frame: &LinkFrame) -> Bytes {
    let mut buf = BytesMut::with_capacity(2 + frame.length() as usize);
    buf.put_u8(LINK_SYNC_BYTE);
    buf.put_u8(frame.length());
    buf.put_u8(frame.frame_type);
    buf.put_slice(&frame.payload);

    // CRC over len + type + payload
    let crc = crc8_dvb_s2(&buf[1..]);
    buf.put_u8(crc);

    buf.freeze()
}

/// Encode a motor powers frame. Powers are clamped to ±100.
pub fn encode_motor_powers(powers: MotorPowers) -> Bytes {
    let frame = LinkFrame {
        frame_type: FRAMETYPE_MOTOR_POWERS,
        payload: vec![
            clamp_motor_power(powers.left) as u8,
            clamp_motor_power(powers.right) as u8,
        ],
    };
    encode_frame(&frame)
}

/// Encode a servo positions frame. Angles are clamped to a byte.
pub fn encode_servo_positions(x: i32, y: i32) -> Bytes {
    let frame = LinkFrame {
        frame_type: FRAMETYPE_SERVO_POSITIONS,
        payload: vec![clamp_servo_angle(x), clamp_servo_angle(y)],
    };
    encode_frame(&frame)
}

/// Clamp a motor power to the wire range (-100..=100).
pub fn clamp_motor_power(power: i32) -> i8 {
    power.clamp(-MOTOR_POWER_LIMIT, MOTOR_POWER_LIMIT) as i8
}

/// Clamp a servo angle to an unsigned byte.
pub fn clamp_servo_angle(angle: i32) -> u8 {
    angle.clamp(0, u8::MAX as i32) as u8
}
