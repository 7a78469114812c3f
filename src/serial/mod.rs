//! # Serial Communication Module
//!
//! Handles the serial connection to the motor/servo board.
//!
//! This module handles:
//! - Opening the board's serial port (8N1, configurable baud rate)
//! - Writing motor power and servo position frames
//! - Auto-detecting the port when none is configured

pub mod port_trait;

use std::time::Duration;

use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, error, info, warn};

use crate::error::{Result, TeleopError};
use crate::link::encoder::{encode_motor_powers, encode_servo_positions};
use crate::teleop::MotorPowers;
use port_trait::{SerialPortIO, TokioSerialPort};

/// Default baud rate for the motor board
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Device paths tried when no port is configured (in order of preference)
const DEFAULT_DEVICE_PATHS: &[&str] = &[
    "/dev/ttyUSB0", // USB-to-serial adapters
    "/dev/ttyACM0", // USB CDC boards
];

/// Serial link to the motor/servo board
pub struct MotorSerial<P: SerialPortIO = TokioSerialPort> {
    port: P,
    /// Device path (e.g., /dev/ttyUSB0)
    device_path: String,
}

impl<P: SerialPortIO> std::fmt::Debug for MotorSerial<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotorSerial")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl MotorSerial<TokioSerialPort> {
    /// Open the configured port, or auto-detect one when `path` is empty.
    ///
    /// # Errors
    ///
    /// Returns `Serial` if the configured port cannot be opened, or
    /// `SerialPortNotFound` if auto-detection finds nothing.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use robot_teleop::serial::MotorSerial;
    ///
    /// let serial = MotorSerial::open("/dev/ttyUSB0", 115_200, Duration::from_millis(100))?;
    /// println!("Connected to: {}", serial.device_path());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(path: &str, baud_rate: u32, timeout: Duration) -> Result<Self> {
        if path.is_empty() {
            return Self::open_with_paths(DEFAULT_DEVICE_PATHS, baud_rate, timeout);
        }

        let port = Self::open_port(path, baud_rate, timeout)?;
        info!("Opened motor board at {} ({} baud)", path, baud_rate);
        Ok(Self::from_port(port, path))
    }

    /// Try each path in turn and keep the first one that opens.
    ///
    /// # Errors
    ///
    /// Returns `SerialPortNotFound` listing every path tried.
    pub fn open_with_paths(paths: &[&str], baud_rate: u32, timeout: Duration) -> Result<Self> {
        for path in paths {
            debug!("Trying to open serial port: {}", path);

            match Self::open_port(path, baud_rate, timeout) {
                Ok(port) => {
                    info!("Successfully opened motor board at {}", path);
                    return Ok(Self::from_port(port, *path));
                }
                Err(e) => {
                    warn!("Failed to open {}: {}", path, e);
                    continue;
                }
            }
        }

        Err(TeleopError::SerialPortNotFound(paths.join(", ")))
    }

    fn open_port(path: &str, baud_rate: u32, timeout: Duration) -> Result<TokioSerialPort> {
        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .timeout(timeout)
            .open_native_async()
            .map_err(|e| TeleopError::Serial(format!("Failed to open {}: {}", path, e)))?;

        Ok(TokioSerialPort::new(port))
    }
}

impl<P: SerialPortIO> MotorSerial<P> {
    /// Wrap an already-open port.
    pub fn from_port(port: P, device_path: impl Into<String>) -> Self {
        Self {
            port,
            device_path: device_path.into(),
        }
    }

    /// Write one encoded frame and flush it.
    ///
    /// # Errors
    ///
    /// Returns `Serial` if the write or flush fails.
    pub async fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.port
            .write_all(frame)
            .await
            .map_err(|e| TeleopError::Serial(format!("Failed to write frame: {}", e)))?;

        self.port
            .flush()
            .await
            .map_err(|e| TeleopError::Serial(format!("Failed to flush serial port: {}", e)))?;

        debug!("Sent link frame ({} bytes)", frame.len());
        Ok(())
    }

    /// Send a drive command.
    ///
    /// # Errors
    ///
    /// See [`send_frame`](Self::send_frame).
    pub async fn send_motor_powers(&mut self, powers: MotorPowers) -> Result<()> {
        self.send_frame(&encode_motor_powers(powers)).await
    }

    /// Command both motors to stop.
    ///
    /// A failure is logged at error level before it is returned.
    ///
    /// # Errors
    ///
    /// See [`send_frame`](Self::send_frame).
    pub async fn stop(&mut self) -> Result<()> {
        let result = self.send_motor_powers(MotorPowers::STOP).await;
        if let Err(e) = &result {
            error!("Failed to stop motors on {}: {}", self.device_path, e);
        }
        result
    }

    /// Send both servo angles.
    ///
    /// # Errors
    ///
    /// See [`send_frame`](Self::send_frame).
    pub async fn send_servo_positions(&mut self, x: i32, y: i32) -> Result<()> {
        self.send_frame(&encode_servo_positions(x, y)).await
    }

    /// Path of the opened serial device
    pub fn device_path(&self) -> &str {
        &self.device_path
    }
}
