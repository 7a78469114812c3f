//! # PS5 DualSense Controller Module
//!
//! Detects and opens a PS5 DualSense controller through the Linux evdev
//! interface.
//!
//! ## Controller Detection
//!
//! The DualSense is identified by:
//! - Vendor ID: 0x054c (Sony)
//! - Product ID: 0x0ce6 (DualSense, both wired and Bluetooth)
//!
//! The kernel splits it into three event nodes sharing those IDs. They are
//! told apart by name:
//!
//! | Node | Name suffix | Used |
//! |------|-------------|------|
//! | Gamepad | (none) | yes |
//! | Touchpad | "Touchpad" | yes, if present |
//! | Motion sensors | "Motion Sensors" | no |

use evdev::{Device, EventStream};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Result, TeleopError};

/// PS5 DualSense vendor ID (Sony)
const DUALSENSE_VENDOR_ID: u16 = 0x054c;

/// PS5 DualSense product ID (wired and Bluetooth)
const DUALSENSE_PRODUCT_ID: u16 = 0x0ce6;

/// Which DualSense event node a device is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Gamepad,
    Touchpad,
    MotionSensors,
}

fn classify(name: &str) -> NodeKind {
    if name.contains("Touchpad") {
        NodeKind::Touchpad
    } else if name.contains("Motion") {
        NodeKind::MotionSensors
    } else {
        NodeKind::Gamepad
    }
}

/// PS5 DualSense controller handle.
pub struct DualSenseController {
    gamepad: Device,
    touchpad: Option<Device>,
    device_path: String,
}

impl std::fmt::Debug for DualSenseController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DualSenseController")
            .field("device_path", &self.device_path)
            .field("touchpad", &self.touchpad.is_some())
            .finish_non_exhaustive()
    }
}

impl DualSenseController {
    /// Detect and open the first available PS5 DualSense controller.
    ///
    /// Scans `/dev/input/event*` in sorted order, takes the first gamepad
    /// node, and picks up the matching touchpad node when one is visible.
    ///
    /// # Errors
    ///
    /// - `ControllerNotFound`: no DualSense gamepad node found
    /// - `Controller`: `/dev/input` missing or unreadable
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use robot_teleop::controller::ps5::DualSenseController;
    ///
    /// let controller = DualSenseController::open()?;
    /// println!("Connected to controller at: {}", controller.device_path());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open() -> Result<Self> {
        let input_dir = Path::new("/dev/input");

        if !input_dir.exists() {
            return Err(TeleopError::Controller(
                "/dev/input directory not found".to_string(),
            ));
        }

        let mut entries: Vec<_> = std::fs::read_dir(input_dir)
            .map_err(|e| TeleopError::Controller(format!("Failed to read /dev/input: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| {
                TeleopError::Controller(format!("Failed to read directory entry: {}", e))
            })?;

        // Deterministic pick when several controllers are connected
        entries.sort_by_key(|entry| entry.path());

        let mut gamepad: Option<(Device, String)> = None;
        let mut touchpad: Option<Device> = None;

        for entry in entries {
            let path = entry.path();

            let is_event_node = path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with("event"));
            if !is_event_node {
                continue;
            }

            let device = match Device::open(&path) {
                Ok(device) => device,
                Err(e) => {
                    // Permission denied or other errors - skip device
                    debug!("Could not open {}: {}", path.display(), e);
                    continue;
                }
            };

            let id = device.input_id();
            debug!(
                "Found input device: {} (vendor: 0x{:04x}, product: 0x{:04x})",
                path.display(),
                id.vendor(),
                id.product()
            );
            if id.vendor() != DUALSENSE_VENDOR_ID || id.product() != DUALSENSE_PRODUCT_ID {
                continue;
            }

            match classify(device.name().unwrap_or_default()) {
                NodeKind::Gamepad if gamepad.is_none() => {
                    let device_path = path.to_string_lossy().to_string();
                    info!("Found PS5 DualSense controller at: {}", device_path);
                    gamepad = Some((device, device_path));
                }
                NodeKind::Touchpad if touchpad.is_none() => {
                    info!("Found DualSense touchpad at: {}", path.display());
                    touchpad = Some(device);
                }
                _ => {}
            }
        }

        let (gamepad, device_path) = gamepad.ok_or(TeleopError::ControllerNotFound)?;
        Ok(Self {
            gamepad,
            touchpad,
            device_path,
        })
    }

    /// Open a specific gamepad event node, without touchpad support.
    ///
    /// # Errors
    ///
    /// Returns `Controller` if the node cannot be opened.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let gamepad = Device::open(path).map_err(|e| {
            TeleopError::Controller(format!("Failed to open {}: {}", path.display(), e))
        })?;
        info!("Opened controller at: {}", path.display());

        Ok(Self {
            gamepad,
            touchpad: None,
            device_path: path.to_string_lossy().to_string(),
        })
    }

    /// The `/dev/input/eventX` path of the gamepad node.
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Human-readable device name, e.g. "DualSense Wireless Controller".
    pub fn name(&self) -> Option<&str> {
        self.gamepad.name()
    }

    /// Whether a touchpad node was found alongside the gamepad.
    pub fn has_touchpad(&self) -> bool {
        self.touchpad.is_some()
    }

    /// Fetch pending gamepad events. May block if none are available.
    ///
    /// # Errors
    ///
    /// Returns `Controller` if fetching fails (e.g., controller disconnected).
    pub fn fetch_events(&mut self) -> Result<impl Iterator<Item = evdev::InputEvent> + '_> {
        self.gamepad
            .fetch_events()
            .map_err(|e| TeleopError::Controller(format!("Failed to fetch events: {}", e)))
    }

    /// Converts the device nodes into async event streams for the tokio loop.
    ///
    /// # Errors
    ///
    /// Returns `Controller` if a node cannot be switched to non-blocking mode.
    pub fn into_event_streams(self) -> Result<(EventStream, Option<EventStream>)> {
        let gamepad = self.gamepad.into_event_stream().map_err(|e| {
            TeleopError::Controller(format!("Failed to stream gamepad events: {}", e))
        })?;
        let touchpad = self
            .touchpad
            .map(Device::into_event_stream)
            .transpose()
            .map_err(|e| {
                TeleopError::Controller(format!("Failed to stream touchpad events: {}", e))
            })?;
        Ok((gamepad, touchpad))
    }
}
