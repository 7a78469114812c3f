//! # Robot Teleop
//!
//! Drive a two-servo, differential-drive robot with a PS5 DualSense
//! controller over a serial motor board.

use anyhow::{Context, Result};
use clap::Parser;
use evdev::{EventStream, InputEvent};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use robot_teleop::config::Config;
use robot_teleop::controller::mapper::EventMapper;
use robot_teleop::controller::ps5::DualSenseController;
use robot_teleop::logging;
use robot_teleop::serial::MotorSerial;
use robot_teleop::teleop::{TeleopSession, TickOutput};

/// Mapping loop rate in Hz. The session's rate gate decides how often
/// anything actually moves.
const LOOP_RATE_HZ: u64 = 100;

/// Robot Teleop - drive a servo/motor robot from a PS5 DualSense
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Log motor frames instead of opening the serial port
    #[arg(long)]
    dry_run: bool,
}

/// Main entry point for Robot Teleop
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load and validate the configuration
///    - Set up logging (console, plus a daily log file if configured)
///    - Open the controller and, unless `--dry-run`, the motor board
///
/// 2. **Main Loop**
///    - Fold gamepad and touchpad events into the controller state
///    - Run one mapping tick at 100Hz and forward what it produced
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Graceful Shutdown**
///    - Stop both motors
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config))?;
    let _log_guard = logging::init(&config.logging)?;

    info!("Robot Teleop v{} starting...", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    let controller = if config.controller.device_path.is_empty() {
        DualSenseController::open()?
    } else {
        DualSenseController::open_path(&config.controller.device_path)?
    };
    info!(
        "Controller: {} at {} (touchpad: {})",
        controller.name().unwrap_or("unknown"),
        controller.device_path(),
        if controller.has_touchpad() { "yes" } else { "no" }
    );
    let (mut gamepad, mut touchpad) = controller.into_event_streams()?;

    let mut serial = if args.dry_run {
        info!("Dry run: motor frames will be logged, not sent");
        None
    } else {
        let serial = MotorSerial::open(
            &config.serial.port,
            config.serial.baud_rate,
            config.serial_timeout(),
        )?;
        info!("Motor board serial port opened at: {}", serial.device_path());
        Some(serial)
    };

    let bindings = config.to_bindings();
    info!(
        "Bindings: x={} y={} drive={}",
        bindings.x, bindings.y, bindings.drive
    );
    let mut session = TeleopSession::new(config.to_profile(), bindings);
    let mut mapper = EventMapper::new();

    let mut loop_interval = interval(Duration::from_millis(1000 / LOOP_RATE_HZ));
    loop_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    if let Some(serial) = serial.as_mut() {
        let (x, y) = session.servo_positions();
        if let Err(e) = serial.send_servo_positions(x, y).await {
            warn!("Failed to center servos: {}", e);
        }
    }

    info!("Starting mapping loop at {}Hz", LOOP_RATE_HZ);
    info!("Press Ctrl+C to exit");

    // Main control loop
    loop {
        tokio::select! {
            event = gamepad.next_event() => match event {
                Ok(event) => mapper.process_event(&event),
                Err(e) => {
                    error!("Controller disconnected: {}", e);
                    break;
                }
            },

            event = next_touch_event(&mut touchpad) => match event {
                Ok(event) => mapper.process_touch_event(&event),
                Err(e) => {
                    warn!("Touchpad stream ended, continuing without it: {}", e);
                    touchpad = None;
                    mapper.clear_touch();
                }
            },

            _ = loop_interval.tick() => {
                let output = session.tick(mapper.state());
                forward(&mut serial, output).await;
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    match serial.as_mut() {
        Some(serial) => {
            // Failure is already logged at error level
            if serial.stop().await.is_ok() {
                info!("Motors stopped");
            }
        }
        None => info!("[dry-run] motors left=0 right=0"),
    }

    Ok(())
}

/// Next touchpad event, or never if there is no touchpad stream.
async fn next_touch_event(touchpad: &mut Option<EventStream>) -> std::io::Result<InputEvent> {
    match touchpad {
        Some(stream) => stream.next_event().await,
        None => std::future::pending().await,
    }
}

/// Send whatever a tick produced, or log it on a dry run.
async fn forward(serial: &mut Option<MotorSerial>, output: TickOutput) {
    let Some(serial) = serial.as_mut() else {
        if output.servo_changed {
            info!("[dry-run] servos x={} y={}", output.servo_x, output.servo_y);
        }
        if let Some(powers) = output.motors {
            info!("[dry-run] motors left={} right={}", powers.left, powers.right);
        }
        return;
    };

    if output.servo_changed {
        if let Err(e) = serial.send_servo_positions(output.servo_x, output.servo_y).await {
            debug!("Failed to send servo positions: {}", e);
        }
    }
    if let Some(powers) = output.motors {
        if let Err(e) = serial.send_motor_powers(powers).await {
            debug!("Failed to send motor powers: {}", e);
        }
    }
}
