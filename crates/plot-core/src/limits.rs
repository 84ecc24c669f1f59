//! Shared timing constants and hard numeric bounds.
//!
//! This module centralizes:
//! - Settle delays the firmware needs between commands
//! - The pacing margin added after each timed move
//! - The integer ranges the command encoding can express
//!
//! Using centralized constants keeps the driver, the motion planner, and the
//! tests agreed on the same values.

use std::time::Duration;

// =============================================================================
// Settle Delays
// =============================================================================

/// Wait after opening the serial port before the first command (2 seconds).
///
/// Opening the port toggles DTR and resets the controller; its firmware
/// needs this long to reinitialize its input buffers.
pub const FIRMWARE_RESET_SETTLE: Duration = Duration::from_secs(2);

/// Wait after a pen actuator command (500 ms).
///
/// Covers the servo's mechanical travel between the up and down positions.
pub const PEN_SETTLE: Duration = Duration::from_millis(500);

/// Wait after the homing command acknowledges (2 seconds).
pub const HOMING_SETTLE: Duration = Duration::from_secs(2);

/// Wait after a motor enable/disable command (500 ms).
pub const MOTOR_ENABLE_SETTLE: Duration = Duration::from_millis(500);

// =============================================================================
// Move Pacing
// =============================================================================

/// Margin added on top of a move's nominal duration before the next command
/// is issued (50 ms).
///
/// The device executes moves in real time; issuing the next command exactly
/// at the nominal end risks overrunning its command buffer.
pub const MOVE_COMPLETE_MARGIN: Duration = Duration::from_millis(50);

/// Default read budget for a single command/response exchange (1 second).
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(1);

/// Extra read budget granted beyond the homing command's own timeout
/// parameter (1 second).
pub const HOMING_READ_MARGIN: Duration = Duration::from_secs(1);

/// Milliseconds spent draining stale bytes from the port after connect.
pub const DRAIN_TIMEOUT_MS: u64 = 50;

// =============================================================================
// Numeric Bounds
// =============================================================================

/// Maximum encodable move duration in milliseconds (`i32::MAX`).
pub const MAX_DURATION_MS: u64 = i32::MAX as u64;

/// Cap on the zero-motion idle delay substituted for sub-step moves (100 s).
pub const MAX_IDLE_DELAY_MS: u64 = 100_000;

/// Step deltas below this magnitude on both axes are treated as no motion
/// (half of one motor step).
pub const MIN_STEP_THRESHOLD: f64 = 0.5;

/// Position deltas below this magnitude on both axes make an absolute move
/// a no-op (drawing-plane units).
pub const POSITION_EPSILON: f64 = 0.01;

/// Largest pen actuator position the servo accepts.
pub const PEN_POSITION_MAX: u16 = 1000;
