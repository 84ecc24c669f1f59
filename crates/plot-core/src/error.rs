//! Error types for the motion control stack.
//!
//! [`PlotError`] consolidates every failure class that can occur between
//! "we have a drawing job" and "the plotter executed it": configuration
//! problems, serial transport failures, and numeric range violations caught
//! before a command ever reaches the wire.
//!
//! Transport variants carry the encoded command text that was being
//! attempted. Field calibration depends on seeing exactly which opcode and
//! parameters failed, so the command context is part of the error itself
//! rather than something callers are trusted to log.

use crate::geometry::Bounds;
use thiserror::Error;

/// Convenience alias for results using the plotter error type.
pub type PlotResult<T> = std::result::Result<T, PlotError>;

/// Primary error type for plotter communication and motion planning.
#[derive(Error, Debug)]
pub enum PlotError {
    /// Configuration values parsed but failed semantic validation
    /// (e.g. a pen position beyond the actuator range, zero steps-per-unit).
    #[error("configuration error: {0}")]
    Config(String),

    /// The serial device could not be opened.
    ///
    /// Job-fatal: nothing can proceed without a port.
    #[error("failed to open serial port {port}: {message}")]
    Connect { port: String, message: String },

    /// Operation attempted on a closed or never-opened connection.
    ///
    /// A closed handle is never silently reopened; callers must connect
    /// again explicitly.
    #[error("serial port not connected")]
    NotConnected,

    /// Transport read/write failure while a command was in flight.
    ///
    /// Always fatal to that command. The connection itself is left alone;
    /// the caller decides whether to continue with the next operation.
    #[error("I/O failure during command {command:?}: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// No response line arrived within the command's read budget.
    #[error("timed out waiting for response to command {command:?}")]
    Timeout { command: String },

    /// The device closed the stream mid-command (unplugged or powered off).
    #[error("unexpected EOF from serial port during command {command:?}")]
    UnexpectedEof { command: String },

    /// A non-positive linear speed was requested.
    #[error("invalid speed {0} units/s: speed must be greater than 0")]
    InvalidSpeed(f64),

    /// Computed motor steps exceed the signed 32-bit command encoding.
    ///
    /// Raised by the kinematics transform before any command is
    /// constructed; the move is never attempted.
    #[error(
        "motor steps ({motor1:.0}, {motor2:.0}) exceed the signed 32-bit command range; \
         reduce the move distance or steps-per-unit"
    )]
    StepsOutOfRange { motor1: f64, motor2: f64 },

    /// A move duration fell outside the encodable range.
    #[error("move duration {0} ms exceeds the command encoding range")]
    DurationOutOfRange(u64),

    /// Target position lies outside the configured plotting area.
    ///
    /// Only returned in strict bounds mode; the permissive default logs a
    /// warning and attempts the move anyway.
    #[error("target ({x:.2}, {y:.2}) is outside the plotting area {bounds}")]
    OutOfBounds { x: f64, y: f64, bounds: Bounds },
}
