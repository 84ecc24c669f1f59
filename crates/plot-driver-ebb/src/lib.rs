//! EBB-compatible CoreXY plotter board driver.
//!
//! Protocol overview:
//! - Format: ASCII command/response over USB serial
//! - Framing: carriage-return terminated commands, line-delimited replies
//! - Success reply: `OK`; anything else is tolerated with a warning,
//!   only transport failures abort a command
//!
//! The driver is layered the way the wire works:
//!
//! - [`EbbClient`]: owns the connection, frames and sends commands
//! - [`kinematics`]: pure unit-to-step transforms with the 32-bit gate
//! - [`MotionPlanner`]: timed moves, homing, and the authoritative position
//! - [`PenActuator`]: pen lift/lower with settle delays
//!
//! All timed pacing goes through the [`MovePacing`] contract so an
//! implementation that polls a hardware status line can replace the
//! default sleep-based one without changing any public signature.

pub mod client;
pub mod config;
pub mod kinematics;
pub mod motion;
pub mod pen;

pub use client::EbbClient;
pub use config::{BoundsMode, EbbConfig};
pub use motion::{MotionPlanner, MovePacing, SleepPacing};
pub use pen::PenActuator;
