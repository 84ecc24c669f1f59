//! Wire command model for the stepper controller board.
//!
//! The board speaks a small ASCII protocol: an opcode, a duration in
//! milliseconds, and zero or more signed 32-bit parameters, terminated with
//! a carriage return. One line of ASCII comes back per command, `OK` on
//! success.
//!
//! | Opcode | Parameters | Meaning |
//! |--------|------------|---------|
//! | `SM` / `XM` | duration, steps, steps | Timed move, both motors |
//! | `HM` | timeout | Home both axes |
//! | `SP` | position | Set pen actuator position |
//! | `EM` | enable, enable | Enable/disable motor drivers |
//!
//! Firmware variants of this board family disagree on two points: whether
//! the host or the firmware applies the CoreXY mixing (`SM` vs `XM`), and
//! which step sign drives each motor forward. Both are captured in
//! [`Dialect`] as explicit configuration rather than baked-in constants,
//! because they change the physical drawing direction.

use crate::error::{PlotError, PlotResult};
use crate::limits::MAX_DURATION_MS;
use serde::{Deserialize, Serialize};

// =============================================================================
// Protocol Dialect
// =============================================================================

/// How motor steps are expressed in a move command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveStyle {
    /// `SM`: the host applies the CoreXY mixing and sends per-motor steps.
    #[default]
    CoreXy,
    /// `XM`: the host sends per-axis steps and the firmware mixes them.
    AxisSteps,
}

impl MoveStyle {
    /// Wire opcode for this style.
    pub fn opcode(self) -> &'static str {
        match self {
            MoveStyle::CoreXy => "SM",
            MoveStyle::AxisSteps => "XM",
        }
    }
}

/// Step sign convention, per motor channel.
///
/// Inverting a channel reverses that motor's direction without touching the
/// kinematics; useful when a board variant wires a motor the other way
/// around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MotorPolarity {
    #[serde(default)]
    pub invert_motor1: bool,
    #[serde(default)]
    pub invert_motor2: bool,
}

impl MotorPolarity {
    fn apply(self, steps: MotorSteps) -> MotorSteps {
        MotorSteps {
            motor1: if self.invert_motor1 {
                -steps.motor1
            } else {
                steps.motor1
            },
            motor2: if self.invert_motor2 {
                -steps.motor2
            } else {
                steps.motor2
            },
        }
    }
}

/// The protocol variant a particular board expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dialect {
    #[serde(default)]
    pub move_style: MoveStyle,
    #[serde(default)]
    pub polarity: MotorPolarity,
}

// =============================================================================
// Commands
// =============================================================================

/// The two step parameters of a move command.
///
/// Under [`MoveStyle::CoreXy`] these are per-motor (mixed) steps; under
/// [`MoveStyle::AxisSteps`] they are per-axis steps. Values are `i32` by
/// construction: the kinematics transform is the range gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorSteps {
    pub motor1: i32,
    pub motor2: i32,
}

impl MotorSteps {
    pub const ZERO: MotorSteps = MotorSteps {
        motor1: 0,
        motor2: 0,
    };

    pub fn is_zero(self) -> bool {
        self.motor1 == 0 && self.motor2 == 0
    }
}

/// A single protocol instruction, validated before it can exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Timed relative move of both motors.
    StepperMove { duration_ms: u32, steps: MotorSteps },
    /// Home both axes; the parameter is the firmware's own timeout budget.
    Home { timeout_ms: u32 },
    /// Move the pen actuator to an absolute servo position.
    SetPenPosition { position: u16 },
    /// Enable or disable the motor drivers (also selects microstepping).
    EnableMotors { motor1: bool, motor2: bool },
}

impl Command {
    /// Build a validated move command.
    ///
    /// Durations above the signed 32-bit range are rejected. A duration of
    /// zero with non-zero steps is invalid on the wire and is adjusted up
    /// to 1 ms; it is never sent as 0.
    pub fn stepper_move(duration_ms: u64, steps: MotorSteps) -> PlotResult<Self> {
        if duration_ms > MAX_DURATION_MS {
            return Err(PlotError::DurationOutOfRange(duration_ms));
        }
        let mut duration_ms = duration_ms as u32;
        if duration_ms == 0 && !steps.is_zero() {
            tracing::warn!("duration 0 ms is invalid for a non-zero move; adjusting to 1 ms");
            duration_ms = 1;
        }
        Ok(Command::StepperMove { duration_ms, steps })
    }

    /// Encode to the CR-terminated ASCII wire form under `dialect`.
    pub fn encode(&self, dialect: &Dialect) -> String {
        match *self {
            Command::StepperMove { duration_ms, steps } => {
                let steps = dialect.polarity.apply(steps);
                format!(
                    "{},{},{},{}\r",
                    dialect.move_style.opcode(),
                    duration_ms,
                    steps.motor1,
                    steps.motor2
                )
            }
            Command::Home { timeout_ms } => format!("HM,{}\r", timeout_ms),
            Command::SetPenPosition { position } => format!("SP,{}\r", position),
            Command::EnableMotors { motor1, motor2 } => {
                format!("EM,{},{}\r", motor1 as u8, motor2 as u8)
            }
        }
    }
}
