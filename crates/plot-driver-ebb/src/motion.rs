//! Motion planning and the authoritative position model.
//!
//! The planner owns the only copy of "where the pen is". The device
//! executes moves open-loop in real time, so the position is advanced only
//! after a move command was transmitted and its execution window has been
//! waited out; on any failure the recorded position is left untouched.
//!
//! Two logical states exist: idle, and waiting for the device to finish a
//! move. The wait is expressed through [`MovePacing`] rather than inline
//! sleeps so that an implementation which polls a hardware status line can
//! replace the default without changing any signature here.

use crate::client::EbbClient;
use crate::config::{BoundsMode, EbbConfig};
use crate::kinematics::{to_axis_steps, to_motor_steps};
use async_trait::async_trait;
use plot_core::command::{Command, MotorSteps, MoveStyle};
use plot_core::error::{PlotError, PlotResult};
use plot_core::geometry::{Bounds, Point};
use plot_core::limits::{
    HOMING_READ_MARGIN, HOMING_SETTLE, MAX_IDLE_DELAY_MS, MIN_STEP_THRESHOLD,
    MOTOR_ENABLE_SETTLE, MOVE_COMPLETE_MARGIN, POSITION_EPSILON,
};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

// =============================================================================
// Move Pacing
// =============================================================================

/// Contract for "wait until the device has finished the move it just
/// acknowledged".
///
/// The device buffers very few commands and executes them in real time;
/// issuing the next move before the current one completes desynchronizes
/// the software position model from the hardware.
#[async_trait]
pub trait MovePacing: Send + Sync {
    /// Return once a move of `duration` can be considered physically
    /// complete.
    async fn wait_move_complete(&self, duration: Duration);
}

/// Default pacing: sleep the nominal duration plus a fixed margin.
pub struct SleepPacing;

#[async_trait]
impl MovePacing for SleepPacing {
    async fn wait_move_complete(&self, duration: Duration) {
        tokio::time::sleep(duration + MOVE_COMPLETE_MARGIN).await;
    }
}

// =============================================================================
// Motion Planner
// =============================================================================

/// Plans timed moves and tracks the authoritative plotter position.
///
/// Takes `&mut self` for every motion operation: one execution context
/// owns the planner (and through it the connection) for the duration of a
/// job. There is no cancellation primitive; once a move is transmitted,
/// interrupting the wait would leave the software position wrong, and any
/// future cancellation support must re-home afterwards.
pub struct MotionPlanner {
    client: EbbClient,
    steps_per_unit_x: f64,
    steps_per_unit_y: f64,
    bounds: Bounds,
    bounds_mode: BoundsMode,
    homing_timeout_ms: u32,
    position: Point,
    pacing: Box<dyn MovePacing>,
}

impl MotionPlanner {
    pub fn new(client: EbbClient, config: &EbbConfig) -> Self {
        Self {
            client,
            steps_per_unit_x: config.steps_per_unit_x,
            steps_per_unit_y: config.steps_per_unit_y,
            bounds: config.bounds(),
            bounds_mode: config.bounds_mode,
            homing_timeout_ms: config.homing_timeout_ms,
            position: Point::ORIGIN,
            pacing: Box::new(SleepPacing),
        }
    }

    /// Replace the pacing strategy.
    pub fn with_pacing(mut self, pacing: Box<dyn MovePacing>) -> Self {
        self.pacing = pacing;
        self
    }

    /// The position the planner believes the pen is at.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Move by a delta at `speed` drawing-plane units per second.
    ///
    /// Deltas below half a motor step on both axes cannot move the
    /// mechanism; a zero-step timed delay is issued instead so the
    /// firmware keeps its pacing, and the recorded position is not
    /// disturbed. Otherwise the duration is the per-axis travel time
    /// maximum (both motors arrive together), and after transmission the
    /// pacing wait models the device's physical execution time.
    #[instrument(skip(self), fields(dx, dy, speed), err)]
    pub async fn move_relative(&mut self, dx: f64, dy: f64, speed: f64) -> PlotResult<()> {
        if speed <= 0.0 {
            return Err(PlotError::InvalidSpeed(speed));
        }

        let dx_steps = dx * self.steps_per_unit_x;
        let dy_steps = dy * self.steps_per_unit_y;
        if dx_steps.abs() < MIN_STEP_THRESHOLD && dy_steps.abs() < MIN_STEP_THRESHOLD {
            let delay_ms = ((1000.0 / speed) as u64).clamp(1, MAX_IDLE_DELAY_MS);
            debug!(delay_ms, "sub-step delta, issuing idle delay instead of a move");
            let command = Command::stepper_move(delay_ms, MotorSteps::ZERO)?;
            self.client.send(&command).await?;
            return Ok(());
        }

        let time_x_s = if dx != 0.0 { dx.abs() / speed } else { 0.0 };
        let time_y_s = if dy != 0.0 { dy.abs() / speed } else { 0.0 };
        let duration_ms = ((time_x_s.max(time_y_s) * 1000.0) as u64).max(1);

        let steps = match self.client.dialect().move_style {
            MoveStyle::CoreXy => {
                to_motor_steps(dx, dy, self.steps_per_unit_x, self.steps_per_unit_y)?
            }
            MoveStyle::AxisSteps => {
                to_axis_steps(dx, dy, self.steps_per_unit_x, self.steps_per_unit_y)?
            }
        };

        let command = Command::stepper_move(duration_ms, steps)?;
        self.client.send(&command).await?;
        self.pacing
            .wait_move_complete(Duration::from_millis(duration_ms))
            .await;
        Ok(())
    }

    /// Move to an absolute position at `speed`.
    ///
    /// Targets closer than the position epsilon on both axes are a no-op
    /// success: no command is issued and the position is unchanged. The
    /// recorded position advances to the target only after the underlying
    /// relative move succeeded.
    #[instrument(skip(self), fields(x, y, speed), err)]
    pub async fn move_absolute(&mut self, x: f64, y: f64, speed: f64) -> PlotResult<()> {
        let target = Point::new(x, y);
        if !self.bounds.contains(target) {
            match self.bounds_mode {
                BoundsMode::Strict => {
                    return Err(PlotError::OutOfBounds {
                        x,
                        y,
                        bounds: self.bounds,
                    });
                }
                BoundsMode::Permissive => {
                    warn!(
                        x, y, bounds = %self.bounds,
                        "target outside plotting area, attempting move"
                    );
                }
            }
        }

        let dx = x - self.position.x;
        let dy = y - self.position.y;
        if dx.abs() < POSITION_EPSILON && dy.abs() < POSITION_EPSILON {
            return Ok(());
        }

        self.move_relative(dx, dy, speed).await?;
        self.position = target;
        Ok(())
    }

    /// Home both axes and reset the recorded position to the origin.
    ///
    /// The firmware gets its own timeout budget and the response read gets
    /// a matching budget on top of it. Whatever the device answers, the
    /// position is reset; only a transport failure aborts homing.
    #[instrument(skip(self), err)]
    pub async fn home(&mut self) -> PlotResult<()> {
        let command = Command::Home {
            timeout_ms: self.homing_timeout_ms,
        };
        let budget = Duration::from_millis(u64::from(self.homing_timeout_ms)) + HOMING_READ_MARGIN;
        self.client.send_with_timeout(&command, budget).await?;

        self.position = Point::ORIGIN;
        info!("homed, position reset to origin");
        tokio::time::sleep(HOMING_SETTLE).await;
        Ok(())
    }

    /// Enable both motor drivers (selects 1/16 microstepping).
    pub async fn enable_motors(&mut self) -> PlotResult<()> {
        self.set_motors(true).await
    }

    /// Release both motor drivers so the gantry can be moved by hand.
    pub async fn disable_motors(&mut self) -> PlotResult<()> {
        self.set_motors(false).await
    }

    async fn set_motors(&mut self, enabled: bool) -> PlotResult<()> {
        let command = Command::EnableMotors {
            motor1: enabled,
            motor2: enabled,
        };
        self.client.send(&command).await?;
        tokio::time::sleep(MOTOR_ENABLE_SETTLE).await;
        Ok(())
    }
}
