//! Unit-to-step transforms for the CoreXY mechanism.
//!
//! On an H-bot/CoreXY gantry the two motors jointly drive both axes: a
//! pure X move turns both motors the same way, a pure Y move turns them in
//! opposition. The transform is
//!
//! ```text
//! motor1 = dx_steps + dy_steps
//! motor2 = dx_steps - dy_steps
//! ```
//!
//! with `dx_steps = delta_x_units * steps_per_unit_x` (and likewise Y).
//!
//! Both functions here are pure and reject any result that does not fit
//! the command encoding's signed 32-bit parameters. That check is a hard
//! precondition: a caller that receives [`PlotError::StepsOutOfRange`]
//! must not issue the command.

use plot_core::command::MotorSteps;
use plot_core::error::{PlotError, PlotResult};

/// Convert a drawing-plane delta into per-motor (CoreXY-mixed) steps.
///
/// Rounds to the nearest integer after mixing. Used with the `SM` move
/// style, where the host owns the mixing.
pub fn to_motor_steps(
    delta_x_units: f64,
    delta_y_units: f64,
    steps_per_unit_x: f64,
    steps_per_unit_y: f64,
) -> PlotResult<MotorSteps> {
    let dx_steps = delta_x_units * steps_per_unit_x;
    let dy_steps = delta_y_units * steps_per_unit_y;
    clamp_to_i32((dx_steps + dy_steps).round(), (dx_steps - dy_steps).round())
}

/// Convert a drawing-plane delta into per-axis steps, unmixed.
///
/// Used with the `XM` move style, where the firmware applies the CoreXY
/// mixing itself. Same rounding and range gate as [`to_motor_steps`].
pub fn to_axis_steps(
    delta_x_units: f64,
    delta_y_units: f64,
    steps_per_unit_x: f64,
    steps_per_unit_y: f64,
) -> PlotResult<MotorSteps> {
    let dx_steps = (delta_x_units * steps_per_unit_x).round();
    let dy_steps = (delta_y_units * steps_per_unit_y).round();
    clamp_to_i32(dx_steps, dy_steps)
}

fn clamp_to_i32(motor1: f64, motor2: f64) -> PlotResult<MotorSteps> {
    let in_range = |v: f64| (i32::MIN as f64..=i32::MAX as f64).contains(&v);
    if !in_range(motor1) || !in_range(motor2) {
        return Err(PlotError::StepsOutOfRange { motor1, motor2 });
    }
    Ok(MotorSteps {
        motor1: motor1 as i32,
        motor2: motor2 as i32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_x_move_turns_both_motors_together() {
        // 10 mm at 80 steps/mm: dx_steps = 800, dy_steps = 0.
        let steps = to_motor_steps(10.0, 0.0, 80.0, 80.0).unwrap();
        assert_eq!(steps.motor1, 800);
        assert_eq!(steps.motor2, 800);
    }

    #[test]
    fn pure_y_move_turns_motors_in_opposition() {
        // 5 mm at 80 steps/mm: dy_steps = 400.
        let steps = to_motor_steps(0.0, 5.0, 80.0, 80.0).unwrap();
        assert_eq!(steps.motor1, 400);
        assert_eq!(steps.motor2, -400);
    }

    #[test]
    fn mixing_is_invertible_up_to_rounding() {
        // motor1 + motor2 == 2*dx_steps and motor1 - motor2 == 2*dy_steps
        // for deltas that land on whole steps.
        for (dx, dy) in [(3.0, 7.0), (-12.5, 4.25), (0.25, -0.25), (100.0, -60.0)] {
            let steps = to_motor_steps(dx, dy, 80.0, 80.0).unwrap();
            let dx_steps = (dx * 80.0) as i64;
            let dy_steps = (dy * 80.0) as i64;
            assert_eq!(i64::from(steps.motor1) + i64::from(steps.motor2), 2 * dx_steps);
            assert_eq!(i64::from(steps.motor1) - i64::from(steps.motor2), 2 * dy_steps);
        }
    }

    #[test]
    fn rounding_is_to_nearest_integer() {
        // 0.33 mm * 80 = 26.4 steps -> 26.
        let steps = to_axis_steps(0.33, 0.0, 80.0, 80.0).unwrap();
        assert_eq!(steps.motor1, 26);
        // -26.4 -> -26.
        let steps = to_axis_steps(-0.33, 0.0, 80.0, 80.0).unwrap();
        assert_eq!(steps.motor1, -26);
    }

    #[test]
    fn overflow_is_rejected_before_any_command_exists() {
        // dx_steps alone exceeds i32::MAX.
        let err = to_motor_steps(30_000_000.0, 0.0, 80.0, 80.0).unwrap_err();
        assert!(matches!(err, PlotError::StepsOutOfRange { .. }));

        // The mixed sum overflows even though each axis fits.
        let near_max = f64::from(i32::MAX) * 0.75;
        let err = to_motor_steps(near_max, near_max, 1.0, 1.0).unwrap_err();
        assert!(matches!(err, PlotError::StepsOutOfRange { .. }));

        // The unmixed transform accepts what the mixed one rejects.
        assert!(to_axis_steps(near_max, near_max, 1.0, 1.0).is_ok());
    }

    #[test]
    fn axis_steps_skips_the_mixing() {
        let steps = to_axis_steps(10.0, 5.0, 80.0, 80.0).unwrap();
        assert_eq!(steps.motor1, 800);
        assert_eq!(steps.motor2, 400);
    }
}
