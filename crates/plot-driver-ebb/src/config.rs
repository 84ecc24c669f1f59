//! Driver configuration.
//!
//! Deserializes from TOML; every field except `port` has a default matching
//! the board family's common calibration (80 steps/mm at 1/16 microstepping,
//! a 220x160 mm plotting area, servo range 0..=1000).
//!
//! ```toml
//! port = "/dev/ttyACM0"
//! steps_per_unit_x = 80.0
//! steps_per_unit_y = 80.0
//! pen_up_position = 750
//! pen_down_position = 250
//! bounds_mode = "permissive"
//!
//! [dialect]
//! move_style = "core_xy"
//! ```

use plot_core::command::Dialect;
use plot_core::error::{PlotError, PlotResult};
use plot_core::geometry::Bounds;
use plot_core::limits::PEN_POSITION_MAX;
use serde::Deserialize;

/// What to do when a move targets a point outside the plotting area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsMode {
    /// Log a warning and attempt the move anyway. This matches the
    /// hardware's observed tolerance but trusts the caller's geometry.
    #[default]
    Permissive,
    /// Refuse the move before any command is sent.
    Strict,
}

/// Connection and calibration settings for one plotter board.
#[derive(Debug, Clone, Deserialize)]
pub struct EbbConfig {
    /// Serial port path (e.g. "/dev/ttyACM0", "COM4").
    pub port: String,
    /// Baud rate (default: 9600).
    #[serde(default = "default_baud")]
    pub baud: u32,
    /// Per-command response timeout in milliseconds (default: 1000).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Motor steps per drawing-plane unit, X axis (default: 80).
    #[serde(default = "default_steps_per_unit")]
    pub steps_per_unit_x: f64,
    /// Motor steps per drawing-plane unit, Y axis (default: 80).
    #[serde(default = "default_steps_per_unit")]
    pub steps_per_unit_y: f64,
    /// Plotting area, drawing-plane units.
    #[serde(default)]
    pub min_x: f64,
    #[serde(default)]
    pub min_y: f64,
    #[serde(default = "default_max_x")]
    pub max_x: f64,
    #[serde(default = "default_max_y")]
    pub max_y: f64,
    /// Policy for targets outside the plotting area.
    #[serde(default)]
    pub bounds_mode: BoundsMode,
    /// Servo position for pen raised (default: 750).
    #[serde(default = "default_pen_up")]
    pub pen_up_position: u16,
    /// Servo position for pen lowered (default: 250).
    #[serde(default = "default_pen_down")]
    pub pen_down_position: u16,
    /// Firmware timeout budget passed to the homing command, in
    /// milliseconds (default: 5000).
    #[serde(default = "default_homing_timeout_ms")]
    pub homing_timeout_ms: u32,
    /// Move opcode and motor sign convention.
    #[serde(default)]
    pub dialect: Dialect,
}

fn default_baud() -> u32 {
    9600
}

fn default_timeout_ms() -> u64 {
    1000
}

fn default_steps_per_unit() -> f64 {
    80.0
}

fn default_max_x() -> f64 {
    220.0
}

fn default_max_y() -> f64 {
    160.0
}

fn default_pen_up() -> u16 {
    750
}

fn default_pen_down() -> u16 {
    250
}

fn default_homing_timeout_ms() -> u32 {
    5000
}

impl Default for EbbConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyACM0".to_string(),
            baud: default_baud(),
            timeout_ms: default_timeout_ms(),
            steps_per_unit_x: default_steps_per_unit(),
            steps_per_unit_y: default_steps_per_unit(),
            min_x: 0.0,
            min_y: 0.0,
            max_x: default_max_x(),
            max_y: default_max_y(),
            bounds_mode: BoundsMode::default(),
            pen_up_position: default_pen_up(),
            pen_down_position: default_pen_down(),
            homing_timeout_ms: default_homing_timeout_ms(),
            dialect: Dialect::default(),
        }
    }
}

impl EbbConfig {
    /// The configured plotting area.
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min_x: self.min_x,
            min_y: self.min_y,
            max_x: self.max_x,
            max_y: self.max_y,
        }
    }

    /// Semantic validation beyond what deserialization can catch.
    pub fn validate(&self) -> PlotResult<()> {
        if self.steps_per_unit_x <= 0.0 || self.steps_per_unit_y <= 0.0 {
            return Err(PlotError::Config(format!(
                "steps_per_unit must be positive, got ({}, {})",
                self.steps_per_unit_x, self.steps_per_unit_y
            )));
        }
        if self.max_x <= self.min_x || self.max_y <= self.min_y {
            return Err(PlotError::Config(format!(
                "plotting area {} is empty",
                self.bounds()
            )));
        }
        for (name, value) in [
            ("pen_up_position", self.pen_up_position),
            ("pen_down_position", self.pen_down_position),
        ] {
            if value > PEN_POSITION_MAX {
                return Err(PlotError::Config(format!(
                    "{name} {value} exceeds the actuator range 0..={PEN_POSITION_MAX}"
                )));
            }
        }
        if self.timeout_ms == 0 {
            return Err(PlotError::Config("timeout_ms must be at least 1".into()));
        }
        if self.homing_timeout_ms > i32::MAX as u32 {
            return Err(PlotError::Config(format!(
                "homing_timeout_ms {} exceeds the command encoding range",
                self.homing_timeout_ms
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plot_core::command::MoveStyle;

    #[test]
    fn minimal_toml_fills_defaults() {
        let cfg: EbbConfig = toml::from_str(r#"port = "/dev/ttyACM0""#).unwrap();
        assert_eq!(cfg.baud, 9600);
        assert_eq!(cfg.steps_per_unit_x, 80.0);
        assert_eq!(cfg.pen_up_position, 750);
        assert_eq!(cfg.pen_down_position, 250);
        assert_eq!(cfg.bounds_mode, BoundsMode::Permissive);
        assert_eq!(cfg.dialect.move_style, MoveStyle::CoreXy);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn dialect_and_bounds_mode_are_configurable() {
        let cfg: EbbConfig = toml::from_str(
            r#"
            port = "COM4"
            bounds_mode = "strict"

            [dialect]
            move_style = "axis_steps"
            polarity = { invert_motor1 = false, invert_motor2 = true }
            "#,
        )
        .unwrap();
        assert_eq!(cfg.bounds_mode, BoundsMode::Strict);
        assert_eq!(cfg.dialect.move_style, MoveStyle::AxisSteps);
        assert!(cfg.dialect.polarity.invert_motor2);
    }

    #[test]
    fn out_of_range_pen_position_fails_validation() {
        let cfg = EbbConfig {
            pen_up_position: 1500,
            ..EbbConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(PlotError::Config(_))));
    }

    #[test]
    fn empty_plotting_area_fails_validation() {
        let cfg = EbbConfig {
            max_x: 0.0,
            ..EbbConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(PlotError::Config(_))));
    }
}
