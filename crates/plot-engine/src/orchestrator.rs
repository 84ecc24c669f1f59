//! Whole-job sequencing.

use crate::transform::PlotTransform;
use plot_core::error::{PlotError, PlotResult};
use plot_core::geometry::{Job, Path};
use plot_driver_ebb::{MotionPlanner, PenActuator};
use tracing::{info, instrument, warn};

/// Job-level plotting options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotOptions {
    /// Pen-down drawing speed, drawing-plane units per second. Pen-up
    /// travel moves run at twice this.
    pub speed: f64,
    /// Uniform scale from source units to plotter units.
    pub scale: f64,
    /// Offset added after scaling, plotter units.
    pub x_offset: f64,
    pub y_offset: f64,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            speed: 50.0,
            scale: 1.0,
            x_offset: 0.0,
            y_offset: 0.0,
        }
    }
}

/// What actually happened over a whole job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JobSummary {
    pub paths_total: usize,
    pub paths_failed: usize,
    pub segments_drawn: usize,
}

/// Sequences a whole drawing job: home, then per path pen-up travel,
/// pen-down drawing, and the final return to origin.
///
/// Error policy (best-effort): a failure while drawing a path abandons
/// that path's remaining segments and moves on to the next path, so one
/// bad stroke does not scrap a mostly-finished drawing. Only connection
/// loss during setup/homing — and failures during the final cleanup — are
/// job-fatal.
pub struct PlotOrchestrator {
    motion: MotionPlanner,
    pen: PenActuator,
    options: PlotOptions,
}

impl PlotOrchestrator {
    pub fn new(
        motion: MotionPlanner,
        pen: PenActuator,
        options: PlotOptions,
    ) -> PlotResult<Self> {
        if options.speed <= 0.0 {
            return Err(PlotError::InvalidSpeed(options.speed));
        }
        Ok(Self {
            motion,
            pen,
            options,
        })
    }

    /// Plot every path in `job`, in document order.
    #[instrument(skip(self, job), fields(paths = job.paths().len()), err)]
    pub async fn run(&mut self, job: &Job) -> PlotResult<JobSummary> {
        let transform = PlotTransform {
            scale: self.options.scale,
            x_offset: self.options.x_offset,
            y_offset: self.options.y_offset,
            canvas_height: job.canvas_height(),
        };
        if job.canvas_height().is_none() {
            warn!("no canvas height known; Y axis will not be inverted");
        }

        self.motion.enable_motors().await?;
        self.motion.home().await?;

        let mut summary = JobSummary {
            paths_total: job.paths().len(),
            ..JobSummary::default()
        };
        for (index, path) in job.paths().iter().enumerate() {
            match self.plot_path(path, &transform).await {
                Ok(drawn) => summary.segments_drawn += drawn,
                Err(err) => {
                    summary.paths_failed += 1;
                    warn!(path = index, error = %err, "path aborted, continuing with next");
                }
            }
        }

        self.finish().await?;
        info!(
            paths = summary.paths_total,
            failed = summary.paths_failed,
            segments = summary.segments_drawn,
            "job complete"
        );
        Ok(summary)
    }

    /// Draw one path: travel to its start pen-up, then draw each segment.
    async fn plot_path(&mut self, path: &Path, transform: &PlotTransform) -> PlotResult<usize> {
        let Some(first) = path.first_point() else {
            return Ok(0);
        };

        self.pen.pen_up().await?;
        let start = transform.apply(first);
        self.motion
            .move_absolute(start.x, start.y, self.travel_speed())
            .await?;
        self.pen.pen_down().await?;

        let mut drawn = 0;
        for segment in path.segments() {
            let end = transform.apply(segment.end);
            self.motion
                .move_absolute(end.x, end.y, self.options.speed)
                .await?;
            drawn += 1;
        }

        self.pen.pen_up().await?;
        Ok(drawn)
    }

    /// Raise the pen, return to origin, release the motors.
    async fn finish(&mut self) -> PlotResult<()> {
        self.pen.pen_up().await?;
        self.motion
            .move_absolute(0.0, 0.0, self.travel_speed())
            .await?;
        self.motion.disable_motors().await?;
        Ok(())
    }

    fn travel_speed(&self) -> f64 {
        self.options.speed * 2.0
    }
}
