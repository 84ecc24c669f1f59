//! Job orchestration: drive a whole drawing [`Job`](plot_core::geometry::Job)
//! through the motion planner and pen actuator.
//!
//! The engine owns the plotting policy that sits above individual commands:
//! coordinate transformation (scale, offsets, Y-axis inversion), pen-up
//! travel versus pen-down drawing speeds, and the best-effort rule that a
//! failed path aborts its own remaining segments but not the rest of the
//! job.

pub mod orchestrator;
pub mod transform;

pub use orchestrator::{JobSummary, PlotOptions, PlotOrchestrator};
pub use transform::PlotTransform;
