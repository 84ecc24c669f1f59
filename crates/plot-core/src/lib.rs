//! `plot-core`
//!
//! Core type definitions for the pen-plotter motion control stack.
//!
//! This crate provides the building blocks shared by the device driver, the
//! SVG extractor, and the job engine:
//!
//! - [`error::PlotError`]: the error type for everything that talks to (or
//!   prepares commands for) the plotter
//! - [`command::Command`]: the wire command model, plus the protocol
//!   [`command::Dialect`] (move opcode and motor sign convention)
//! - [`geometry`]: points, segments, paths, and whole drawing jobs
//! - [`serial`]: type-erased async serial port abstractions, so drivers can
//!   run against real hardware or an in-memory duplex stream in tests
//! - [`limits`]: centralized timing constants and hard numeric bounds
//!
//! Geometry types carry no device dependency; the serial module is the only
//! place `tokio-serial` appears.

pub mod command;
pub mod error;
pub mod geometry;
pub mod limits;
pub mod serial;

pub use command::{Command, Dialect, MotorPolarity, MotorSteps, MoveStyle};
pub use error::{PlotError, PlotResult};
pub use geometry::{Bounds, Job, Path, Point, Segment};
