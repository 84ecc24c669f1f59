//! Drawing-plane geometry: points, segments, paths, and jobs.
//!
//! Coordinates are `f64` in source (document) units until the job engine
//! transforms them into plotter millimetres. [`Path`] and [`Job`] are
//! read-only once constructed: extraction produces them, the orchestrator
//! consumes them, nothing mutates them in between.

use serde::{Deserialize, Serialize};

/// A point in a 2-D plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The plotter's home position.
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One drawable segment of a path.
///
/// Curve segments contribute their endpoints only; the motion layer draws
/// the chord between them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// An ordered sequence of segments, drawn pen-down in one stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Start point of the first segment, where the pen touches down.
    pub fn first_point(&self) -> Option<Point> {
        self.segments.first().map(|s| s.start)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

/// An axis-aligned rectangle, used both for content bounding boxes and for
/// the configured plotting area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Bounds containing exactly one point.
    pub fn at(p: Point) -> Self {
        Self {
            min_x: p.x,
            min_y: p.y,
            max_x: p.x,
            max_y: p.y,
        }
    }

    /// Grow to include `p`.
    pub fn expand(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Bounding box over every segment endpoint in `paths`, or `None` when
    /// there are no segments at all.
    pub fn of_paths(paths: &[Path]) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        for path in paths {
            for segment in path.segments() {
                match bounds.as_mut() {
                    Some(b) => {
                        b.expand(segment.start);
                        b.expand(segment.end);
                    }
                    None => {
                        let mut b = Bounds::at(segment.start);
                        b.expand(segment.end);
                        bounds = Some(b);
                    }
                }
            }
        }
        bounds
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.2}, {:.2})..({:.2}, {:.2})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// A whole drawing job: ordered paths plus the canvas height used for
/// Y-axis inversion.
///
/// `canvas_height` is `None` when neither the caller nor the document's
/// view box supplied one; the job engine then falls back to the
/// non-inverted Y convention and says so.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    paths: Vec<Path>,
    canvas_height: Option<f64>,
    bounds: Bounds,
}

impl Job {
    pub fn new(paths: Vec<Path>, canvas_height: Option<f64>, bounds: Bounds) -> Self {
        Self {
            paths,
            canvas_height,
            bounds,
        }
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn canvas_height(&self) -> Option<f64> {
        self.canvas_height
    }

    /// Bounding box of the job's content in source coordinates.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}
