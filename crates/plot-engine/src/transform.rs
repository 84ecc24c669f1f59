//! Source-to-plotter coordinate transform.

use plot_core::geometry::Point;

/// Maps source (document) coordinates into plotter millimetres.
///
/// SVG puts its origin at the top-left with Y growing downward; the
/// plotter's origin is bottom-left with Y growing upward. When the canvas
/// height is known, Y is inverted through it:
///
/// ```text
/// x' = x * scale + x_offset
/// y' = (canvas_height - y) * scale + y_offset
/// ```
///
/// Without a canvas height there is nothing sound to invert through, and Y
/// passes through uninverted. The drawing then comes out mirrored top to
/// bottom for most documents, which is why the orchestrator warns when it
/// happens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotTransform {
    pub scale: f64,
    pub x_offset: f64,
    pub y_offset: f64,
    pub canvas_height: Option<f64>,
}

impl PlotTransform {
    pub fn apply(&self, p: Point) -> Point {
        let x = p.x * self.scale + self.x_offset;
        let y = match self.canvas_height {
            Some(height) => (height - p.y) * self.scale + self.y_offset,
            None => p.y * self.scale + self.y_offset,
        };
        Point::new(x, y)
    }
}
