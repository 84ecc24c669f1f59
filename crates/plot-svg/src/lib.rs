//! SVG path extraction.
//!
//! Turns an SVG document into a [`Job`]: the ordered `<path>` elements,
//! each decomposed into segments with start/end points in the document's
//! coordinate space, plus the canvas height used downstream for Y-axis
//! inversion.
//!
//! This crate is pure geometry. It has no serial or device dependency, so
//! extraction is testable without hardware, and a job can be inspected
//! (bounds, segment counts) before anything is plotted.
//!
//! Curve segments (quadratics, cubics, arcs) contribute their endpoints
//! only; the motion layer draws the chord between them. Inputs are
//! expected to have had text converted to outlines already, so paths are
//! dense enough that chords track the curves closely.

use kurbo::{BezPath, ParamCurve};
use plot_core::geometry::{Bounds, Job, Path, Point, Segment};
use thiserror::Error;
use tracing::debug;

/// Failures while turning SVG text into a drawing job.
#[derive(Error, Debug)]
pub enum SvgError {
    /// The document is not well-formed XML.
    #[error("SVG parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// A `d` attribute could not be parsed as path data.
    #[error("path {index} has invalid data: {message}")]
    PathData { index: usize, message: String },

    /// A `viewBox` attribute was present but is not four numbers.
    #[error("viewBox {0:?} is not four numbers")]
    ViewBox(String),

    /// The document contains no drawable path segments.
    ///
    /// Upstream treats this as "nothing to plot", not as a malformed
    /// document.
    #[error("no drawable path segments in document")]
    EmptyDrawing,
}

/// Parse `svg` into a [`Job`].
///
/// `canvas_height` overrides the document's own view box; when it is
/// `None` the height is taken from the view box's fourth field. A document
/// with neither yields a job whose canvas height is unknown, and the
/// engine falls back to the non-inverted Y convention.
pub fn extract_job(svg: &str, canvas_height: Option<f64>) -> Result<Job, SvgError> {
    let doc = roxmltree::Document::parse(svg)?;
    let root = doc.root_element();

    let canvas_height = match canvas_height {
        Some(h) => Some(h),
        None => view_box_height(root.attribute("viewBox"))?,
    };

    let mut paths = Vec::new();
    for node in doc.descendants().filter(|n| n.has_tag_name("path")) {
        let Some(d) = node.attribute("d") else {
            continue;
        };
        let bez = BezPath::from_svg(d).map_err(|e| SvgError::PathData {
            index: paths.len(),
            message: e.to_string(),
        })?;

        let segments: Vec<Segment> = bez
            .segments()
            .map(|seg| Segment {
                start: to_point(seg.start()),
                end: to_point(seg.end()),
            })
            .collect();
        if !segments.is_empty() {
            paths.push(Path::new(segments));
        }
    }

    let bounds = Bounds::of_paths(&paths).ok_or(SvgError::EmptyDrawing)?;
    debug!(
        paths = paths.len(),
        %bounds,
        canvas_height,
        "extracted drawable geometry"
    );
    Ok(Job::new(paths, canvas_height, bounds))
}

fn to_point(p: kurbo::Point) -> Point {
    Point::new(p.x, p.y)
}

/// Height (fourth field) of a `viewBox` attribute, if one is present.
fn view_box_height(view_box: Option<&str>) -> Result<Option<f64>, SvgError> {
    let Some(raw) = view_box else {
        return Ok(None);
    };
    let fields: Vec<f64> = raw
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|_| SvgError::ViewBox(raw.to_string()))?;
    if fields.len() != 4 {
        return Err(SvgError::ViewBox(raw.to_string()));
    }
    Ok(Some(fields[3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_STROKES: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 150">
        <g>
            <path d="M 10 20 L 30 20 L 30 40"/>
            <path d="M 50 60 C 55 60 60 65 60 70"/>
        </g>
    </svg>"#;

    #[test]
    fn extracts_paths_in_document_order() {
        let job = extract_job(TWO_STROKES, None).unwrap();
        assert_eq!(job.paths().len(), 2);

        let first = &job.paths()[0];
        assert_eq!(first.len(), 2);
        assert_eq!(first.first_point().unwrap(), Point::new(10.0, 20.0));
        assert_eq!(first.segments()[1].end, Point::new(30.0, 40.0));

        // The cubic contributes its endpoints.
        let second = &job.paths()[1];
        assert_eq!(second.segments()[0].start, Point::new(50.0, 60.0));
        assert_eq!(second.segments()[0].end, Point::new(60.0, 70.0));
    }

    #[test]
    fn canvas_height_comes_from_the_view_box() {
        let job = extract_job(TWO_STROKES, None).unwrap();
        assert_eq!(job.canvas_height(), Some(150.0));
    }

    #[test]
    fn explicit_canvas_height_wins_over_view_box() {
        let job = extract_job(TWO_STROKES, Some(300.0)).unwrap();
        assert_eq!(job.canvas_height(), Some(300.0));
    }

    #[test]
    fn missing_view_box_leaves_height_unknown() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
            <path d="M 0 0 L 10 10"/>
        </svg>"#;
        let job = extract_job(svg, None).unwrap();
        assert_eq!(job.canvas_height(), None);
    }

    #[test]
    fn malformed_view_box_is_an_error() {
        let svg = r#"<svg viewBox="0 0 200"><path d="M 0 0 L 1 1"/></svg>"#;
        assert!(matches!(
            extract_job(svg, None),
            Err(SvgError::ViewBox(_))
        ));

        let svg = r#"<svg viewBox="0 0 two hundred"><path d="M 0 0 L 1 1"/></svg>"#;
        assert!(matches!(
            extract_job(svg, None),
            Err(SvgError::ViewBox(_))
        ));
    }

    #[test]
    fn comma_separated_view_box_parses() {
        let svg = r#"<svg viewBox="0,0,220,160"><path d="M 0 0 L 1 1"/></svg>"#;
        let job = extract_job(svg, None).unwrap();
        assert_eq!(job.canvas_height(), Some(160.0));
    }

    #[test]
    fn content_bounds_cover_every_endpoint() {
        let job = extract_job(TWO_STROKES, None).unwrap();
        let b = job.bounds();
        assert_eq!(b.min_x, 10.0);
        assert_eq!(b.min_y, 20.0);
        assert_eq!(b.max_x, 60.0);
        assert_eq!(b.max_y, 70.0);
    }

    #[test]
    fn document_without_paths_is_nothing_to_plot() {
        let svg = r#"<svg viewBox="0 0 10 10"><text x="1" y="1">hi</text></svg>"#;
        assert!(matches!(
            extract_job(svg, None),
            Err(SvgError::EmptyDrawing)
        ));
    }

    #[test]
    fn path_with_only_a_move_is_not_drawable() {
        let svg = r#"<svg viewBox="0 0 10 10"><path d="M 5 5"/></svg>"#;
        assert!(matches!(
            extract_job(svg, None),
            Err(SvgError::EmptyDrawing)
        ));
    }

    #[test]
    fn broken_path_data_is_an_error() {
        let svg = r#"<svg viewBox="0 0 10 10"><path d="M 5 Q"/></svg>"#;
        assert!(matches!(
            extract_job(svg, None),
            Err(SvgError::PathData { .. })
        ));
    }

    #[test]
    fn closed_subpath_draws_its_closing_edge() {
        let svg = r#"<svg viewBox="0 0 10 10"><path d="M 0 0 L 4 0 L 4 3 Z"/></svg>"#;
        let job = extract_job(svg, None).unwrap();
        let segments = job.paths()[0].segments();
        let last = segments[segments.len() - 1];
        assert_eq!(last.end, Point::new(0.0, 0.0));
    }

    #[test]
    fn not_xml_is_an_xml_error() {
        assert!(matches!(extract_job("12,17,whee", None), Err(SvgError::Xml(_))));
    }
}
