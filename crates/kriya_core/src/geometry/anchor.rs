//! Edge anchor resolution between two node rectangles.
//!
//! # Invariants
//! - Pure: output depends only on the two rectangles, the surface origin and
//!   the edge style. Nothing is cached between calls.
//! - Ties between horizontal and vertical distance resolve horizontally.

use crate::model::edge::{Edge, EdgeId, EdgeStyle};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn offset_by(self, origin: Point) -> Self {
        Self::new(self.x - origin.x, self.y - origin.y)
    }
}

/// Axis-aligned bounding box in the shared (page) coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Builds a rectangle of the given size centered on `center`.
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn left_center(&self) -> Point {
        Point::new(self.left, self.center().y)
    }

    pub fn right_center(&self) -> Point {
        Point::new(self.right(), self.center().y)
    }

    pub fn top_center(&self) -> Point {
        Point::new(self.center().x, self.top)
    }

    pub fn bottom_center(&self) -> Point {
        Point::new(self.center().x, self.bottom())
    }
}

/// Which side of the source rectangle the edge leaves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitSide {
    Right,
    Left,
    Bottom,
    Top,
}

/// Resolved endpoints, already translated into surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeAnchors {
    /// Anchor on the source (A) rectangle.
    pub start: Point,
    /// Anchor on the target (B) rectangle.
    pub end: Point,
    pub exit: ExitSide,
}

/// Stroke and arrowhead decoration derived from an edge style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeDecoration {
    pub dashed: bool,
    pub arrow_at_start: bool,
    pub arrow_at_end: bool,
}

impl EdgeDecoration {
    pub fn for_style(style: EdgeStyle) -> Self {
        match style {
            EdgeStyle::Normal => Self {
                dashed: false,
                arrow_at_start: false,
                arrow_at_end: true,
            },
            EdgeStyle::Dotted => Self {
                dashed: true,
                arrow_at_start: false,
                arrow_at_end: false,
            },
            EdgeStyle::Reversed => Self {
                dashed: false,
                arrow_at_start: true,
                arrow_at_end: false,
            },
        }
    }
}

/// Everything a surface needs to paint one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLayout {
    pub edge_id: EdgeId,
    pub anchors: EdgeAnchors,
    pub decoration: EdgeDecoration,
}

/// Picks anchor points on `source` and `target` facing each other.
///
/// The dominant axis of the center-to-center offset decides between side
/// midpoints (horizontal) and top/bottom midpoints (vertical). Both points
/// are then shifted into the coordinate space whose origin is `origin`.
pub fn resolve_edge_anchors(source: &Rect, target: &Rect, origin: Point) -> EdgeAnchors {
    let a = source.center();
    let b = target.center();
    let dx = b.x - a.x;
    let dy = b.y - a.y;

    let (start, end, exit) = if dx.abs() >= dy.abs() {
        if dx > 0.0 {
            (source.right_center(), target.left_center(), ExitSide::Right)
        } else {
            (source.left_center(), target.right_center(), ExitSide::Left)
        }
    } else if dy > 0.0 {
        (source.bottom_center(), target.top_center(), ExitSide::Bottom)
    } else {
        (source.top_center(), target.bottom_center(), ExitSide::Top)
    };

    EdgeAnchors {
        start: start.offset_by(origin),
        end: end.offset_by(origin),
        exit,
    }
}

/// Resolves anchors and decoration for one edge.
pub fn layout_edge(edge: &Edge, source: &Rect, target: &Rect, origin: Point) -> EdgeLayout {
    EdgeLayout {
        edge_id: edge.id.clone(),
        anchors: resolve_edge_anchors(source, target, origin),
        decoration: EdgeDecoration::for_style(edge.style),
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_edge_anchors, EdgeDecoration, ExitSide, Point, Rect};
    use crate::model::edge::EdgeStyle;

    fn square(cx: f64, cy: f64) -> Rect {
        Rect::centered(Point::new(cx, cy), 4.0, 4.0)
    }

    #[test]
    fn diagonal_tie_resolves_horizontally() {
        let anchors = resolve_edge_anchors(&square(0.0, 0.0), &square(10.0, 10.0), Point::default());
        assert_eq!(anchors.exit, ExitSide::Right);
        assert_eq!(anchors.start, Point::new(2.0, 0.0));
        assert_eq!(anchors.end, Point::new(8.0, 10.0));
    }

    #[test]
    fn leftward_target_uses_opposite_sides() {
        let anchors = resolve_edge_anchors(&square(20.0, 0.0), &square(0.0, 1.0), Point::default());
        assert_eq!(anchors.exit, ExitSide::Left);
        assert_eq!(anchors.start, Point::new(18.0, 0.0));
        assert_eq!(anchors.end, Point::new(2.0, 1.0));
    }

    #[test]
    fn vertical_dominant_uses_top_and_bottom() {
        let down = resolve_edge_anchors(&square(0.0, 0.0), &square(1.0, 20.0), Point::default());
        assert_eq!(down.exit, ExitSide::Bottom);
        assert_eq!(down.start, Point::new(0.0, 2.0));
        assert_eq!(down.end, Point::new(1.0, 18.0));

        let up = resolve_edge_anchors(&square(0.0, 20.0), &square(1.0, 0.0), Point::default());
        assert_eq!(up.exit, ExitSide::Top);
        assert_eq!(up.start, Point::new(0.0, 18.0));
        assert_eq!(up.end, Point::new(1.0, 2.0));
    }

    #[test]
    fn anchors_are_translated_into_surface_space() {
        let anchors =
            resolve_edge_anchors(&square(100.0, 50.0), &square(200.0, 50.0), Point::new(90.0, 40.0));
        assert_eq!(anchors.start, Point::new(12.0, 10.0));
        assert_eq!(anchors.end, Point::new(108.0, 10.0));
    }

    #[test]
    fn decoration_matches_style() {
        let normal = EdgeDecoration::for_style(EdgeStyle::Normal);
        assert!(normal.arrow_at_end && !normal.arrow_at_start && !normal.dashed);

        let dotted = EdgeDecoration::for_style(EdgeStyle::Dotted);
        assert!(dotted.dashed && !dotted.arrow_at_end && !dotted.arrow_at_start);

        let reversed = EdgeDecoration::for_style(EdgeStyle::Reversed);
        assert!(reversed.arrow_at_start && !reversed.arrow_at_end && !reversed.dashed);
    }
}
