//! Rendering surface contract.
//!
//! # Responsibility
//! - Describe what the core needs from whatever paints the canvas.
//! - Turn diagram edges into paintable layouts from the surface's live
//!   node rectangles.
//!
//! # Invariants
//! - Edge layouts are recomputed on every render; nothing is cached.
//! - An edge is laid out only when both endpoint rectangles are known.

use crate::geometry::anchor::{layout_edge, EdgeLayout, Point, Rect};
use crate::model::edge::Edge;
use crate::model::node::Node;

/// View toggles that never touch the persisted diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub show_distractions: bool,
    /// Whether task xp/deadline are shown on task nodes.
    pub show_details: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_distractions: true,
            show_details: true,
        }
    }
}

/// One node as the surface should draw it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeView<'a> {
    pub node: &'a Node,
    pub selected: bool,
    pub link_source: bool,
}

/// External canvas that paints nodes and edges.
pub trait RenderSurface {
    /// Replaces all painted nodes, in z-order.
    fn render_nodes(&mut self, nodes: &[NodeView<'_>], options: ViewOptions);

    /// Replaces all painted edges.
    fn render_edges(&mut self, edges: &[EdgeLayout]);

    /// Current bounding box of a painted node in page coordinates.
    fn node_rect(&self, node_id: &str) -> Option<Rect>;

    /// Page position of the surface itself; edge anchors are relative to it.
    fn origin(&self) -> Point;
}

/// Lays out every edge whose endpoints the surface currently knows.
pub fn layout_edges<'a, R>(edges: impl IntoIterator<Item = &'a Edge>, surface: &R) -> Vec<EdgeLayout>
where
    R: RenderSurface + ?Sized,
{
    let origin = surface.origin();
    edges
        .into_iter()
        .filter_map(|edge| {
            let source = surface.node_rect(&edge.source_id)?;
            let target = surface.node_rect(&edge.target_id)?;
            Some(layout_edge(edge, &source, &target, origin))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{layout_edges, NodeView, RenderSurface, ViewOptions};
    use crate::geometry::anchor::{EdgeLayout, Point, Rect};
    use crate::model::edge::Edge;
    use std::collections::HashMap;

    struct FixedSurface {
        rects: HashMap<String, Rect>,
    }

    impl RenderSurface for FixedSurface {
        fn render_nodes(&mut self, _nodes: &[NodeView<'_>], _options: ViewOptions) {}

        fn render_edges(&mut self, _edges: &[EdgeLayout]) {}

        fn node_rect(&self, node_id: &str) -> Option<Rect> {
            self.rects.get(node_id).copied()
        }

        fn origin(&self) -> Point {
            Point::default()
        }
    }

    #[test]
    fn edges_with_unknown_endpoints_are_skipped() {
        let mut rects = HashMap::new();
        rects.insert("a".to_string(), Rect::new(0.0, 0.0, 10.0, 10.0));
        rects.insert("b".to_string(), Rect::new(50.0, 0.0, 10.0, 10.0));
        let surface = FixedSurface { rects };

        let edges = [Edge::new("e1", "a", "b"), Edge::new("e2", "a", "ghost")];
        let layouts = layout_edges(&edges, &surface);

        assert_eq!(layouts.len(), 1);
        assert_eq!(layouts[0].edge_id, "e1");
        assert_eq!(layouts[0].anchors.start, Point::new(10.0, 5.0));
        assert_eq!(layouts[0].anchors.end, Point::new(50.0, 5.0));
    }
}
