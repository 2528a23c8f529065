//! Edge domain model.
//!
//! # Invariants
//! - `source_id`/`target_id` reference nodes by id only; existence is
//!   guaranteed by the caller that creates the edge.
//! - Style progression is strictly cyclic: normal -> dotted -> reversed.

use crate::model::node::NodeId;
use serde::{Deserialize, Serialize};

/// Opaque edge identifier.
pub type EdgeId = String;

/// Stroke/arrow style of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    /// Solid line, arrowhead at the target.
    #[default]
    Normal = 0,
    /// Dashed line, no arrowhead.
    Dotted = 1,
    /// Solid line, arrowhead at the source.
    Reversed = 2,
}

impl EdgeStyle {
    pub const CYCLE: [EdgeStyle; 3] = [Self::Normal, Self::Dotted, Self::Reversed];

    pub fn next(self) -> Self {
        Self::CYCLE[(self as usize + 1) % Self::CYCLE.len()]
    }
}

/// Directed, styled connection between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    pub source_id: NodeId,
    pub target_id: NodeId,
    #[serde(default)]
    pub style: EdgeStyle,
}

impl Edge {
    pub fn new(
        id: impl Into<EdgeId>,
        source_id: impl Into<NodeId>,
        target_id: impl Into<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            style: EdgeStyle::Normal,
        }
    }

    /// Whether either endpoint is `node_id`.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source_id == node_id || self.target_id == node_id
    }

    /// Moves the style one step along the cycle and returns the new style.
    pub fn cycle_style(&mut self) -> EdgeStyle {
        self.style = self.style.next();
        self.style
    }
}

#[cfg(test)]
mod tests {
    use super::{Edge, EdgeStyle};

    #[test]
    fn style_cycle_returns_to_normal() {
        let mut edge = Edge::new("e1", "a", "b");
        assert_eq!(edge.cycle_style(), EdgeStyle::Dotted);
        assert_eq!(edge.cycle_style(), EdgeStyle::Reversed);
        assert_eq!(edge.cycle_style(), EdgeStyle::Normal);
    }

    #[test]
    fn touches_matches_either_endpoint() {
        let edge = Edge::new("e1", "a", "b");
        assert!(edge.touches("a"));
        assert!(edge.touches("b"));
        assert!(!edge.touches("c"));
    }
}
