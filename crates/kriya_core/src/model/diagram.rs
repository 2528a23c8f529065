//! Diagram aggregate and snapshot contract.
//!
//! # Responsibility
//! - Own ordered node/edge collections and expose in-place mutations.
//! - Convert to and from the persisted/exported JSON snapshot.
//!
//! # Invariants
//! - Node order is insertion order, which is also z-order.
//! - Deleting a node removes every edge that references it.
//! - Loading a snapshot never applies partially: it either yields a complete
//!   `Diagram` or an error.
//! - Edges whose endpoints are missing are dropped at load time.

use crate::model::edge::{Edge, EdgeId, EdgeStyle};
use crate::model::node::{
    normalize_title, DistractionType, Node, NodeId, NodeType, TaskStatus, DEFAULT_TITLE,
};
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Title of a freshly created diagram.
pub const DEFAULT_DIAGRAM_TITLE: &str = "My Flowchart";

/// Serialized form of a diagram: `{ title, nodes, edges }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramSnapshot {
    #[serde(default = "default_diagram_title")]
    pub title: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

fn default_diagram_title() -> String {
    DEFAULT_DIAGRAM_TITLE.to_string()
}

/// Rejection reasons for an incoming snapshot.
#[derive(Debug)]
pub enum SnapshotError {
    /// Payload is not JSON or does not match the snapshot shape.
    Parse(serde_json::Error),
    DuplicateNodeId(NodeId),
    DuplicateEdgeId(EdgeId),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid diagram payload: {err}"),
            Self::DuplicateNodeId(id) => write!(f, "duplicate node id in snapshot: {id}"),
            Self::DuplicateEdgeId(id) => write!(f, "duplicate edge id in snapshot: {id}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::DuplicateNodeId(_) | Self::DuplicateEdgeId(_) => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Aggregate owning every node and edge of one editing session.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    title: String,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagram {
    /// Creates an empty diagram with the default title.
    pub fn new() -> Self {
        Self {
            title: default_diagram_title(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replaces the title; empty text normalizes to `DEFAULT_TITLE`.
    pub fn set_title(&mut self, text: impl Into<String>) {
        self.title = normalize_title(text.into());
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id() == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    pub fn edge_mut(&mut self, id: &str) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|edge| edge.id == id)
    }

    /// Appends a node at the origin with variant defaults.
    ///
    /// # Contract
    /// - `id` must be fresh; uniqueness is the caller's responsibility.
    pub fn add_node(
        &mut self,
        id: impl Into<NodeId>,
        node_type: NodeType,
        title: impl Into<String>,
    ) -> &Node {
        let index = self.nodes.len();
        self.nodes.push(Node::new(id, node_type, title));
        &self.nodes[index]
    }

    /// Appends a `normal` edge from `source_id` to `target_id`.
    ///
    /// Endpoints are not checked here; the linking gesture only offers ids of
    /// rendered nodes.
    pub fn add_edge(
        &mut self,
        id: impl Into<EdgeId>,
        source_id: impl Into<NodeId>,
        target_id: impl Into<NodeId>,
    ) -> &Edge {
        let index = self.edges.len();
        self.edges.push(Edge::new(id, source_id, target_id));
        &self.edges[index]
    }

    /// Removes a node and every edge referencing it.
    ///
    /// Returns the number of cascaded edges, or `None` if the node was absent.
    pub fn delete_node(&mut self, id: &str) -> Option<usize> {
        let index = self.nodes.iter().position(|node| node.id() == id)?;
        self.nodes.remove(index);
        let before = self.edges.len();
        self.edges.retain(|edge| !edge.touches(id));
        Some(before - self.edges.len())
    }

    /// Removes one edge. Returns whether it existed.
    pub fn delete_edge(&mut self, id: &str) -> bool {
        let before = self.edges.len();
        self.edges.retain(|edge| edge.id != id);
        before != self.edges.len()
    }

    pub fn move_node(&mut self, id: &str, x: f64, y: f64) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.move_to(x, y);
                true
            }
            None => false,
        }
    }

    pub fn rename_node(&mut self, id: &str, text: impl Into<String>) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.set_title(text);
                true
            }
            None => false,
        }
    }

    /// Advances a task's status. `None` for missing ids and distractions.
    pub fn advance_task_status(&mut self, id: &str, now: DateTime<Utc>) -> Option<TaskStatus> {
        self.node_mut(id)?.advance_status(now)
    }

    /// Advances a distraction's category. `None` for missing ids and tasks.
    pub fn advance_distraction_type(&mut self, id: &str) -> Option<DistractionType> {
        self.node_mut(id)?.advance_distraction_type()
    }

    /// Edits task details. Status and completion time are left untouched.
    pub fn update_task_details(&mut self, id: &str, xp: u32, deadline: impl Into<String>) -> bool {
        match self.node_mut(id).and_then(Node::task_mut) {
            Some(task) => {
                task.xp = xp;
                task.deadline = deadline.into().trim().to_string();
                true
            }
            None => false,
        }
    }

    /// Cycles an edge's style. `None` when the edge does not exist.
    pub fn cycle_edge_style(&mut self, id: &str) -> Option<EdgeStyle> {
        self.edge_mut(id).map(Edge::cycle_style)
    }

    /// Captures the serializable snapshot of this diagram.
    pub fn to_snapshot(&self) -> DiagramSnapshot {
        DiagramSnapshot {
            title: self.title.clone(),
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Rebuilds a diagram from a snapshot, preserving order.
    ///
    /// # Errors
    /// - Duplicate node or edge ids reject the whole snapshot.
    pub fn from_snapshot(snapshot: DiagramSnapshot) -> Result<Self, SnapshotError> {
        let mut node_ids = HashSet::with_capacity(snapshot.nodes.len());
        for node in &snapshot.nodes {
            if !node_ids.insert(node.id()) {
                return Err(SnapshotError::DuplicateNodeId(node.id().to_string()));
            }
        }

        let mut edge_ids = HashSet::with_capacity(snapshot.edges.len());
        for edge in &snapshot.edges {
            if !edge_ids.insert(edge.id.as_str()) {
                return Err(SnapshotError::DuplicateEdgeId(edge.id.clone()));
            }
        }

        let total_edges = snapshot.edges.len();
        let edges: Vec<Edge> = snapshot
            .edges
            .into_iter()
            .filter(|edge| {
                node_ids.contains(edge.source_id.as_str())
                    && node_ids.contains(edge.target_id.as_str())
            })
            .collect();
        let dropped = total_edges - edges.len();
        if dropped > 0 {
            warn!(
                "event=snapshot_load module=model status=ok dangling_edges_dropped={}",
                dropped
            );
        }

        Ok(Self {
            title: snapshot.title,
            nodes: snapshot.nodes,
            edges,
        })
    }

    /// Serializes to compact JSON for persistence.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(&self.to_snapshot())?)
    }

    /// Serializes to 2-space indented JSON for export.
    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(&self.to_snapshot())?)
    }

    /// Parses and validates a JSON snapshot.
    pub fn from_json(payload: &str) -> Result<Self, SnapshotError> {
        let snapshot: DiagramSnapshot = serde_json::from_str(payload)?;
        Self::from_snapshot(snapshot)
    }
}

impl Display for Diagram {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} nodes, {} edges)",
            if self.title.is_empty() {
                DEFAULT_TITLE
            } else {
                self.title.as_str()
            },
            self.nodes.len(),
            self.edges.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Diagram, SnapshotError, DEFAULT_DIAGRAM_TITLE};
    use crate::model::node::NodeType;

    #[test]
    fn new_diagram_is_empty_with_default_title() {
        let diagram = Diagram::new();
        assert_eq!(diagram.title(), DEFAULT_DIAGRAM_TITLE);
        assert!(diagram.nodes().is_empty());
        assert!(diagram.edges().is_empty());
    }

    #[test]
    fn delete_node_reports_cascade_count() {
        let mut diagram = Diagram::new();
        diagram.add_node("a", NodeType::Task, "a");
        diagram.add_node("b", NodeType::Task, "b");
        diagram.add_edge("e1", "a", "b");
        diagram.add_edge("e2", "b", "a");

        assert_eq!(diagram.delete_node("a"), Some(2));
        assert_eq!(diagram.delete_node("a"), None);
    }

    #[test]
    fn from_json_rejects_duplicate_node_ids() {
        let payload = r#"{
            "title": "dup",
            "nodes": [
                {"id": "n1", "type": "DISTRACTION", "x": 0, "y": 0, "title": "a", "distractionType": 1},
                {"id": "n1", "type": "DISTRACTION", "x": 0, "y": 0, "title": "b", "distractionType": 2}
            ],
            "edges": []
        }"#;

        let err = Diagram::from_json(payload).unwrap_err();
        assert!(matches!(err, SnapshotError::DuplicateNodeId(id) if id == "n1"));
    }

    #[test]
    fn update_task_details_ignores_distractions() {
        let mut diagram = Diagram::new();
        diagram.add_node("d", NodeType::Distraction, "d");
        assert!(!diagram.update_task_details("d", 5, "2026-01-01"));
    }

    #[test]
    fn display_summarizes_counts() {
        let mut diagram = Diagram::new();
        diagram.add_node("a", NodeType::Task, "a");
        assert_eq!(diagram.to_string(), "My Flowchart (1 nodes, 0 edges)");
    }
}
