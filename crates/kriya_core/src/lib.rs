//! Core diagram engine for Kriya.
//! Owns the task/distraction diagram, its gesture protocol and persistence
//! contract; painting and input wiring live outside this crate.

pub mod db;
pub mod geometry;
pub mod interaction;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod service;

pub use geometry::anchor::{
    layout_edge, resolve_edge_anchors, EdgeAnchors, EdgeDecoration, EdgeLayout, ExitSide, Point,
    Rect,
};
pub use interaction::activation::{
    ActivationDisambiguator, DeferredActions, DEFAULT_ACTIVATION_WINDOW,
};
pub use interaction::state::{InteractionState, LinkGesture, LinkOutcome};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::diagram::{Diagram, DiagramSnapshot, SnapshotError, DEFAULT_DIAGRAM_TITLE};
pub use model::edge::{Edge, EdgeId, EdgeStyle};
pub use model::node::{
    DistractionFields, DistractionType, Node, NodeId, NodeKind, NodeType, TaskFields, TaskStatus,
    DEFAULT_TITLE, DISTRACTION_PALETTE, DISTRACTION_TYPE_COUNT,
};
pub use render::{layout_edges, NodeView, RenderSurface, ViewOptions};
pub use repo::snapshot_repo::{
    SnapshotStore, SqliteSnapshotStore, StoreError, StoreResult, DEFAULT_STORAGE_KEY,
};
pub use service::editor_service::{EditorConfig, EditorSession, SessionError, SessionResult};
pub use service::export::suggested_file_name;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
