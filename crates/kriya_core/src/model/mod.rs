//! Diagram domain model.
//!
//! # Responsibility
//! - Define nodes, edges and the `Diagram` aggregate that owns them.
//! - Define the snapshot wire shape used for persistence and export.
//!
//! # Invariants
//! - The `Diagram` is the only owner of its nodes and edges; everything
//!   outside the aggregate refers to them by id.
//! - Node and edge ids are unique within one diagram.

pub mod diagram;
pub mod edge;
pub mod node;
