//! Persistence collaborator contracts and SQLite implementation.
//!
//! # Responsibility
//! - Store and load the serialized diagram as an opaque blob.
//! - Keep SQL inside the persistence boundary.
//!
//! # Invariants
//! - Stores never inspect or validate the payload they hold.
//! - Saving is last-writer-wins; there is no conflict detection.

pub mod snapshot_repo;
