//! Transient interaction state owned by the editing session.
//!
//! # Responsibility
//! - Model selection, the link gesture and edge activation timing as plain
//!   values, independent of any rendering surface.
//!
//! # Invariants
//! - Nothing here is persisted.

pub mod activation;
pub mod state;
