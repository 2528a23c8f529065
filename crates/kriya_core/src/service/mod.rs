//! Session-level use cases.
//!
//! # Responsibility
//! - Orchestrate model, interaction state and collaborators per gesture.
//! - Keep rendering and storage details behind their traits.

pub mod editor_service;
pub mod export;
