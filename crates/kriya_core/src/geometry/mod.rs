//! Canvas geometry helpers.
//!
//! # Responsibility
//! - Compute edge anchor points from live node rectangles.

pub mod anchor;
