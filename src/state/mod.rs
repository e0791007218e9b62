//! State module for tracking traversal progress
//!
//! # Components
//!
//! - `TraversalContext`: the lineage and page title carried down into each album
//! - `VisitCounter`: run-wide ordinal used to number log lines

mod context;

// Re-export main types
pub use context::{TraversalContext, VisitCounter, LINEAGE_SEPARATOR};
