//! Traversal-and-export engine
//!
//! The stateful core of the crate: label derivation, next-link selection,
//! click execution with fallback, export triggering, download settling, and
//! the loop composing them.

pub mod download;
pub mod interact;
pub mod label;
pub mod select;
pub mod traversal;

pub use download::await_downloads;
pub use interact::{click_link, trigger_export};
pub use label::extract_label;
pub use select::{pick_next, resolve_candidates};
pub use traversal::{RunSummary, TraversalLoop, TraversalState};
