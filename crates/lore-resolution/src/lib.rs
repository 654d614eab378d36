//! # lore-resolution
//!
//! Clusters chapter mentions into canonical [`Entity`](lore_core::Entity)
//! records.
//!
//! Matching is conservative. A mention joins an entity on an exact alias, or
//! on a unique token-subset match within the same book; shared first names
//! never auto-merge. Uncertain assignments stay visible as "needs review"
//! instead of being silently accepted, and cross-book partial collisions
//! become [`MergeSuggestion`]s for the operator.

pub mod assignment;
pub mod heuristics;
pub mod resolver;
pub mod roster;

pub use assignment::{
    Assignment, AssignmentStatus, ChapterResolution, MatchRule, MergeSuggestion, SplitOutcome,
};
pub use heuristics::{decide, Decision};
pub use resolver::EntityResolver;
pub use roster::Roster;
