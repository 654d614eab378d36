//! # lore-consistency
//!
//! Pure detection over a ledger snapshot. Each entity is checked on its own
//! (in parallel), so no entity's conflicts depend on another's.
//!
//! Strategies, in [`detection`]:
//! - attribute: categorical values that differ at comparable instants
//! - age progression: age delta against elapsed story time
//! - timeline: age/phase regression and phase/age mismatch
//! - birth year: (year, age) pairs implying different birth years
//!
//! [`story_order`] answers the per-attribute history query in story time.

pub mod detection;
pub mod engine;
pub mod equivalence;
pub mod evidence;
pub mod rules;
pub mod story_order;
pub mod tiering;
pub mod timeline_context;

pub use engine::ConsistencyDetector;
pub use equivalence::ValueEquivalence;
pub use rules::{AttributePolicy, DetectionRules};
pub use story_order::in_story_order;
pub use tiering::{assign_tier, TierSignals};
pub use timeline_context::{build_timeline, BirthObservation, EntityTimeline};
