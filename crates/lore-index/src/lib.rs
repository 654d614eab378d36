//! # lore-index
//!
//! Per-project index over detected conflicts.
//!
//! Conflicts are keyed by their content id, so re-detection refreshes a
//! record instead of duplicating it and operator statuses survive
//! re-analysis. The index answers filtered queries, computes the
//! aggregate statistics shown to the operator, and exports query results
//! as CSV or JSON with a fixed field order.

pub mod export;
pub mod filter;
pub mod index;
pub mod record;
pub mod stats;

pub use export::EXPORT_FIELDS;
pub use filter::EventFilter;
pub use index::{EventIndex, IngestOutcome};
pub use record::{ConflictRecord, StatusChange};
pub use stats::{ChapterDensity, CriticalSummary, EventCluster, IndexStats};
