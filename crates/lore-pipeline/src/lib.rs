//! # lore-pipeline
//!
//! Runs a manuscript project end to end.
//!
//! A run sorts chapters into narrative order, skips chapters whose
//! fingerprint is unchanged since they were last analysed, and processes
//! the rest in waves:
//!
//! 1. stop if cancellation was requested
//! 2. extract the wave's chapters in parallel against one gazetteer snapshot
//! 3. commit discovered names to the gazetteer, in chapter order
//! 4. resolve mentions to entities, in chapter order
//! 5. record the chapters' annotations into the attribute ledger
//! 6. feed confirmed entity names back to the gazetteer
//!
//! Detection and indexing run once, after the last wave.

pub mod fingerprint;
pub mod project;
pub mod recorder;
pub mod records;
pub mod report;

pub use fingerprint::fingerprint;
pub use project::Project;
pub use records::ProjectRecords;
pub use report::{AnalysisReport, ChapterState, DroppedAnchor, UnanalyzedChapter};
