//! # lore-core
//!
//! Foundation crate for the lore manuscript consistency engine.
//! Defines the shared data model, errors, config, collaborator traits,
//! and constants. Every other crate in the workspace depends on this.

pub mod config;
pub mod confidence;
pub mod constants;
pub mod errors;
pub mod models;
pub mod text;
pub mod tracing_setup;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use confidence::Confidence;
pub use config::LoreConfig;
pub use errors::{LoreError, LoreErrorCode, LoreResult};
pub use models::{
    Annotation, AnnotationPayload, Chapter, ChapterRef, Conflict, ConflictId, ConflictStatus,
    ConflictType, Entity, EntityId, Mention, MentionKind, MentionRef, MentionSource, Span,
    TemporalAnchor, TemporalInstance, TemporalKind, Tier,
};
pub use traits::{Cancellable, CancellationToken, Checkpoint, ITagger, TaggedSpan};
