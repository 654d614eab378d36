pub mod assertion;
pub mod chapter;
pub mod conflict;
pub mod entity;
pub mod ids;
pub mod mention;
pub mod temporal;

pub use assertion::{AnchorRecord, AttributeAssertion, FactSource};
pub use chapter::{Annotation, AnnotationPayload, Chapter, ChapterRef, Span};
pub use conflict::{Conflict, ConflictId, ConflictStatus, ConflictType, Evidence, Tier};
pub use entity::Entity;
pub use ids::{AnchorId, AssertionId, EntityId};
pub use mention::{Mention, MentionKind, MentionRef, MentionSource};
pub use temporal::{LifePhase, RelativeMarker, TemporalAnchor, TemporalInstance, TemporalKind};
