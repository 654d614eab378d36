//! # lore-temporal
//!
//! Story-time anchors for entity facts.
//!
//! - **parser**: `<entityId>@<kind>:<value>` tokens into validated [`TemporalInstance`]s
//! - **comparison**: total order for age/year, partial order for phases,
//!   explicit "incomparable" for everything else
//! - **context**: per-entity birth year and declared reference events
//! - **birth_year**: birth-year inference from (year, age) observations
//!
//! [`TemporalInstance`]: lore_core::TemporalInstance

pub mod birth_year;
pub mod comparison;
pub mod context;
pub mod parser;

pub use birth_year::{infer_birth_year, BirthYearEstimate};
pub use comparison::{
    compare, elapsed_years, story_position, Comparison, ComparisonBasis, IncomparableReason,
    StoryAxis, StoryPosition,
};
pub use context::{BirthYear, TimelineContext};
pub use parser::AnchorParser;
