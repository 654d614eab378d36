//! # lore-extraction
//!
//! Per-chapter mention extraction.
//!
//! Baseline mentions come from the external tagger at a fixed confidence.
//! Capitalized tokens the tagger missed are added as low-confidence
//! candidates and reported back as gazetteer discoveries; the caller commits
//! them to the project [`Gazetteer`] under a single writer so later chapters
//! recognise the names.

pub mod extractor;
pub mod gazetteer;
pub mod tokenizer;

pub use extractor::{ChapterExtraction, DiscoveredTerm, MentionExtractor};
pub use gazetteer::{Gazetteer, GazetteerSnapshot, GazetteerTerm, InsertOutcome, TermOrigin};
