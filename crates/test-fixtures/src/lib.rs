//! Shared test support for the lore workspace: deterministic taggers,
//! chapter builders, and golden JSON fixtures.

pub mod builders;
pub mod taggers;

pub use builders::{conflict, gazetteer_mention, mention, people, ChapterBuilder};
pub use taggers::{FailingTagger, LexiconTagger};

use serde::de::DeserializeOwned;
use std::path::PathBuf;

/// Root directory of the golden fixtures.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("golden")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Golden saga fixture: chapters, the tagger lexicon, and the expected findings.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SagaFixture {
    pub description: String,
    pub lexicon: Vec<(String, String)>,
    pub chapters: Vec<lore_core::Chapter>,
    pub expected: Vec<ExpectedConflict>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize)]
pub struct ExpectedConflict {
    pub conflict_type: String,
    pub entity: String,
    pub attribute: String,
    pub tier: u8,
    pub chapter: String,
}

impl SagaFixture {
    pub fn tagger(&self) -> LexiconTagger {
        LexiconTagger::new(
            self.lexicon
                .iter()
                .map(|(surface, label)| (surface.as_str(), label.as_str())),
        )
    }
}
