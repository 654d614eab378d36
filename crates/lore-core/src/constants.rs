/// Engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV_VAR: &str = "LORE_LOG";

/// Attribute name whose value declares a birth year.
pub const BIRTH_YEAR_ATTRIBUTE: &str = "birth_year";

/// Reference-event prefix used for chapter-local anchors of unanchored facts.
pub const CHAPTER_REFERENCE_PREFIX: &str = "ch:";

/// Boundary punctuation trimmed from tagger spans.
pub const BOUNDARY_PUNCTUATION: &[char] = &[
    '–', '—', '-', ',', '.', ';', ':', '!', '?', '¿', '¡', '\'', '"', '(', ')', '[', ']', '{',
    '}', '«', '»', '“', '”', '‘', '’', ' ',
];

/// Sentence terminators used to detect sentence-initial tokens.
pub const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?', '…', '\n'];
