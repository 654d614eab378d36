use lore_core::errors::*;
use lore_core::models::{ChapterRef, ConflictId, ConflictStatus, EntityId, MentionRef};

#[test]
fn tagger_unavailable_names_the_chapter() {
    let err = ExtractionError::TaggerUnavailable {
        chapter: ChapterRef::new(2, 7),
        source: TaggerError::ModelUnavailable {
            model: "es_core".into(),
            message: "not installed".into(),
        },
    };
    let msg = err.to_string();
    assert!(msg.contains("2.7"));
    assert!(msg.contains("es_core"));
    assert!(err.is_fatal());
    assert_eq!(err.error_code(), error_code::TAGGER_UNAVAILABLE);
}

#[test]
fn unsupported_input_is_chapter_scoped() {
    let err = ExtractionError::TaggerUnavailable {
        chapter: ChapterRef::new(1, 1),
        source: TaggerError::UnsupportedInput {
            message: "invalid utf-16".into(),
        },
    };
    assert!(!err.is_fatal());
    assert_eq!(err.error_code(), error_code::UNSUPPORTED_INPUT);
}

#[test]
fn temporal_errors_share_parse_code() {
    let err = TemporalError::OutOfRange {
        kind: "age".into(),
        value: 200,
        min: 0,
        max: 130,
    };
    assert!(err.to_string().contains("200"));
    assert_eq!(err.tagged_string(), format!("[PARSE_ERROR] {err}"));
}

#[test]
fn ambiguous_resolution_counts_candidates() {
    let err = ResolutionError::AmbiguousResolution {
        mention: MentionRef {
            chapter: ChapterRef::new(1, 3),
            ordinal: 4,
        },
        candidates: vec![EntityId(1), EntityId(2)],
    };
    let msg = err.to_string();
    assert!(msg.contains("1.3#4"));
    assert!(msg.contains("2 candidate"));
    assert_eq!(err.error_code(), error_code::AMBIGUOUS_RESOLUTION);
}

#[test]
fn index_error_carries_conflict_id() {
    let err = IndexError::InvalidTransition {
        id: ConflictId::from("abc123"),
        status: ConflictStatus::Dismissed,
    };
    let msg = err.to_string();
    assert!(msg.contains("abc123"));
    assert!(msg.contains("dismissed"));
}

// --- From impls ---

#[test]
fn subsystem_errors_convert_to_pipeline_error() {
    let err: PipelineError = ResolutionError::UnknownEntity { id: EntityId(9) }.into();
    assert!(matches!(err, PipelineError::Resolution(_)));
    assert_eq!(err.error_code(), error_code::UNKNOWN_ENTITY);

    let err: PipelineError = ConfigError::ValidationFailed {
        field: "x".into(),
        message: "y".into(),
    }
    .into();
    assert_eq!(err.error_code(), error_code::CONFIG_ERROR);
}

#[test]
fn lore_error_is_transparent() {
    let inner = TemporalError::UnknownPhase {
        value: "toddler".into(),
    };
    let msg = inner.to_string();
    let err: LoreError = inner.into();
    assert_eq!(err.to_string(), msg);
    assert_eq!(err.error_code(), error_code::PARSE_ERROR);
}
