use lore_core::config::*;
use lore_core::errors::ConfigError;
use lore_core::MentionKind;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = LoreConfig::from_toml("").unwrap();

    // Extraction defaults
    assert!(config.extraction.enable_gazetteer);
    assert_eq!(config.extraction.baseline_confidence, 0.8);
    assert_eq!(config.extraction.candidate_confidence, 0.5);
    assert_eq!(config.extraction.candidate_kind, MentionKind::Person);
    assert_eq!(config.extraction.min_candidate_chars, 3);
    assert_eq!(config.extraction.max_gazetteer_terms, 5_000);

    // Resolution defaults
    assert_eq!(config.resolution.review_threshold, 0.6);
    assert_eq!(config.resolution.subset_confidence, 0.8);

    // Temporal defaults
    assert_eq!(config.temporal.max_age, 130);
    assert_eq!(config.temporal.min_year, 1000);
    assert_eq!(config.temporal.max_year, 2999);
    assert_eq!(config.temporal.birth_year_max_spread, 3);

    // Consistency defaults
    assert_eq!(config.consistency.high_confidence, 0.8);
    assert!(config
        .consistency
        .immutable_attributes
        .contains(&"eye_color".to_string()));
    assert_eq!(config.consistency.continuous_attributes, vec!["age"]);
    assert_eq!(
        config.consistency.unanchored_policy,
        UnanchoredPolicy::ChapterLocal
    );

    // Index / pipeline / observability
    assert_eq!(config.index.cluster_min_size, 3);
    assert_eq!(config.index.max_clusters, 3);
    assert_eq!(config.pipeline.parallelism, 4);
    assert_eq!(config.observability.log_level, "info");
    assert!(!config.observability.json_logs);
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[extraction]
candidate_kind = "location"
max_gazetteer_terms = 10

[consistency]
unanchored_policy = "skip"
immutable_attributes = ["eye_color"]
"#;
    let config = LoreConfig::from_toml(toml).unwrap();
    assert_eq!(config.extraction.candidate_kind, MentionKind::Location);
    assert_eq!(config.extraction.max_gazetteer_terms, 10);
    // Non-overridden fields keep defaults
    assert_eq!(config.extraction.baseline_confidence, 0.8);
    assert_eq!(config.consistency.unanchored_policy, UnanchoredPolicy::Skip);
    assert_eq!(config.consistency.immutable_attributes, vec!["eye_color"]);
    assert_eq!(config.temporal.max_age, 130);
}

#[test]
fn config_serde_roundtrip() {
    let config = LoreConfig::default();
    let toml_str = toml::to_string(&config).unwrap();
    let roundtripped = LoreConfig::from_toml(&toml_str).unwrap();
    assert_eq!(
        roundtripped.consistency.synonym_groups,
        config.consistency.synonym_groups
    );
    assert_eq!(roundtripped.pipeline.parallelism, config.pipeline.parallelism);
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let err = LoreConfig::from_toml("[extraction\nfoo = 1").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn confidence_outside_unit_interval_fails_validation() {
    let err = LoreConfig::from_toml("[resolution]\nreview_threshold = 1.5").unwrap_err();
    match err {
        ConfigError::ValidationFailed { field, .. } => {
            assert_eq!(field, "resolution.review_threshold")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn inverted_year_range_fails_validation() {
    let err = LoreConfig::from_toml("[temporal]\nmin_year = 2500\nmax_year = 1500").unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { .. }));
}

#[test]
fn zero_parallelism_fails_validation() {
    let err = LoreConfig::from_toml("[pipeline]\nparallelism = 0").unwrap_err();
    assert!(err.to_string().contains("pipeline.parallelism"));
}

#[test]
fn single_event_clusters_are_rejected() {
    assert!(LoreConfig::from_toml("[index]\ncluster_min_size = 1").is_err());
}

#[test]
fn overrides_apply_from_lookup() {
    let mut config = LoreConfig::default();
    config
        .apply_overrides(|key| match key {
            ENV_PARALLELISM => Some("2".to_string()),
            ENV_REVIEW_THRESHOLD => Some("0.7".to_string()),
            ENV_LOG_LEVEL => Some("debug".to_string()),
            _ => None,
        })
        .unwrap();
    assert_eq!(config.pipeline.parallelism, 2);
    assert_eq!(config.resolution.review_threshold, 0.7);
    assert_eq!(config.observability.log_level, "debug");
}

#[test]
fn unparsable_override_is_an_invalid_value() {
    let mut config = LoreConfig::default();
    let err = config
        .apply_overrides(|key| (key == ENV_PARALLELISM).then(|| "many".to_string()))
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
fn load_reads_file_and_reports_missing_path() {
    let dir = std::env::temp_dir().join(format!("lore-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("lore.toml");
    std::fs::write(&path, "[index]\nmax_clusters = 0\n").unwrap();

    let config = LoreConfig::load(&path).unwrap();
    assert_eq!(config.index.max_clusters, 0);

    let missing = LoreConfig::load(&dir.join("nope.toml")).unwrap_err();
    assert!(matches!(missing, ConfigError::FileNotFound { .. }));
    std::fs::remove_dir_all(&dir).ok();
}
