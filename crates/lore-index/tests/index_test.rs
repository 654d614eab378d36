//! Event index tests: statuses, statistics, filters and export.

use lore_core::config::IndexConfig;
use lore_core::errors::IndexError;
use lore_core::models::{ChapterRef, Conflict, ConflictStatus, ConflictType, EntityId, Tier};
use lore_core::LoreErrorCode;
use lore_index::{EventFilter, EventIndex, EXPORT_FIELDS};
use serde_json::Value;
use test_fixtures::conflict;

fn ch(book: u16, chapter: u32) -> ChapterRef {
    ChapterRef::new(book, chapter)
}

fn index_with(conflicts: Vec<Conflict>) -> EventIndex {
    let mut index = EventIndex::new(IndexConfig::default());
    index.register_chapters([ch(1, 1), ch(1, 2), ch(1, 3)]);
    index.ingest(conflicts);
    index
}

fn saga_conflicts() -> Vec<Conflict> {
    let mut conflicts = vec![conflict(ConflictType::Attribute, Tier::Critical, (1, 1), 1, 0)];
    for seed in 1..=4 {
        conflicts.push(conflict(ConflictType::Timeline, Tier::Medium, (1, 2), 2, seed));
    }
    conflicts
}

// ---- Statistics ----

#[test]
fn empty_chapters_and_clusters() {
    let index = index_with(saga_conflicts());
    let stats = index.stats();

    assert_eq!(stats.empty_chapters, vec![ch(1, 2), ch(1, 3)]);
    assert_eq!(stats.event_clusters.len(), 1);
    let cluster = &stats.event_clusters[0];
    assert_eq!(cluster.chapter, ch(1, 2));
    assert_eq!(cluster.conflict_type, ConflictType::Timeline);
    assert_eq!(cluster.count, 4);
    assert_eq!(cluster.conflicts.len(), 4);
}

#[test]
fn density_covers_every_known_chapter() {
    let index = index_with(saga_conflicts());
    let density = index.stats().density_by_chapter;

    assert_eq!(density.len(), 3);
    assert_eq!((density[0].tier1, density[0].total), (1, 1));
    assert_eq!((density[1].tier2, density[1].total), (4, 4));
    assert_eq!(density[2].total, 0);
}

#[test]
fn critical_unresolved_by_type() {
    let a = conflict(ConflictType::Attribute, Tier::Critical, (1, 1), 1, 0);
    let b = conflict(ConflictType::Attribute, Tier::Critical, (1, 1), 1, 1);
    let c = conflict(ConflictType::Timeline, Tier::Critical, (1, 3), 1, 2);
    let d = conflict(ConflictType::Timeline, Tier::Medium, (1, 3), 1, 3);
    let mut index = index_with(vec![a.clone(), b, c, d]);
    index.mark_resolved(&a.id, Some("fixed in draft 2")).unwrap();

    let critical = index.stats().critical_unresolved;
    assert_eq!(critical.count, 2);
    assert_eq!(critical.by_type.get("attribute"), Some(&1));
    assert_eq!(critical.by_type.get("timeline"), Some(&1));
}

#[test]
fn dismissed_conflicts_leave_the_signals() {
    let a = conflict(ConflictType::Attribute, Tier::Critical, (1, 1), 1, 0);
    let mut index = index_with(vec![a.clone()]);
    index.dismiss(&a.id, None).unwrap();

    let stats = index.stats();
    assert_eq!(stats.critical_unresolved.count, 0);
    assert!(stats.empty_chapters.contains(&ch(1, 1)));
}

#[test]
fn clusters_are_capped_largest_first() {
    let mut conflicts = Vec::new();
    for seed in 0..3 {
        conflicts.push(conflict(ConflictType::Attribute, Tier::Medium, (1, 1), 1, seed));
    }
    for seed in 3..7 {
        conflicts.push(conflict(ConflictType::Timeline, Tier::Medium, (1, 3), 1, seed));
    }
    let mut index = EventIndex::new(IndexConfig {
        max_clusters: 1,
        ..IndexConfig::default()
    });
    index.ingest(conflicts.clone());
    let clusters = index.stats().event_clusters;
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].count, 4);

    let mut unlimited = EventIndex::new(IndexConfig {
        max_clusters: 0,
        ..IndexConfig::default()
    });
    unlimited.ingest(conflicts);
    assert_eq!(unlimited.stats().event_clusters.len(), 2);
}

// ---- Status lifecycle ----

#[test]
fn status_changes_are_audited() {
    let a = conflict(ConflictType::Attribute, Tier::Critical, (1, 1), 1, 0);
    let mut index = index_with(vec![a.clone()]);

    index.mark_resolved(&a.id, Some("retconned")).unwrap();
    index.reopen(&a.id, None).unwrap();
    index.dismiss(&a.id, Some("intentional")).unwrap();

    let record = index.get(&a.id).unwrap();
    assert_eq!(record.status, ConflictStatus::Dismissed);
    let steps: Vec<(ConflictStatus, ConflictStatus)> =
        record.history.iter().map(|h| (h.from, h.to)).collect();
    assert_eq!(
        steps,
        vec![
            (ConflictStatus::Unresolved, ConflictStatus::Resolved),
            (ConflictStatus::Resolved, ConflictStatus::Unresolved),
            (ConflictStatus::Unresolved, ConflictStatus::Dismissed),
        ]
    );
    assert_eq!(record.history[0].note.as_deref(), Some("retconned"));
}

#[test]
fn invalid_transitions_are_rejected() {
    let a = conflict(ConflictType::Attribute, Tier::Critical, (1, 1), 1, 0);
    let mut index = index_with(vec![a.clone()]);

    let err = index.reopen(&a.id, None).unwrap_err();
    assert!(matches!(err, IndexError::InvalidTransition { status: ConflictStatus::Unresolved, .. }));

    index.mark_resolved(&a.id, None).unwrap();
    let err = index.dismiss(&a.id, None).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_TRANSITION");

    let unknown = conflict(ConflictType::Timeline, Tier::Medium, (2, 1), 9, 7).id;
    let err = index.mark_resolved(&unknown, None).unwrap_err();
    assert!(matches!(err, IndexError::UnknownConflict { .. }));
}

#[test]
fn reingest_keeps_statuses_and_never_duplicates() {
    let a = conflict(ConflictType::Attribute, Tier::Critical, (1, 1), 1, 0);
    let b = conflict(ConflictType::Attribute, Tier::Critical, (1, 2), 1, 1);
    let mut index = index_with(vec![a.clone(), b.clone()]);
    index.mark_resolved(&a.id, None).unwrap();
    index.dismiss(&b.id, None).unwrap();

    let outcome = index.ingest(vec![a.clone(), a.clone()]);
    assert_eq!(outcome.added, 0);
    assert_eq!(outcome.retired, 1);
    assert_eq!(index.len(), 1);
    assert!(index.get(&b.id).is_none());
    assert!(matches!(
        index.reopen(&b.id, None),
        Err(IndexError::UnknownConflict { .. })
    ));

    let outcome = index.ingest(vec![a.clone(), b.clone()]);
    assert_eq!(outcome.added, 0);
    assert_eq!(outcome.refreshed, 2);
    assert_eq!(index.get(&a.id).unwrap().status, ConflictStatus::Resolved);
    assert_eq!(index.get(&b.id).unwrap().status, ConflictStatus::Dismissed);
}

// ---- Queries ----

#[test]
fn query_filters_combine() {
    let conflicts = vec![
        conflict(ConflictType::Attribute, Tier::Critical, (1, 1), 1, 0),
        conflict(ConflictType::Timeline, Tier::Medium, (1, 2), 2, 1),
        conflict(ConflictType::BirthYear, Tier::Speculative, (2, 1), 1, 2),
        conflict(ConflictType::Attribute, Tier::Critical, (2, 4), 2, 3),
    ];
    let mut index = index_with(conflicts.clone());
    index.mark_resolved(&conflicts[3].id, None).unwrap();

    assert_eq!(index.query(&EventFilter::all()).len(), 4);
    assert_eq!(index.query(&EventFilter::all().critical_only()).len(), 2);
    assert_eq!(
        index
            .query(&EventFilter::all().with_tiers(&[Tier::Medium, Tier::Speculative]))
            .len(),
        2
    );
    assert_eq!(
        index
            .query(&EventFilter::all().with_types(&[ConflictType::Timeline]))
            .len(),
        1
    );
    assert_eq!(
        index
            .query(&EventFilter::all().with_chapter_range(ch(1, 2), ch(2, 1)))
            .len(),
        2
    );
    assert_eq!(
        index
            .query(&EventFilter::all().with_status(ConflictStatus::Unresolved).critical_only())
            .len(),
        1
    );
    assert_eq!(index.query(&EventFilter::all().for_entity(EntityId(2))).len(), 2);

    let chapters: Vec<ChapterRef> = index
        .query(&EventFilter::all())
        .iter()
        .map(|r| r.conflict.chapter)
        .collect();
    assert_eq!(chapters, vec![ch(1, 1), ch(1, 2), ch(2, 1), ch(2, 4)]);
}

// ---- Export ----

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[test]
fn csv_has_bom_and_stable_header() {
    let index = index_with(saga_conflicts());
    let csv_text = index.export_csv(&EventFilter::all()).unwrap();
    assert!(csv_text.starts_with('\u{feff}'));
    let header = csv_text.trim_start_matches('\u{feff}').lines().next().unwrap();
    assert_eq!(header, EXPORT_FIELDS.join(","));
}

#[test]
fn csv_and_json_carry_the_same_values() {
    let index = index_with(saga_conflicts());
    let filter = EventFilter::all();
    let csv_text = index.export_csv(&filter).unwrap();
    let json_text = index.export_json(&filter).unwrap();

    let body = csv_text.trim_start_matches('\u{feff}');
    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    let document: Value = serde_json::from_str(&json_text).unwrap();
    let conflicts = document["conflicts"].as_array().unwrap();

    assert_eq!(rows.len(), 5);
    assert_eq!(conflicts.len(), 5);
    assert_eq!(document["count"], 5);
    for (row, json) in rows.iter().zip(conflicts) {
        for (i, field) in EXPORT_FIELDS.iter().enumerate() {
            let from_csv = &row[i];
            if matches!(*field, "evidence" | "history") {
                let parsed: Value = serde_json::from_str(from_csv).unwrap();
                assert_eq!(parsed, json[field]);
            } else {
                assert_eq!(from_csv, cell(&json[field]), "field {field}");
            }
        }
    }
}

#[test]
fn status_history_survives_export() {
    let a = conflict(ConflictType::Attribute, Tier::Critical, (1, 1), 1, 0);
    let mut index = index_with(vec![a.clone()]);
    index.dismiss(&a.id, Some("intentional")).unwrap();
    let filter = EventFilter::all();

    let document: Value = serde_json::from_str(&index.export_json(&filter).unwrap()).unwrap();
    let history = &document["conflicts"][0]["history"];
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["from"], "unresolved");
    assert_eq!(history[0]["to"], "dismissed");
    assert_eq!(history[0]["note"], "intentional");

    let csv_text = index.export_csv(&filter).unwrap();
    let body = csv_text.trim_start_matches('\u{feff}');
    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let row = reader.records().next().unwrap().unwrap();
    let cell: Value = serde_json::from_str(&row[EXPORT_FIELDS.len() - 1]).unwrap();
    assert_eq!(&cell, history);
}

#[test]
fn json_echoes_filters_in_field_order() {
    let index = index_with(saga_conflicts());
    let filter = EventFilter::all().with_tiers(&[Tier::Medium]);
    let json_text = index.export_json(&filter).unwrap();

    let document: Value = serde_json::from_str(&json_text).unwrap();
    assert_eq!(document["filters_applied"]["tiers"], serde_json::json!([2]));
    assert_eq!(document["count"], 4);

    let conflicts_at = json_text.find("\"conflicts\"").unwrap();
    let first = &json_text[conflicts_at..];
    let positions: Vec<usize> = EXPORT_FIELDS
        .iter()
        .map(|f| first.find(&format!("\"{f}\":")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
}
