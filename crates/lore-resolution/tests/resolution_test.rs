use std::collections::BTreeSet;

use lore_core::config::ResolutionConfig;
use lore_core::errors::ResolutionError;
use lore_core::models::{EntityId, MentionKind};
use lore_resolution::{AssignmentStatus, EntityResolver, MatchRule};
use proptest::prelude::*;
use test_fixtures::{gazetteer_mention, mention, people};

fn resolver() -> EntityResolver {
    EntityResolver::new(ResolutionConfig::default())
}

fn id(n: u64) -> EntityId {
    EntityId::from(n)
}

fn alias_sets(resolver: &EntityResolver) -> BTreeSet<BTreeSet<String>> {
    resolver.entities().map(|e| e.aliases.clone()).collect()
}

#[test]
fn first_name_joins_unique_full_name() {
    let mut r = resolver();
    r.resolve_chapter(&people(1, 1, &["Juan García"]));
    let res = r.resolve_chapter(&people(1, 2, &["Juan"]));

    assert_eq!(r.roster().len(), 1);
    let assignment = &res.assignments[0];
    assert_eq!(assignment.entity, Some(id(1)));
    assert_eq!(assignment.rule, MatchRule::TokenSubset);
    assert_eq!(assignment.status, AssignmentStatus::Accepted);
    assert!((assignment.confidence.value() - 0.8).abs() < 1e-9);

    let entity = r.entity(id(1)).unwrap();
    assert_eq!(entity.display_name, "Juan García");
    assert!(entity.aliases.contains("Juan"));
    assert_eq!(entity.mentions.len(), 2);
}

#[test]
fn shared_first_name_is_never_auto_merged() {
    let mut r = resolver();
    r.resolve_chapter(&people(1, 1, &["Juan García", "Juan Pérez"]));
    assert_eq!(r.roster().len(), 2);

    let res = r.resolve_chapter(&people(1, 2, &["Juan"]));
    let assignment = &res.assignments[0];
    assert_eq!(assignment.entity, None);
    assert_eq!(assignment.status, AssignmentStatus::NeedsReview);
    assert_eq!(assignment.rule, MatchRule::Unresolved);
    assert_eq!(res.review_count(), 1);

    match assignment.review_reason() {
        Some(ResolutionError::AmbiguousResolution { candidates, .. }) => {
            assert_eq!(candidates, vec![id(1), id(2)]);
        }
        other => panic!("unexpected reason {other:?}"),
    }
    assert_eq!(r.needs_review().len(), 1);
    // No entity was touched.
    assert!(r.entities().all(|e| e.mentions.len() == 1));
}

#[test]
fn exact_alias_wins_over_near_names() {
    let mut r = resolver();
    r.resolve_chapter(&people(1, 1, &["Juan García", "Juan"]));
    r.resolve_chapter(&people(1, 2, &["Juan Pérez"]));
    assert_eq!(r.roster().len(), 2);

    let res = r.resolve_chapter(&people(1, 3, &["Juan"]));
    let assignment = &res.assignments[0];
    assert_eq!(assignment.entity, Some(id(1)));
    assert_eq!(assignment.rule, MatchRule::ExactAlias);
    // One near name in scope.
    assert!((assignment.confidence.value() - 0.9).abs() < 1e-9);
}

#[test]
fn low_confidence_single_candidate_attaches_pending_review() {
    let config = ResolutionConfig {
        review_threshold: 0.85,
        ..ResolutionConfig::default()
    };
    let mut r = EntityResolver::new(config);
    r.resolve_chapter(&people(1, 1, &["Juan García"]));
    let res = r.resolve_chapter(&people(1, 2, &["Juan"]));

    let assignment = &res.assignments[0];
    assert_eq!(assignment.entity, Some(id(1)));
    assert_eq!(assignment.rule, MatchRule::TokenSubset);
    assert!(assignment.needs_review());
    assert!(res.confirmed_terms.is_empty());
}

#[test]
fn cross_book_partial_name_becomes_suggestion() {
    let mut r = resolver();
    r.resolve_chapter(&people(1, 1, &["Juan García"]));
    let res = r.resolve_chapter(&people(2, 1, &["Juan"]));

    assert_eq!(r.roster().len(), 2);
    assert_eq!(res.created, vec![id(2)]);
    let suggestions = r.merge_suggestions();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].entity, id(2));
    assert_eq!(suggestions[0].candidate, id(1));
    assert!(suggestions[0].reason.contains("Juan García"));
}

#[test]
fn cross_book_short_alias_of_full_name_stays_distinct() {
    let mut r = resolver();
    r.resolve_chapter(&people(1, 1, &["Juan García", "Juan"]));
    r.resolve_chapter(&people(2, 1, &["Juan"]));

    assert_eq!(r.roster().len(), 2);
    assert_eq!(r.merge_suggestions().len(), 1);
}

#[test]
fn cross_book_full_name_and_single_names_carry_over() {
    let mut r = resolver();
    r.resolve_chapter(&people(1, 1, &["Juan García", "Frodo"]));
    let res = r.resolve_chapter(&people(2, 1, &["Juan García", "Frodo"]));

    assert_eq!(r.roster().len(), 2);
    assert!(res.created.is_empty());
    assert_eq!(res.assignments[0].entity, Some(id(1)));
    assert_eq!(res.assignments[1].entity, Some(id(2)));
    let frodo = r.entity(id(2)).unwrap();
    assert_eq!(frodo.books.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn gazetteer_mentions_may_cross_kinds_but_tagger_mentions_may_not() {
    let mut r = resolver();
    r.resolve_chapter(&[mention(1, 1, 0, "Rivendel", MentionKind::Location)]);

    let res = r.resolve_chapter(&[gazetteer_mention(1, 2, 0, "Rivendel", MentionKind::Person)]);
    assert_eq!(res.assignments[0].entity, Some(id(1)));
    assert!((res.assignments[0].confidence.value() - 0.8).abs() < 1e-9);

    let res = r.resolve_chapter(&[mention(1, 3, 0, "Rivendel", MentionKind::Person)]);
    assert_eq!(res.assignments[0].entity, Some(id(2)));
    assert_eq!(res.assignments[0].rule, MatchRule::NewEntity);
}

#[test]
fn confirmed_terms_only_include_tagger_mentions() {
    let mut r = resolver();
    let res = r.resolve_chapter(&[
        mention(1, 1, 0, "Gandalf", MentionKind::Person),
        gazetteer_mention(1, 1, 1, "Mithrandir", MentionKind::Person),
        mention(1, 1, 2, "Gandalf", MentionKind::Person),
    ]);
    assert_eq!(
        res.confirmed_terms,
        vec![("Gandalf".to_string(), MentionKind::Person)]
    );
    assert_eq!(r.confirmed_terms().len(), 1);
}

#[test]
fn resolving_a_chapter_twice_replaces_its_mentions() {
    let mut r = resolver();
    r.resolve_chapter(&people(1, 1, &["Frodo", "Sam"]));
    r.resolve_chapter(&people(1, 1, &["Frodo", "Sam"]));

    assert_eq!(r.roster().len(), 2);
    assert!(r.entities().all(|e| e.mentions.len() == 1));
    assert_eq!(r.assignments().count(), 2);
}

#[test]
fn operator_confirms_review_choice() {
    let mut r = resolver();
    r.resolve_chapter(&people(1, 1, &["Juan García", "Juan Pérez"]));
    let res = r.resolve_chapter(&people(1, 2, &["Juan"]));
    let mention = res.assignments[0].mention;

    r.confirm_assignment(mention, id(2)).unwrap();
    let assignment = r.assignment(&mention).unwrap();
    assert_eq!(assignment.entity, Some(id(2)));
    assert_eq!(assignment.status, AssignmentStatus::Confirmed);
    assert_eq!(assignment.rule, MatchRule::Operator);
    assert!(r.needs_review().is_empty());
    assert!(r.entity(id(2)).unwrap().aliases.contains("Juan"));
}

#[test]
fn operator_deny_detaches_mention() {
    let mut r = resolver();
    r.resolve_chapter(&people(1, 1, &["Juan García"]));
    let res = r.resolve_chapter(&people(1, 2, &["Juan"]));
    let mention = res.assignments[0].mention;

    let new_id = r.deny_assignment(mention).unwrap();
    assert_ne!(new_id, id(1));
    assert_eq!(r.entity_of(&mention), Some(new_id));
    assert!(!r.entity(id(1)).unwrap().aliases.contains("Juan"));

    // Denying again keeps the lone entity.
    assert_eq!(r.deny_assignment(mention).unwrap(), new_id);
}

#[test]
fn operator_merge_and_split() {
    let mut r = resolver();
    r.resolve_chapter(&people(1, 1, &["Gandalf", "Mithrandir", "Gandalf"]));
    assert_eq!(r.roster().len(), 2);

    r.merge_entities(id(1), id(2)).unwrap();
    assert_eq!(r.roster().len(), 1);
    let merged = r.entity(id(1)).unwrap();
    assert_eq!(merged.display_name, "Gandalf");
    assert_eq!(merged.mentions.len(), 3);
    assert!(r.assignments().all(|a| a.entity == Some(id(1))));

    let outcome = r.split_entity(id(1), &["Mithrandir".to_string()]).unwrap();
    assert_eq!(outcome.from, id(1));
    assert_eq!(outcome.moved.len(), 1);
    let split = r.entity(outcome.new_entity).unwrap();
    assert_eq!(split.display_name, "Mithrandir");
    assert_eq!(r.entity(id(1)).unwrap().mentions.len(), 2);
}

#[test]
fn operator_errors_name_the_unit() {
    let mut r = resolver();
    r.resolve_chapter(&people(1, 1, &["Gandalf", "Gandalf"]));
    let missing = people(1, 9, &["Nadie"])[0].reference();

    assert!(matches!(
        r.confirm_assignment(missing, id(1)),
        Err(ResolutionError::UnknownMention { .. })
    ));
    assert!(matches!(
        r.merge_entities(id(1), id(42)),
        Err(ResolutionError::UnknownEntity { id }) if id.value() == 42
    ));
    assert!(matches!(
        r.split_entity(id(1), &["Gandalf".to_string()]),
        Err(ResolutionError::InvalidSplit { .. })
    ));
    assert!(matches!(
        r.split_entity(id(1), &["Saruman".to_string()]),
        Err(ResolutionError::InvalidSplit { .. })
    ));
    assert!(matches!(
        r.split_entity(id(1), &[]),
        Err(ResolutionError::InvalidSplit { .. })
    ));
}

#[test]
fn merging_entities_rewrites_suggestions() {
    let mut r = resolver();
    r.resolve_chapter(&people(1, 1, &["Juan García"]));
    r.resolve_chapter(&people(2, 1, &["Juan"]));
    assert_eq!(r.merge_suggestions().len(), 1);

    r.merge_entities(id(1), id(2)).unwrap();
    assert!(r.merge_suggestions().is_empty());
    assert_eq!(r.entity(id(1)).unwrap().books.len(), 2);
}

#[test]
fn dismissing_a_suggestion() {
    let mut r = resolver();
    r.resolve_chapter(&people(1, 1, &["Juan García"]));
    r.resolve_chapter(&people(2, 1, &["Juan"]));
    assert!(r.dismiss_suggestion(id(2), id(1)));
    assert!(!r.dismiss_suggestion(id(2), id(1)));
    assert_eq!(r.roster().len(), 2);
}

fn name() -> impl Strategy<Value = String> {
    let pool = vec!["Juan", "García", "Pérez", "Ana", "Lucía"];
    prop::sample::subsequence(pool, 1..=2).prop_map(|tokens| tokens.join(" "))
}

proptest! {
    #[test]
    fn alias_merge_is_commutative(a in name(), b in name()) {
        let mut forward = resolver();
        forward.resolve_chapter(&people(1, 1, &[a.as_str()]));
        forward.resolve_chapter(&people(1, 2, &[b.as_str()]));

        let mut backward = resolver();
        backward.resolve_chapter(&people(1, 1, &[b.as_str()]));
        backward.resolve_chapter(&people(1, 2, &[a.as_str()]));

        prop_assert_eq!(alias_sets(&forward), alias_sets(&backward));
    }
}
