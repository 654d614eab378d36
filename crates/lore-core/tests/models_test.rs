use lore_core::models::*;
use lore_core::Confidence;
use proptest::prelude::*;

fn mention(book: u16, chapter: u32, ordinal: u32, text: &str) -> Mention {
    Mention {
        chapter: ChapterRef::new(book, chapter),
        ordinal,
        text: text.to_string(),
        kind: MentionKind::Person,
        span: Span::new(0, text.chars().count()),
        confidence: Confidence::new(0.8),
        source: MentionSource::Tagger,
    }
}

#[test]
fn chapter_refs_order_by_book_then_chapter() {
    let mut refs = vec![
        ChapterRef::new(2, 1),
        ChapterRef::new(1, 10),
        ChapterRef::new(1, 2),
    ];
    refs.sort();
    assert_eq!(
        refs,
        vec![
            ChapterRef::new(1, 2),
            ChapterRef::new(1, 10),
            ChapterRef::new(2, 1)
        ]
    );
    assert_eq!(ChapterRef::new(1, 10).to_string(), "1.10");
    assert_eq!("3.4".parse::<ChapterRef>().unwrap(), ChapterRef::new(3, 4));
    assert!("3".parse::<ChapterRef>().is_err());
}

#[test]
fn span_overlap_is_half_open() {
    let a = Span::new(0, 5);
    assert!(a.overlaps(&Span::new(4, 8)));
    assert!(!a.overlaps(&Span::new(5, 8)));
    assert!(a.contains(&Span::new(1, 5)));
    assert_eq!(a.len(), 5);
}

#[test]
fn entity_display_name_prefers_frequency_then_completeness() {
    let mut e = Entity::new(EntityId(1), &mention(1, 1, 0, "Juan"));
    assert_eq!(e.display_name, "Juan");

    e.add_mention(&mention(1, 1, 3, "Juan García"));
    // Tie on frequency: the longer form wins.
    assert_eq!(e.display_name, "Juan García");

    e.add_mention(&mention(1, 2, 0, "Juan"));
    assert_eq!(e.display_name, "Juan");
    assert_eq!(e.mentions.len(), 3);
    assert_eq!(e.books.iter().copied().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn entity_alias_keys_are_normalized() {
    let e = Entity::new(EntityId(1), &mention(1, 1, 0, "María"));
    assert!(e.has_alias_key("maria"));
    assert!(e.alias_keys().contains("maria"));
}

#[test]
fn removing_a_mention_updates_display_name() {
    let mut e = Entity::new(EntityId(1), &mention(1, 1, 0, "Ana"));
    e.add_mention(&mention(1, 1, 1, "Ana"));
    e.add_mention(&mention(1, 1, 2, "Ana Ruiz"));
    let target = MentionRef {
        chapter: ChapterRef::new(1, 1),
        ordinal: 0,
    };
    e.remove_mention(&target, "Ana");
    e.remove_mention(
        &MentionRef {
            chapter: ChapterRef::new(1, 1),
            ordinal: 1,
        },
        "Ana",
    );
    assert_eq!(e.display_name, "Ana Ruiz");
    assert_eq!(e.mentions.len(), 1);
}

#[test]
fn anchors_render_in_bare_form() {
    assert_eq!(TemporalAnchor::Age(30).to_string(), "age:30");
    assert_eq!(TemporalAnchor::Year(1985).to_string(), "year:1985");
    assert_eq!(
        TemporalAnchor::Phase(LifePhase::Elder).to_string(),
        "phase:elder"
    );
    assert_eq!(
        TemporalAnchor::Offset {
            years: 5,
            reference: Some("war".into())
        }
        .to_string(),
        "offset:+5/war"
    );
    let relative = TemporalAnchor::Relative {
        marker: RelativeMarker::FutureSelf,
        reference: Some(Box::new(TemporalAnchor::Age(30))),
    };
    assert_eq!(relative.to_string(), "phase:future_self/age:30");
    assert_eq!(relative.kind(), TemporalKind::Phase);

    let instance = TemporalInstance::new(EntityId(4), TemporalAnchor::Age(12));
    assert_eq!(instance.to_string(), "4@age:12");
}

#[test]
fn life_phases_follow_fixed_sequence() {
    assert!(LifePhase::Child < LifePhase::Teen);
    assert!(LifePhase::Adult < LifePhase::Elder);
    assert_eq!("young".parse::<LifePhase>(), Ok(LifePhase::Young));
    assert!("toddler".parse::<LifePhase>().is_err());
}

#[test]
fn tier_serializes_as_number() {
    assert_eq!(serde_json::to_string(&Tier::Critical).unwrap(), "1");
    let tier: Tier = serde_json::from_str("3").unwrap();
    assert_eq!(tier, Tier::Speculative);
    assert!(serde_json::from_str::<Tier>("4").is_err());
}

#[test]
fn anchor_serde_is_adjacently_tagged() {
    let json = serde_json::to_value(TemporalAnchor::Age(7)).unwrap();
    assert_eq!(json, serde_json::json!({"kind": "age", "value": 7}));
}

fn evidence(chapter: u32, value: &str) -> Evidence {
    Evidence {
        chapter: ChapterRef::new(1, chapter),
        span: Span::new(0, 4),
        mention: MentionRef {
            chapter: ChapterRef::new(1, chapter),
            ordinal: 0,
        },
        value: value.to_string(),
        anchor: "year:1985".to_string(),
        confidence: Confidence::new(0.8),
        source: MentionSource::Tagger,
    }
}

#[test]
fn conflict_id_is_content_hash_independent_of_evidence_order() {
    let a = Conflict::new(
        ConflictType::Attribute,
        EntityId(1),
        "Ana",
        "eye_color",
        vec![evidence(1, "azul"), evidence(3, "verde")],
        Tier::Critical,
        "eye_color differs",
    );
    let b = Conflict::new(
        ConflictType::Attribute,
        EntityId(7),
        "Ana",
        "eye_color",
        vec![evidence(3, "verde"), evidence(1, "azul")],
        Tier::Critical,
        "eye_color differs",
    );
    assert_eq!(a.id, b.id);
    assert_eq!(a.chapter, ChapterRef::new(1, 3));
    assert_eq!(a.evidence[0].value, "azul");

    let c = Conflict::new(
        ConflictType::Attribute,
        EntityId(1),
        "Ana",
        "eye_color",
        vec![evidence(1, "azul"), evidence(3, "gris")],
        Tier::Critical,
        "eye_color differs",
    );
    assert_ne!(a.id, c.id);
}

proptest! {
    #[test]
    fn confidence_always_clamped(v in proptest::num::f64::ANY) {
        let c = Confidence::new(v);
        prop_assert!((0.0..=1.0).contains(&c.value()));
    }

    #[test]
    fn absorb_is_commutative_on_aliases(
        left in proptest::collection::vec("[A-Z][a-z]{2,6}", 1..5),
        right in proptest::collection::vec("[A-Z][a-z]{2,6}", 1..5),
    ) {
        let build = |names: &[String], chapter: u32| {
            let mut e = Entity::new(EntityId(chapter as u64), &mention(1, chapter, 0, &names[0]));
            for (i, n) in names.iter().enumerate().skip(1) {
                e.add_mention(&mention(1, chapter, i as u32, n));
            }
            e
        };
        let mut ab = build(&left, 1);
        ab.absorb(build(&right, 2));
        let mut ba = build(&right, 2);
        ba.absorb(build(&left, 1));
        prop_assert_eq!(&ab.aliases, &ba.aliases);
        prop_assert_eq!(&ab.mentions, &ba.mentions);
        prop_assert_eq!(&ab.display_name, &ba.display_name);
    }
}
