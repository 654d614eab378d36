use std::collections::BTreeMap;

use lore_core::config::TemporalConfig;
use lore_core::models::TemporalInstance;
use lore_temporal::{
    compare, elapsed_years, AnchorParser, BirthYear, Comparison, ComparisonBasis,
    IncomparableReason, TimelineContext,
};
use proptest::prelude::*;

fn inst(token: &str) -> TemporalInstance {
    AnchorParser::new(&TemporalConfig::default())
        .parse(token)
        .unwrap()
}

fn ctx() -> TimelineContext {
    TimelineContext::new()
}

#[test]
fn ages_are_totally_ordered() {
    assert_eq!(
        compare(&inst("1@age:20"), &inst("1@age:25"), &ctx()),
        Comparison::Before {
            basis: ComparisonBasis::Exact
        }
    );
    assert_eq!(
        compare(&inst("1@year:1985"), &inst("1@year:1985"), &ctx()),
        Comparison::Same {
            basis: ComparisonBasis::Exact
        }
    );
}

#[test]
fn different_entities_never_compare() {
    assert_eq!(
        compare(&inst("1@age:20"), &inst("2@age:20"), &ctx()),
        Comparison::Incomparable {
            reason: IncomparableReason::DifferentEntities
        }
    );
}

#[test]
fn age_and_year_need_a_birth_year() {
    let a = inst("1@age:20");
    let b = inst("1@year:1990");
    assert_eq!(
        compare(&a, &b, &ctx()),
        Comparison::Incomparable {
            reason: IncomparableReason::MissingBirthYear
        }
    );

    let declared = ctx().with_birth_year(BirthYear::declared(1970));
    assert_eq!(
        compare(&a, &b, &declared),
        Comparison::Same {
            basis: ComparisonBasis::DeclaredBirthYear
        }
    );

    let inferred = ctx().with_birth_year(BirthYear::inferred(1975));
    assert_eq!(
        compare(&a, &b, &inferred),
        Comparison::After {
            basis: ComparisonBasis::InferredBirthYear
        }
    );
}

#[test]
fn phases_are_partially_ordered() {
    assert_eq!(
        compare(&inst("1@phase:child"), &inst("1@phase:elder"), &ctx()),
        Comparison::Before {
            basis: ComparisonBasis::PhaseOrder
        }
    );
    let same = compare(&inst("1@phase:adult"), &inst("1@phase:adult"), &ctx());
    assert!(same.may_coincide());
    assert!(!same.is_same());
    // Phases do not share an axis with years.
    assert_eq!(
        compare(&inst("1@phase:adult"), &inst("1@year:1990"), &ctx()),
        Comparison::Incomparable {
            reason: IncomparableReason::KindMismatch
        }
    );
}

#[test]
fn relative_markers_need_a_reference() {
    let future = inst("1@phase:future_self");
    assert_eq!(
        compare(&future, &inst("1@age:30"), &ctx()),
        Comparison::Incomparable {
            reason: IncomparableReason::RelativeWithoutReference
        }
    );

    let pinned = inst("1@phase:future_self/age:30");
    assert!(matches!(
        compare(&pinned, &inst("1@age:30"), &ctx()),
        Comparison::After { .. }
    ));
    assert!(matches!(
        compare(&inst("1@age:12"), &pinned, &ctx()),
        Comparison::Before { .. }
    ));
    // Later than the reference: cannot tell.
    assert!(!compare(&pinned, &inst("1@age:45"), &ctx()).is_comparable());

    let past = inst("1@phase:past_self/phase:adult");
    assert!(matches!(
        compare(&past, &inst("1@phase:elder"), &ctx()),
        Comparison::Before { .. }
    ));
}

#[test]
fn unreferenced_offsets_are_incomparable() {
    let a = inst("1@offset:+2");
    let b = inst("1@offset:+5");
    assert_eq!(
        compare(&a, &b, &ctx()),
        Comparison::Incomparable {
            reason: IncomparableReason::UnreferencedOffset
        }
    );
    assert!(!compare(&inst("1@offset:+2/war"), &inst("1@offset:+2/flood"), &ctx()).is_comparable());
}

#[test]
fn offsets_against_shared_reference_compare() {
    assert_eq!(
        compare(&inst("1@offset:+2/war"), &inst("1@offset:+5/war"), &ctx()),
        Comparison::Before {
            basis: ComparisonBasis::ReferenceEvent
        }
    );
}

#[test]
fn declared_reference_event_joins_calendar() {
    let mut events = BTreeMap::new();
    events.insert("war".to_string(), 1936);
    let with_event = ctx().with_reference_events(events);
    assert_eq!(
        compare(&inst("1@offset:+3/war"), &inst("1@year:1939"), &with_event),
        Comparison::Same {
            basis: ComparisonBasis::ReferenceEvent
        }
    );
}

#[test]
fn chapter_local_facts_compare_within_chapter_only() {
    let a = inst("1@offset:0/ch:1.2");
    let b = inst("1@offset:0/ch:1.2");
    let c = inst("1@offset:0/ch:1.3");
    assert_eq!(
        compare(&a, &b, &ctx()),
        Comparison::Same {
            basis: ComparisonBasis::ChapterLocal
        }
    );
    assert!(!compare(&a, &c, &ctx()).is_comparable());
    assert!(!compare(&a, &inst("1@year:1990"), &ctx()).is_comparable());
}

#[test]
fn elapsed_years_between_calendar_instances() {
    assert_eq!(
        elapsed_years(&inst("1@year:1990"), &inst("1@year:1995"), &ctx()),
        Some((5, ComparisonBasis::Exact))
    );
    assert_eq!(
        elapsed_years(&inst("1@phase:teen"), &inst("1@year:1995"), &ctx()),
        None
    );
}

#[test]
fn huge_offsets_stay_incomparable_instead_of_wrapping() {
    let mut events = BTreeMap::new();
    events.insert("coronation".to_string(), 1900);
    let with_event = ctx().with_reference_events(events);
    let far = inst(&format!("1@offset:+{}/coronation", i64::MAX));
    assert_eq!(
        compare(&far, &inst("1@year:1985"), &with_event),
        Comparison::Incomparable {
            reason: IncomparableReason::OutOfRange
        }
    );
    assert_eq!(elapsed_years(&far, &inst("1@year:1985"), &with_event), None);

    let early = inst(&format!("1@offset:-{}/boda", i64::MAX));
    let late = inst(&format!("1@offset:+{}/boda", i64::MAX));
    assert!(matches!(
        compare(&early, &late, &ctx()),
        Comparison::Before { .. }
    ));
    assert_eq!(elapsed_years(&early, &late, &ctx()), None);
    assert_eq!(
        elapsed_years(&inst("1@offset:-3/boda"), &inst("1@offset:+4/boda"), &ctx()),
        Some((7, ComparisonBasis::ReferenceEvent))
    );
}

fn any_token() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..=130).prop_map(|a| format!("1@age:{a}")),
        (1900i32..=2100).prop_map(|y| format!("1@year:{y}")),
        prop::sample::select(vec!["child", "teen", "young", "adult", "elder"])
            .prop_map(|p| format!("1@phase:{p}")),
        (-20i64..=20).prop_map(|o| format!("1@offset:{o:+}/war")),
        (-20i64..=20).prop_map(|o| format!("1@offset:{o:+}")),
        (0u32..=130).prop_map(|a| format!("1@phase:future_self/age:{a}")),
    ]
}

proptest! {
    #[test]
    fn comparison_is_antisymmetric(a in any_token(), b in any_token(), birth in 1850i32..2000) {
        let ctx = TimelineContext::new().with_birth_year(BirthYear::inferred(birth));
        let (a, b) = (inst(&a), inst(&b));
        prop_assert_eq!(compare(&a, &b, &ctx), compare(&b, &a, &ctx).reverse());
    }
}
