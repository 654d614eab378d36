//! Assertions of one attribute in story-time order.
//!
//! Facts are grouped by the axis their instant sits on. Within each axis the
//! group is sorted by position, stable on discourse order, and written back
//! into the slots that group occupied. Facts with no position and facts on
//! different axes keep their discourse slots, so the result is ordered by
//! story time wherever two instants are comparable and by discourse
//! otherwise.

use std::collections::BTreeMap;

use lore_core::models::AttributeAssertion;
use lore_ledger::EntityFacts;
use lore_temporal::{story_position, StoryAxis, TimelineContext};

pub fn in_story_order<'a>(
    facts: &'a EntityFacts,
    attribute: &str,
    ctx: &TimelineContext,
) -> Vec<&'a AttributeAssertion> {
    let mut ordered: Vec<&'a AttributeAssertion> = facts
        .assertions
        .iter()
        .filter(|a| a.attribute == attribute)
        .collect();

    let mut groups: BTreeMap<StoryAxis, Vec<(usize, i64)>> = BTreeMap::new();
    for (slot, assertion) in ordered.iter().enumerate() {
        if let Some(position) = story_position(&assertion.instance, ctx) {
            groups
                .entry(position.axis)
                .or_default()
                .push((slot, position.value));
        }
    }

    let discourse = ordered.clone();
    for members in groups.values() {
        let mut by_time = members.clone();
        by_time.sort_by_key(|&(slot, value)| (value, slot));
        for (&(slot, _), &(from, _)) in members.iter().zip(&by_time) {
            ordered[slot] = discourse[from];
        }
    }
    ordered
}
