//! Aggregate statistics over the active conflicts.
//!
//! - critical_unresolved: open tier-1 conflicts, total and per type
//! - empty_chapters: known chapters without a tier-1 conflict (coverage signal)
//! - event_clusters: chapters holding at least `cluster_min_size` conflicts
//!   of one type, largest first, capped at `max_clusters` (0 = no cap)
//! - density_by_chapter: conflicts per tier for every chapter
//!
//! Dismissed conflicts count for nothing except the density table.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use lore_core::config::IndexConfig;
use lore_core::models::{ChapterRef, ConflictId, ConflictStatus, ConflictType, Tier};

use crate::record::ConflictRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriticalSummary {
    pub count: usize,
    /// Keyed by the type's wire name.
    pub by_type: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCluster {
    pub chapter: ChapterRef,
    pub conflict_type: ConflictType,
    pub count: usize,
    pub conflicts: Vec<ConflictId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterDensity {
    pub chapter: ChapterRef,
    pub tier1: usize,
    pub tier2: usize,
    pub tier3: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub critical_unresolved: CriticalSummary,
    pub empty_chapters: Vec<ChapterRef>,
    pub event_clusters: Vec<EventCluster>,
    pub density_by_chapter: Vec<ChapterDensity>,
}

pub(crate) fn compute<'a>(
    records: impl Iterator<Item = &'a ConflictRecord>,
    known_chapters: &BTreeSet<ChapterRef>,
    config: &IndexConfig,
) -> IndexStats {
    let mut critical = CriticalSummary::default();
    let mut density: BTreeMap<ChapterRef, ChapterDensity> = known_chapters
        .iter()
        .map(|&chapter| {
            (
                chapter,
                ChapterDensity {
                    chapter,
                    ..ChapterDensity::default()
                },
            )
        })
        .collect();
    let mut with_tier1: BTreeSet<ChapterRef> = BTreeSet::new();
    let mut groups: BTreeMap<(ChapterRef, ConflictType), Vec<ConflictId>> = BTreeMap::new();

    for record in records {
        let conflict = &record.conflict;
        let row = density.entry(conflict.chapter).or_insert_with(|| ChapterDensity {
            chapter: conflict.chapter,
            ..ChapterDensity::default()
        });
        match conflict.tier {
            Tier::Critical => row.tier1 += 1,
            Tier::Medium => row.tier2 += 1,
            Tier::Speculative => row.tier3 += 1,
        }
        row.total += 1;

        if record.status == ConflictStatus::Dismissed {
            continue;
        }
        if conflict.tier == Tier::Critical {
            with_tier1.insert(conflict.chapter);
            if record.is_open() {
                critical.count += 1;
                *critical
                    .by_type
                    .entry(conflict.conflict_type.as_str().to_string())
                    .or_default() += 1;
            }
        }
        groups
            .entry((conflict.chapter, conflict.conflict_type))
            .or_default()
            .push(conflict.id.clone());
    }

    let empty_chapters = known_chapters
        .iter()
        .filter(|c| !with_tier1.contains(c))
        .copied()
        .collect();

    let mut event_clusters: Vec<EventCluster> = groups
        .into_iter()
        .filter(|(_, ids)| ids.len() >= config.cluster_min_size)
        .map(|((chapter, conflict_type), mut conflicts)| {
            conflicts.sort();
            EventCluster {
                chapter,
                conflict_type,
                count: conflicts.len(),
                conflicts,
            }
        })
        .collect();
    event_clusters.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then(a.chapter.cmp(&b.chapter))
            .then(a.conflict_type.cmp(&b.conflict_type))
    });
    if config.max_clusters > 0 {
        event_clusters.truncate(config.max_clusters);
    }

    IndexStats {
        critical_unresolved: critical,
        empty_chapters,
        event_clusters,
        density_by_chapter: density.into_values().collect(),
    }
}
