//! Severity tiers.
//!
//! - Tier 3 when any evidence came from the gazetteer scan.
//! - Tier 2 when any evidence is below the high-confidence threshold, the
//!   ordering needed inference, the instants only overlap, or an instance is
//!   flagged low-confidence.
//! - Otherwise the strategy's base tier.

use lore_core::models::{Evidence, MentionSource, Tier};
use lore_temporal::ComparisonBasis;

/// Temporal signals that weaken a finding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierSignals {
    pub basis: Option<ComparisonBasis>,
    /// Same life phase: the instants may not coincide.
    pub overlapping: bool,
    pub weak_instance: bool,
}

pub fn assign_tier(
    base: Tier,
    evidence: &[Evidence],
    signals: TierSignals,
    high_confidence: f64,
) -> Tier {
    if evidence.iter().any(|e| e.source == MentionSource::Gazetteer) {
        return Tier::Speculative;
    }
    let low_confidence = evidence
        .iter()
        .any(|e| !e.confidence.at_least(high_confidence));
    let inferred = signals.basis.is_some_and(|b| !b.is_unambiguous());
    if low_confidence || inferred || signals.overlapping || signals.weak_instance {
        return base.max(Tier::Medium);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use lore_core::models::{ChapterRef, MentionRef, Span};
    use lore_core::Confidence;

    fn evidence(confidence: f64, source: MentionSource) -> Evidence {
        let chapter = ChapterRef::new(1, 1);
        Evidence {
            chapter,
            span: Span::new(0, 4),
            mention: MentionRef { chapter, ordinal: 0 },
            value: "verde".into(),
            anchor: "age:30".into(),
            confidence: Confidence::new(confidence),
            source,
        }
    }

    #[test]
    fn gazetteer_evidence_is_speculative() {
        let ev = [
            evidence(0.9, MentionSource::Tagger),
            evidence(0.9, MentionSource::Gazetteer),
        ];
        assert_eq!(
            assign_tier(Tier::Critical, &ev, TierSignals::default(), 0.8),
            Tier::Speculative
        );
    }

    #[test]
    fn weak_signals_cap_at_medium() {
        let strong = [evidence(0.8, MentionSource::Tagger)];
        let weak = [evidence(0.7, MentionSource::Tagger)];
        assert_eq!(
            assign_tier(Tier::Critical, &strong, TierSignals::default(), 0.8),
            Tier::Critical
        );
        assert_eq!(
            assign_tier(Tier::Critical, &weak, TierSignals::default(), 0.8),
            Tier::Medium
        );
        let inferred = TierSignals {
            basis: Some(ComparisonBasis::InferredBirthYear),
            ..TierSignals::default()
        };
        assert_eq!(assign_tier(Tier::Critical, &strong, inferred, 0.8), Tier::Medium);
        let exact = TierSignals {
            basis: Some(ComparisonBasis::Exact),
            ..TierSignals::default()
        };
        assert_eq!(assign_tier(Tier::Critical, &strong, exact, 0.8), Tier::Critical);
    }

    #[test]
    fn base_tier_is_a_floor() {
        let strong = [evidence(0.9, MentionSource::Tagger)];
        assert_eq!(
            assign_tier(Tier::Medium, &strong, TierSignals::default(), 0.8),
            Tier::Medium
        );
    }
}
