//! Evidence built from ledger facts.

use lore_core::models::{AnchorRecord, AttributeAssertion, Evidence};

pub fn from_assertion(assertion: &AttributeAssertion) -> Evidence {
    Evidence {
        chapter: assertion.source.chapter,
        span: assertion.source.span,
        mention: assertion.source.mention,
        value: assertion.value.clone(),
        anchor: assertion.instance.anchor.to_string(),
        confidence: assertion.confidence,
        source: assertion.source.origin,
    }
}

pub fn from_anchor(anchor: &AnchorRecord) -> Evidence {
    let bare = anchor.instance.anchor.to_string();
    Evidence {
        chapter: anchor.source.chapter,
        span: anchor.source.span,
        mention: anchor.source.mention,
        value: bare.clone(),
        anchor: bare,
        confidence: anchor.confidence,
        source: anchor.source.origin,
    }
}
