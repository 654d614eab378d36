use lore_core::models::{
    Annotation, AnnotationPayload, Chapter, ChapterRef, Conflict, ConflictType, EntityId,
    Evidence, Mention, MentionKind, MentionRef, MentionSource, Span, Tier,
};
use lore_core::Confidence;

/// Builds a [`Chapter`] whose annotations are located by surface text.
///
/// # Panics
/// Annotation helpers panic when the surface text is not in the chapter.
#[derive(Debug, Clone)]
pub struct ChapterBuilder {
    chapter: Chapter,
}

impl ChapterBuilder {
    pub fn new(book: u16, chapter: u32, text: &str) -> Self {
        Self {
            chapter: Chapter::new(ChapterRef::new(book, chapter), text),
        }
    }

    pub fn flashback(mut self) -> Self {
        self.chapter.flashback = true;
        self
    }

    /// Attribute asserted on the first occurrence of `surface`.
    pub fn attribute(self, surface: &str, name: &str, value: &str, anchor: Option<&str>) -> Self {
        self.annotate(
            surface,
            AnnotationPayload::Attribute {
                name: name.into(),
                value: value.into(),
            },
            anchor,
            None,
        )
    }

    /// Attribute with an explicit confidence.
    pub fn attribute_with_confidence(
        self,
        surface: &str,
        name: &str,
        value: &str,
        anchor: Option<&str>,
        confidence: f64,
    ) -> Self {
        self.annotate(
            surface,
            AnnotationPayload::Attribute {
                name: name.into(),
                value: value.into(),
            },
            anchor,
            Some(confidence),
        )
    }

    /// Bare temporal anchor on the first occurrence of `surface`.
    pub fn anchor(self, surface: &str, anchor: &str) -> Self {
        self.annotate(surface, AnnotationPayload::Anchor, Some(anchor), None)
    }

    pub fn build(self) -> Chapter {
        self.chapter
    }

    fn annotate(
        mut self,
        surface: &str,
        payload: AnnotationPayload,
        anchor: Option<&str>,
        confidence: Option<f64>,
    ) -> Self {
        let span = find_span(&self.chapter.text, surface).unwrap_or_else(|| {
            panic!(
                "{surface:?} not found in chapter {}",
                self.chapter.reference
            )
        });
        self.chapter.annotations.push(Annotation {
            span,
            payload,
            anchor: anchor.map(str::to_string),
            confidence,
        });
        self
    }
}

/// Char-offset span of the first occurrence of `needle`.
pub fn find_span(text: &str, needle: &str) -> Option<Span> {
    let byte = text.find(needle)?;
    let start = text[..byte].chars().count();
    Some(Span::new(start, start + needle.chars().count()))
}

/// A tagger-sourced mention. Spans are synthetic: ten chars per ordinal.
pub fn mention(book: u16, chapter: u32, ordinal: u32, text: &str, kind: MentionKind) -> Mention {
    let start = ordinal as usize * 10;
    Mention {
        chapter: ChapterRef::new(book, chapter),
        ordinal,
        text: text.to_string(),
        kind,
        span: Span::new(start, start + text.chars().count()),
        confidence: Confidence::new(Confidence::HIGH),
        source: MentionSource::Tagger,
    }
}

/// Same as [`mention`] but sourced from the gazetteer at medium confidence.
pub fn gazetteer_mention(
    book: u16,
    chapter: u32,
    ordinal: u32,
    text: &str,
    kind: MentionKind,
) -> Mention {
    Mention {
        confidence: Confidence::new(Confidence::MEDIUM),
        source: MentionSource::Gazetteer,
        ..mention(book, chapter, ordinal, text, kind)
    }
}

/// One chapter's worth of tagger person mentions, in order.
pub fn people(book: u16, chapter: u32, names: &[&str]) -> Vec<Mention> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| mention(book, chapter, i as u32, name, MentionKind::Person))
        .collect()
}

/// A two-fact conflict located in `chapter`. `seed` varies the evidence so
/// conflicts built with different seeds get different ids.
pub fn conflict(
    conflict_type: ConflictType,
    tier: Tier,
    chapter: (u16, u32),
    entity: u64,
    seed: u32,
) -> Conflict {
    let chapter = ChapterRef::new(chapter.0, chapter.1);
    let evidence = |ordinal: u32, value: &str| {
        let start = ordinal as usize * 10;
        Evidence {
            chapter,
            span: Span::new(start, start + 5),
            mention: MentionRef { chapter, ordinal },
            value: value.to_string(),
            anchor: format!("age:{}", 20 + ordinal),
            confidence: Confidence::new(0.9),
            source: MentionSource::Tagger,
        }
    };
    Conflict::new(
        conflict_type,
        EntityId(entity),
        format!("Personaje {entity}"),
        "eye_color",
        vec![evidence(seed * 2, "verde"), evidence(seed * 2 + 1, "azul")],
        tier,
        format!("conflict {seed} in {chapter}"),
    )
}
