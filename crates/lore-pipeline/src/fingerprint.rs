use lore_core::models::{AnnotationPayload, Chapter};

/// blake3 over everything that affects a chapter's analysis: text,
/// flashback flag and annotations. Hex-encoded.
pub fn fingerprint(chapter: &Chapter) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(chapter.text.as_bytes());
    hasher.update(&[u8::from(chapter.flashback)]);
    for annotation in &chapter.annotations {
        hasher.update(b"\x1e");
        hasher.update(&(annotation.span.start as u64).to_le_bytes());
        hasher.update(&(annotation.span.end as u64).to_le_bytes());
        match &annotation.payload {
            AnnotationPayload::Attribute { name, value } => {
                hasher.update(b"attribute\x1f");
                hasher.update(name.as_bytes());
                hasher.update(b"\x1f");
                hasher.update(value.as_bytes());
            }
            AnnotationPayload::Anchor => {
                hasher.update(b"anchor");
            }
        }
        hasher.update(b"\x1f");
        if let Some(anchor) = &annotation.anchor {
            hasher.update(anchor.as_bytes());
        }
        hasher.update(b"\x1f");
        if let Some(confidence) = annotation.confidence {
            hasher.update(&confidence.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lore_core::models::{Annotation, ChapterRef, Span};

    fn chapter() -> Chapter {
        Chapter::new(ChapterRef::new(1, 1), "Elena llegó a Toledo.")
    }

    #[test]
    fn stable_for_identical_chapters() {
        assert_eq!(fingerprint(&chapter()), fingerprint(&chapter()));
    }

    #[test]
    fn changes_with_flashback_and_annotations() {
        let base = fingerprint(&chapter());

        let mut flashback = chapter();
        flashback.flashback = true;
        assert_ne!(fingerprint(&flashback), base);

        let mut annotated = chapter();
        annotated.annotations.push(Annotation {
            span: Span::new(0, 5),
            payload: AnnotationPayload::Anchor,
            anchor: Some("age:30".into()),
            confidence: None,
        });
        assert_ne!(fingerprint(&annotated), base);
    }
}
