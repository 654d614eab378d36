//! Word tokenizer with char offsets and sentence-position tracking.

use lore_core::constants::SENTENCE_TERMINATORS;

/// Characters joining two word pieces into one token ("O'Brien", "Jean-Luc").
const JOINERS: &[char] = &['-', '\'', '’'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Char offsets, half-open.
    pub start: usize,
    pub end: usize,
    /// First word after a sentence terminator (or of the text).
    pub sentence_initial: bool,
}

/// Split `text` into word tokens.
pub fn tokenize(text: &str) -> Vec<Token> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut at_sentence_start = true;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_alphanumeric() {
            let start = i;
            while i < chars.len()
                && (chars[i].is_alphanumeric()
                    || (JOINERS.contains(&chars[i])
                        && chars.get(i + 1).is_some_and(|n| n.is_alphanumeric())))
            {
                i += 1;
            }
            tokens.push(Token {
                text: chars[start..i].iter().collect(),
                start,
                end: i,
                sentence_initial: at_sentence_start,
            });
            at_sentence_start = false;
            continue;
        }
        if SENTENCE_TERMINATORS.contains(&c) {
            at_sentence_start = true;
        }
        i += 1;
    }
    tokens
}

/// Whether the text between two char offsets is whitespace only.
pub fn only_whitespace_between(chars: &[char], from: usize, to: usize) -> bool {
    from <= to && chars[from..to].iter().all(|c| c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_char_based() {
        let tokens = tokenize("¿Dónde está María?");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Dónde", "está", "María"]);
        assert_eq!((tokens[2].start, tokens[2].end), (12, 17));
    }

    #[test]
    fn sentence_initial_after_terminators() {
        let tokens = tokenize("Llegó Ana. Luego Pedro! —Bien.\nFin");
        let initial: Vec<_> = tokens
            .iter()
            .filter(|t| t.sentence_initial)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(initial, vec!["Llegó", "Luego", "Bien", "Fin"]);
    }

    #[test]
    fn joiners_stay_inside_words() {
        let tokens = tokenize("Jean-Luc y O'Brien - fin");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Jean-Luc", "y", "O'Brien", "fin"]);
    }
}
