//! Sentence splitting.
//!
//! A sentence ends after a run of terminal punctuation (`.`, `!`, `?`) or at a
//! line break. Units are trimmed and empty ones are skipped, so `"Wait?!  \n\n"`
//! yields a single `"Wait?!"`. Text after the last boundary is kept as a final
//! sentence.

/// Lazy iterator over the sentences of a text.
///
/// Cloning the iterator restarts from the clone's position, so a fresh
/// `Sentences::new` (or a clone taken before iterating) can be walked again.
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    rest: &'a str,
}

impl<'a> Sentences<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        while !self.rest.is_empty() {
            let end = boundary(self.rest);
            let (unit, rest) = self.rest.split_at(end);
            self.rest = rest;

            let unit = unit.trim();
            if !unit.is_empty() {
                return Some(unit);
            }
        }
        None
    }
}

/// Byte offset just past the first sentence boundary in `text`.
fn boundary(text: &str) -> usize {
    let mut chars = text.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '\n' => return idx + 1,
            '.' | '!' | '?' => {
                let mut end = idx + ch.len_utf8();
                while let Some(&(next_idx, next)) = chars.peek() {
                    if !is_terminal(next) {
                        break;
                    }
                    end = next_idx + next.len_utf8();
                    chars.next();
                }
                return end;
            }
            _ => {}
        }
    }
    text.len()
}

fn is_terminal(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

/// Convenience wrapper collecting [`Sentences`] into owned strings.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    Sentences::new(text).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_terminal_punctuation() {
        let text = "Hello there. How are you today? I am fine, thank you very much for asking, it means a lot.";
        assert_eq!(
            split_into_sentences(text),
            vec![
                "Hello there.",
                "How are you today?",
                "I am fine, thank you very much for asking, it means a lot.",
            ]
        );
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert_eq!(Sentences::new("").count(), 0);
        assert_eq!(Sentences::new("   \n\r\n  ").count(), 0);
    }

    #[test]
    fn test_punctuation_runs_stay_together() {
        assert_eq!(
            split_into_sentences("Really?! Yes... Great!!!"),
            vec!["Really?!", "Yes...", "Great!!!"]
        );
    }

    #[test]
    fn test_line_breaks_split() {
        assert_eq!(
            split_into_sentences("Step one\nStep two\r\n\nDone."),
            vec!["Step one", "Step two", "Done."]
        );
    }

    #[test]
    fn test_trailing_fragment_is_kept() {
        assert_eq!(
            split_into_sentences("First part. and the rest"),
            vec!["First part.", "and the rest"]
        );
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            split_into_sentences("नमस्ते। आप कैसे हैं? ठीक हूँ!"),
            vec!["नमस्ते। आप कैसे हैं?", "ठीक हूँ!"]
        );
    }

    #[test]
    fn test_iterator_is_restartable() {
        let sentences = Sentences::new("One. Two. Three.");
        let first: Vec<_> = sentences.clone().collect();
        let second: Vec<_> = sentences.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_rejoined_sentences_keep_content() {
        let text = "  Alpha beta.\n Gamma?   Delta!  epsilon ";
        let rejoined = Sentences::new(text).collect::<Vec<_>>().join(" ");
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(rejoined, normalized);
    }
}
