//! Greedy regrouping of sentences into request-sized chunks.

/// Default per-request character limit of the synthesis endpoint.
pub const DEFAULT_MAX_CHUNK_LENGTH: usize = 250;

/// Combine consecutive sentences into chunks of at most `max_len` characters.
///
/// Sentences are joined with a single space. A sentence that alone exceeds
/// `max_len` is never split and becomes its own chunk.
pub fn combine_chunks<I, S>(sentences: I, max_len: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for sentence in sentences {
        let sentence = sentence.as_ref().trim();
        if sentence.is_empty() {
            continue;
        }
        let sentence_len = sentence.chars().count();

        if current_len > 0 && current_len + 1 + sentence_len > max_len {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(sentence);
        current_len += sentence_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
