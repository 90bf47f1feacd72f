use regex::Regex;
use std::sync::OnceLock;

fn sentence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[.!?।॥。]+\s+").expect("valid sentence regex"))
}

fn push_current(batch: &mut String, batches: &mut Vec<String>) {
    let trimmed = batch.trim();
    if !trimmed.is_empty() {
        batches.push(trimmed.to_string());
    }
    batch.clear();
}

/// Split text into batches that respect sentence boundaries.
/// Each batch holds at most `max_chars` characters.
pub fn split_into_batches(text: &str, max_chars: usize) -> Vec<String> {
    let len = |s: &str| s.chars().count();

    if len(text) <= max_chars {
        return vec![text.to_string()];
    }

    let mut batches = Vec::new();
    let mut current_batch = String::new();

    let mut pieces: Vec<&str> = Vec::new();
    let mut last_end = 0;
    for mat in sentence_pattern().find_iter(text) {
        pieces.push(&text[last_end..mat.end()]);
        last_end = mat.end();
    }
    if last_end < text.len() {
        pieces.push(&text[last_end..]);
    }

    for piece in pieces {
        if !current_batch.is_empty() && len(&current_batch) + len(piece) > max_chars {
            push_current(&mut current_batch, &mut batches);
        }

        // A single sentence longer than the limit is split on words, then on
        // characters when a word alone is too long
        if len(piece) > max_chars {
            for word in piece.split_inclusive(char::is_whitespace) {
                if !current_batch.is_empty() && len(&current_batch) + len(word) > max_chars {
                    push_current(&mut current_batch, &mut batches);
                }
                if len(word) > max_chars {
                    let chars: Vec<char> = word.chars().collect();
                    for chunk in chars.chunks(max_chars) {
                        batches.push(chunk.iter().collect());
                    }
                } else {
                    current_batch.push_str(word);
                }
            }
        } else {
            current_batch.push_str(piece);
        }
    }

    push_current(&mut current_batch, &mut batches);
    batches
}
