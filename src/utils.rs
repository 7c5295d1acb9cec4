// Character-safe prefix of `text`, at most `max_chars` chars long.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
