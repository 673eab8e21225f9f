/// Shorten `text` to at most `max_chars` characters, appending `marker`
/// when anything was cut
pub fn preview_text(text: &str, max_chars: usize, marker: &str) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], marker),
        None => text.to_string(),
    }
}
