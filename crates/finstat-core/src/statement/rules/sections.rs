//! Section slicing between marker phrases.

/// Slice `text` from the first `start` marker up to the first `end` marker
/// found at or after it.
///
/// An absent start marker yields an empty slice. An end marker that only
/// occurs before the start marker is ignored and the slice runs to the end
/// of the text.
pub fn extract_section<'a>(text: &'a str, start: &str, end: &str) -> &'a str {
    let Some(start_idx) = text.find(start) else {
        return "";
    };

    match text[start_idx..].find(end) {
        Some(offset) => &text[start_idx..start_idx + offset],
        None => &text[start_idx..],
    }
}
