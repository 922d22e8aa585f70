//! Text helpers for backend messages and log lines.

/// Marker appended to a shortened preview
pub const ELLIPSIS: &str = "...";

/// Shorten `text` for a log line or an error message.
///
/// The result holds at most `max_bytes` bytes of the original, cut on a
/// UTF-8 boundary, followed by [`ELLIPSIS`] when anything was dropped.
/// Surrounding whitespace is removed first, so a JSON error body padded with
/// newlines does not eat the budget.
pub fn preview(text: &str, max_bytes: usize) -> String {
    let text = text.trim();
    if text.len() <= max_bytes {
        return text.to_string();
    }

    let mut end = max_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", text[..end].trim_end(), ELLIPSIS)
}
