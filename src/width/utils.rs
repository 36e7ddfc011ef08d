/// Remove ANSI escape sequences, leaving only printable text.
pub fn strip_ansi(text: &str) -> String {
    let clean = strip_ansi_escapes::strip(text);
    String::from_utf8_lossy(&clean).into_owned()
}

/// Compute the display width of a string after stripping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(strip_ansi(text).as_str())
}

/// Cut plain text so it occupies at most `max_width` cells. Wide characters
/// that would straddle the limit are dropped.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut width = 0usize;
    for ch in text.chars() {
        let w = char_width(ch);
        if width + w > max_width {
            break;
        }
        width += w;
        result.push(ch);
    }
    result
}

/// Drop the first `cells` columns of plain text. A wide character cut in half
/// leaves a space in its place.
pub fn skip_width(text: &str, cells: usize) -> String {
    let mut skipped = 0usize;
    let mut chars = text.chars();
    let mut result = String::new();
    while skipped < cells {
        match chars.next() {
            Some(ch) => skipped += char_width(ch),
            None => return result,
        }
    }
    for _ in cells..skipped {
        result.push(' ');
    }
    result.extend(chars);
    result
}

fn char_width(ch: char) -> usize {
    unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0)
}
