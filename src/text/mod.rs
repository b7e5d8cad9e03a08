//! Text cleanup shared by the feed parser and the snapshot updater.

use std::borrow::Cow;

/// Reduce an HTML fragment to plain text: drop tags, decode entities,
/// collapse runs of whitespace.
pub fn clean_html(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut in_tag = false;

    for ch in raw.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                // Tags become separators so "<p>a</p><p>b</p>" keeps a gap.
                text.push(' ');
            }
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }

    let decoded = html_escape::decode_html_entities(&text);
    collapse_whitespace(&decoded)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to `max` characters, replacing the tail with `...` when the text
/// is longer. Character-based: publisher text is full of diacritics.
pub fn truncate_chars(text: &str, max: usize) -> Cow<'_, str> {
    if text.chars().count() <= max {
        return Cow::Borrowed(text);
    }
    let head: String = text.chars().take(max.saturating_sub(3)).collect();
    Cow::Owned(format!("{head}..."))
}

/// Plain character-count cap with no ellipsis (snapshot fields).
pub fn cap_chars(text: &str, max: usize) -> Cow<'_, str> {
    if text.chars().count() <= max {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.chars().take(max).collect())
}
