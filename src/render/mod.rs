//! Rendering of the site artifacts: the aggregated feed, the sitemap and
//! robots file, and the per-publisher HTML pages.

pub mod feed;
pub mod pages;
pub mod sitemap;

use std::borrow::Cow;

/// Escape special XML characters.
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    // Fast path: check if escaping is needed
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}

/// Romanian category slug: lowercase, dashes for spaces, ampersands and
/// diacritics folded away.
pub fn category_slug_ro(category: &str) -> String {
    category
        .to_lowercase()
        .replace(' ', "-")
        .replace('&', "")
        .replace('ș', "s")
        .replace('ț', "t")
        .replace('ă', "a")
        .replace('â', "a")
        .replace('î', "i")
}

/// English category slug: lowercase, dashes for spaces, no ampersands.
pub fn category_slug_en(category: &str) -> String {
    category.to_lowercase().replace(' ', "-").replace('&', "")
}
