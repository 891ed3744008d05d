//! Search/Filter Logic: views derived from the in-memory bookmark list.
//!
//! Both functions are local: neither triggers a server request.

use std::collections::BTreeSet;

use crate::types::bookmark::Bookmark;

/// Every distinct tag across `bookmarks`, sorted ascending.
pub fn all_tags(bookmarks: &[Bookmark]) -> Vec<String> {
    bookmarks
        .iter()
        .flat_map(|b| b.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// True when `bookmark`'s title or URL contains `needle` (already lowercased).
fn matches(bookmark: &Bookmark, needle: &str) -> bool {
    bookmark.title.to_lowercase().contains(needle) || bookmark.url.to_lowercase().contains(needle)
}

/// Bookmarks whose title or URL contains `query`, case-insensitively.
///
/// A blank query returns the whole list. Order is preserved.
pub fn filter_by_text<'a>(bookmarks: &'a [Bookmark], query: &str) -> Vec<&'a Bookmark> {
    if query.trim().is_empty() {
        return bookmarks.iter().collect();
    }
    let needle = query.to_lowercase();
    bookmarks.iter().filter(|b| matches(b, &needle)).collect()
}
