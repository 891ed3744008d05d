//! Property-based tests for the local search and tag derivation.

use bookmark_manager::services::search_filter::{all_tags, filter_by_text};
use bookmark_manager::types::bookmark::{Bookmark, BookmarkId};
use proptest::prelude::*;

fn arb_bookmark() -> impl Strategy<Value = Bookmark> {
    (
        any::<u64>(),
        "https://[a-z]{3,10}\\.(com|org)/[a-zA-Z]{0,6}",
        "[a-zA-Z ]{1,20}",
        proptest::collection::vec("[a-z]{1,6}", 0..=5),
    )
        .prop_map(|(id, url, title, tags)| Bookmark {
            id: BookmarkId(id),
            url,
            title,
            description: String::new(),
            tags,
            created_at: "2025-01-01T00:00:00Z".to_string(),
        })
}

fn arb_list() -> impl Strategy<Value = Vec<Bookmark>> {
    proptest::collection::vec(arb_bookmark(), 0..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every result matches the query, every match is a result, and the
    /// original order is kept.
    #[test]
    fn filter_returns_exactly_the_matching_subsequence(
        list in arb_list(),
        query in "[a-zA-Z]{1,3}",
    ) {
        let needle = query.to_lowercase();
        let expected: Vec<&Bookmark> = list
            .iter()
            .filter(|b| {
                b.title.to_lowercase().contains(&needle) || b.url.to_lowercase().contains(&needle)
            })
            .collect();
        prop_assert_eq!(filter_by_text(&list, &query), expected);
    }

    #[test]
    fn filter_is_case_insensitive(list in arb_list(), query in "[a-zA-Z]{1,3}") {
        prop_assert_eq!(
            filter_by_text(&list, &query.to_uppercase()),
            filter_by_text(&list, &query.to_lowercase())
        );
    }

    #[test]
    fn blank_query_keeps_everything(list in arb_list(), blank in " {0,4}") {
        prop_assert_eq!(filter_by_text(&list, &blank).len(), list.len());
    }

    /// The tag union is sorted, free of duplicates, and covers every tag used.
    #[test]
    fn all_tags_is_sorted_unique_union(list in arb_list()) {
        let tags = all_tags(&list);
        prop_assert!(tags.windows(2).all(|pair| pair[0] < pair[1]));
        for bookmark in &list {
            for tag in &bookmark.tags {
                prop_assert!(tags.contains(tag));
            }
        }
        for tag in &tags {
            prop_assert!(list.iter().any(|b| b.has_tag(tag)));
        }
    }
}
