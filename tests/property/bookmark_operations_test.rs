//! Property-based tests for bookmark operations through the view controller.
//!
//! Adding a bookmark and then searching by its title always finds it, and
//! tags submitted in any case come back lowercased and listed in the filter.

use bookmark_manager::managers::view_controller::{SubmitOutcome, ViewController};
use bookmark_manager::services::memory_backend::MemoryBackend;
use proptest::prelude::*;
use tokio::runtime::Runtime;

/// Valid http(s) URLs with an alphanumeric host and optional path.
fn arb_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("https"), Just("http")],
        "[a-z][a-z0-9]{2,15}",
        prop_oneof![Just(".com"), Just(".org"), Just(".net"), Just(".io")],
        proptest::option::of("/[a-z0-9]{1,10}"),
    )
        .prop_map(|(scheme, host, tld, path)| {
            format!("{}://{}{}{}", scheme, host, tld, path.unwrap_or_default())
        })
}

fn arb_title() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 ]{1,30}"
}

fn arb_tags() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-zA-Z]{1,8}", 0..=5)
}

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn bookmark_add_then_search_returns_result(
        url in arb_url(),
        title in arb_title(),
        tags in arb_tags(),
    ) {
        let rt = runtime();
        let mut controller = ViewController::new(MemoryBackend::new());

        let saved = rt.block_on(async {
            controller.mount().await.unwrap();
            controller.open_create_form();
            controller
                .edit_form(|f| {
                    f.url = url.clone();
                    f.title = title.clone();
                    f.tags_input = tags.join(",");
                })
                .unwrap();
            match controller.submit_form().await.unwrap() {
                SubmitOutcome::Saved(bookmark) => bookmark,
                other => panic!("not saved: {:?}", other),
            }
        });

        prop_assert_eq!(&saved.title, title.trim());
        let expected_tags: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();
        prop_assert_eq!(&saved.tags, &expected_tags);
        for tag in &expected_tags {
            prop_assert!(controller.state().tags.contains(tag));
        }

        rt.block_on(async {
            controller.input_search(saved.title.to_uppercase());
            controller.settle_search().await;
        });
        let visible = controller.state().visible();
        prop_assert!(visible.iter().any(|b| b.id == saved.id));
    }

    #[test]
    fn bookmark_delete_removes_it_from_list(
        urls in proptest::collection::vec(arb_url(), 1..6),
        victim in any::<prop::sample::Index>(),
    ) {
        let rt = runtime();
        let mut controller = ViewController::new(MemoryBackend::new());

        rt.block_on(async {
            controller.mount().await.unwrap();
            for (i, url) in urls.iter().enumerate() {
                controller.open_create_form();
                controller
                    .edit_form(|f| {
                        f.url = url.clone();
                        f.title = format!("Bookmark {}", i);
                    })
                    .unwrap();
                controller.submit_form().await.unwrap();
            }
        });
        prop_assert_eq!(controller.state().bookmarks.len(), urls.len());

        let id = controller.state().bookmarks[victim.index(urls.len())].id;
        rt.block_on(controller.delete(id)).unwrap();

        prop_assert_eq!(controller.state().bookmarks.len(), urls.len() - 1);
        prop_assert!(controller.state().find(id).is_none());
    }
}
