mod common;

use std::{
    sync::Arc,
    time::Duration,
};

use bushou::{
    radicals::VariantIndex,
    study::{
        Carousel,
        Category,
        Revision,
        SearchController,
    },
};
use common::DictionaryApi;

fn controller(api: Arc<DictionaryApi>, revision: Revision) -> Arc<SearchController> {
    let variants = Arc::new(VariantIndex::build(&common::radicals()));
    Arc::new(SearchController::new(api, variants, revision, Duration::from_secs(5)))
}

fn simplified(category: &Category<Vec<bushou::api::DictEntry>>) -> Vec<String> {
    category.items().iter().map(|e| e.simplified.clone()).collect()
}

#[tokio::test]
async fn test_single_character_search() {
    let search = controller(Arc::new(DictionaryApi::new()), Revision::new());

    search.search("爱").await;
    let session = search.snapshot();

    assert!(session.is_ready());
    assert_eq!(session.query, "爱");
    assert_eq!(session.radicals, Category::Loaded(vec![87, 14, 29]));

    let definitions = session.definitions.loaded().unwrap();
    assert_eq!(definitions.len(), 1);
    assert_eq!(definitions[0].character, "爱");
    assert_eq!(definitions[0].entries[0].pinyin, "ai4");

    assert_eq!(simplified(&session.examples), vec!["可爱", "爱情", "爱人"]);
    assert_eq!(simplified(&session.dictionary).len(), 4);
}

#[tokio::test]
async fn test_multi_character_search_keeps_input_order() {
    let search = controller(Arc::new(DictionaryApi::new()), Revision::new());

    search.search("雪爱").await;
    let session = search.snapshot();

    assert_eq!(session.radicals, Category::Loaded(vec![173, 58, 87, 14, 29]));

    let characters: Vec<&str> =
        session.definitions.items().iter().map(|d| d.character.as_str()).collect();
    assert_eq!(characters, vec!["雪", "爱"]);

    // Examples come from the first character only
    assert_eq!(simplified(&session.examples), vec!["下雪", "雪人"]);
    assert_eq!(session.dictionary, Category::Loaded(vec![]));
}

#[tokio::test]
async fn test_repeated_radicals_are_deduplicated() {
    let search = controller(Arc::new(DictionaryApi::new()), Revision::new());

    search.search("爱爱").await;
    assert_eq!(search.snapshot().radicals, Category::Loaded(vec![87, 14, 29]));
}

#[tokio::test]
async fn test_latest_search_wins() {
    let api = Arc::new(DictionaryApi::new());
    let search = controller(api.clone(), Revision::new());
    let gate = api.gate("爱");

    let earlier = tokio::spawn({
        let search = search.clone();
        async move { search.search("爱").await }
    });
    while search.snapshot().query != "爱" {
        tokio::task::yield_now().await;
    }

    let later = search.search("雪").await;
    gate.send(true).unwrap();
    let earlier = earlier.await.unwrap();
    assert!(earlier < later);

    let session = search.snapshot();
    assert_eq!(session.token, later);
    assert_eq!(session.query, "雪");
    assert_eq!(session.radicals, Category::Loaded(vec![173, 58]));
    assert_eq!(simplified(&session.examples), vec!["下雪", "雪人"]);
}

#[tokio::test]
async fn test_failed_category_does_not_affect_others() {
    let api = Arc::new(DictionaryApi::new());
    api.fail("examples");
    let search = controller(api, Revision::new());

    search.search("爱").await;
    let session = search.snapshot();

    assert!(session.is_ready());
    assert!(matches!(session.examples, Category::Failed(ref message) if message.contains("examples_failed")));
    assert!(session.examples.items().is_empty());
    assert_eq!(session.radicals, Category::Loaded(vec![87, 14, 29]));
    assert!(session.definitions.loaded().is_some());
    assert!(session.dictionary.loaded().is_some());
}

#[tokio::test]
async fn test_blank_query_makes_no_calls() {
    let api = Arc::new(DictionaryApi::new());
    let search = controller(api.clone(), Revision::new());

    search.search("   ").await;
    assert_eq!(api.calls(), 0);
    assert!(search.snapshot().is_idle());

    search.search("雪").await;
    assert!(!search.snapshot().is_idle());
    search.clear();
    assert!(search.snapshot().is_idle());
}

#[tokio::test]
async fn test_one_revision_per_mutation() {
    let revision = Revision::new();
    let search = controller(Arc::new(DictionaryApi::new()), revision.clone());

    let before = revision.current();
    search.search("爱").await;
    // session start plus one per category
    assert_eq!(revision.current() - before, 5);

    search.next(Carousel::Examples);
    assert_eq!(revision.current() - before, 6);
}

#[tokio::test]
async fn test_carousels_wrap() {
    let search = controller(Arc::new(DictionaryApi::new()), Revision::new());
    search.search("爱").await;

    assert_eq!(search.snapshot().position(Carousel::Examples), 0);
    search.prev(Carousel::Examples);
    assert_eq!(search.snapshot().position(Carousel::Examples), 2);
    search.next(Carousel::Examples);
    search.next(Carousel::Examples);
    assert_eq!(search.snapshot().position(Carousel::Examples), 1);

    for _ in 0..3 {
        search.next(Carousel::Radicals);
    }
    assert_eq!(search.snapshot().position(Carousel::Radicals), 0);

    // A new search starts every carousel over
    search.open_character("爱").await;
    assert_eq!(search.snapshot().position(Carousel::Examples), 0);
}
