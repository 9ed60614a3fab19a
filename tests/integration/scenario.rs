//! End-to-end scenario over the mixed-language corpus.

use crate::common::{identity, ranked_ids, rose_engine, assert_ranked, date};
use rose::Query;

// ============================================================================
// FIELD WEIGHTING AND RANKING
// ============================================================================

#[test]
fn test_description_is_not_searchable() {
    let engine = rose_engine();
    let results = engine.finder.find(&Query::new("snippets")).unwrap();
    assert!(results.sorted_relevance_by_identity().is_empty());
}

#[test]
fn test_shared_content_term_ranks_by_field() {
    let engine = rose_engine();
    let results = engine.finder.find(&Query::new("content")).unwrap();

    assert_eq!(
        results.sorted_relevance_by_identity(),
        vec![
            (identity("id_2", 20), 10.0),
            (identity("id_1", 20), 1.5),
            (identity("id_1", 10), 1.0),
        ]
    );
    assert_ranked(&results);
}

#[test]
fn test_result_items_carry_toc_metadata() {
    let engine = rose_engine();
    let results = engine.finder.find(&Query::new("content")).unwrap();
    let item = &results.items()[2];

    assert_eq!(item.id(), "id_1");
    assert_eq!(item.instance_id(), Some(10));
    assert_eq!(item.title(), "Test page title");
    assert_eq!(item.url(), "url1");
    assert_eq!(item.description(), "Description can be used in snippets");
    assert_eq!(item.date(), date(2016, 8, 24));
    assert_eq!(item.relevance(), 1.0);
    // no snippet attached yet
    assert_eq!(item.snippet(), "Description can be used in snippets");
}

#[test]
fn test_snippets_for_shared_content_term() {
    let engine = rose_engine();
    let results = engine.search("content");
    let items = results.items();

    assert_eq!(items[2].snippet(), "I have changed the <i>content</i>.");
    assert_eq!(
        items[1].snippet(),
        "Word \"<i>content</i>\" is present here. Twice: <i>content</i>."
    );
    // matched through keywords only, so there is nothing to cut out
    assert!(!items[0].has_snippet());
    assert_eq!(items[0].snippet(), "");
}

#[test]
fn test_relevance_override() {
    let engine = rose_engine();
    let mut results = engine.finder.find(&Query::new("content")).unwrap();

    assert!(results.set_relevance_ratio(&identity("id_1", 10), 3.14));
    assert_eq!(
        ranked_ids(&results),
        vec!["20:id_2", "10:id_1", "20:id_1"]
    );
    assert_eq!(results.sorted_relevance_by_identity()[1].1, 3.14);

    assert!(results.set_relevance_ratio(&identity("id_1", 10), 100.0));
    let items = results.items();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].relevance(), 100.0);
    assert_eq!(items[0].identity(), &identity("id_1", 10));
}

#[test]
fn test_instance_filter() {
    let engine = rose_engine();

    let results = engine
        .finder
        .find(&Query::new("content").with_instance_id(10))
        .unwrap();
    assert_eq!(ranked_ids(&results), vec!["10:id_1"]);

    let results = engine
        .finder
        .find(&Query::new("content").with_instance_id(20))
        .unwrap();
    assert_eq!(ranked_ids(&results), vec!["20:id_2", "20:id_1"]);
}

#[test]
fn test_title_highlighting() {
    let engine = rose_engine();
    let results = engine.finder.find(&Query::new("title")).unwrap();
    assert_eq!(results.items()[0].id(), "id_1");
    assert_eq!(results.items()[0].highlighted_title(), "Test page <i>title</i>");
}

#[test]
fn test_declared_keyword_phrase() {
    let engine = rose_engine();
    let results = engine.finder.find(&Query::new("Multiple keywords")).unwrap();

    assert_eq!(ranked_ids(&results), vec!["10:id_1"]);
    // both words in keywords, side by side, plus the whole declared phrase
    assert_eq!(results.items()[0].relevance(), 40.0);

    let results = engine.finder.find_by_keyword("singlekeyword").unwrap();
    assert_eq!(ranked_ids(&results), vec!["10:id_1"]);
}

#[test]
fn test_declared_keyword_phrase_ignores_punctuation_and_entities() {
    let engine = rose_engine();
    for query in ["Multiple keywords.", "multiple&nbsp;keywords", "\"MULTIPLE, keywords\""] {
        let results = engine.finder.find(&Query::new(query)).unwrap();
        assert_eq!(ranked_ids(&results), vec!["10:id_1"], "query {:?}", query);
        assert_eq!(results.items()[0].relevance(), 40.0, "query {:?}", query);
    }
}

#[test]
fn test_empty_queries() {
    let engine = rose_engine();
    for query in ["", "'", "   ", "...", "&amp;"] {
        let results = engine.finder.find(&Query::new(query)).unwrap();
        assert!(results.is_empty(), "query {:?} returned results", query);
    }
}

#[test]
fn test_paging() {
    let engine = rose_engine();
    let results = engine
        .finder
        .find(&Query::new("content").with_offset(1).with_limit(1))
        .unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results.items().len(), 1);
    assert_eq!(results.items()[0].identity(), &identity("id_1", 20));
}

// ============================================================================
// RUSSIAN DOCUMENT
// ============================================================================

#[test]
fn test_entities_and_plain_words() {
    let engine = rose_engine();
    let results = engine.search("сущность Plus");

    assert_eq!(results.items()[0].id(), "id_3");
    assert_eq!(
        results.items()[0].snippet(),
        "Тут есть тонкость - нужно проверить, как происходит экранировка в <i>сущностях</i> \
         вроде &plus;. Для этого нужно включить в текст само сочетание букв \"<i>plus</i>\"."
    );
}

#[test]
fn test_hyphenated_words_split() {
    let engine = rose_engine();
    let results = engine.search("эпл");

    assert_eq!(results.len(), 1);
    assert_eq!(results.items()[0].id(), "id_3");
    assert_eq!(
        results.items()[0].snippet(),
        "Например, красно-черный, <i>эпл</i>-вотчем, и другие интересные комбинации."
    );
}

#[test]
fn test_custom_template_for_titles_and_snippets() {
    let mut engine = rose_engine();
    engine.finder.set_highlight_template("<b>%s</b>").unwrap();
    let results = engine.search("красный заголовку");

    assert_eq!(results.len(), 1);
    let item = &results.items()[0];
    assert_eq!(item.id(), "id_3");
    assert_eq!(
        item.snippet(),
        "Например, <b>красно</b>-черный, эпл-вотчем, и другие интересные комбинации."
    );
    assert_eq!(
        item.highlighted_title(),
        "Русский текст. <b>Красным</b> <b>заголовком</b>"
    );
}

#[test]
fn test_inflected_title_match() {
    let engine = rose_engine();
    for query in ["русский", "русскому"] {
        let results = engine.finder.find(&Query::new(query)).unwrap();
        assert_eq!(results.len(), 1, "query {:?}", query);
        assert_eq!(results.items()[0].relevance(), 20.0);
    }
}

#[test]
fn test_phrase_in_content() {
    let engine = rose_engine();
    let results = engine.finder.find(&Query::new("учитель не должен")).unwrap();

    assert_eq!(results.len(), 1);
    // 1 + 1.5 ("не" occurs twice) + 1, plus two adjacent pairs
    assert_eq!(results.items()[0].relevance(), 5.5);
}
