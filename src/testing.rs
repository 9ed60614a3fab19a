//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical fixtures to avoid duplication.

#![doc(hidden)]

use crate::error::Result;
use crate::indexer::Indexer;
use crate::storage::{ExternalContent, MemoryStorage};
use crate::text::Normalizer;
use crate::types::{DocumentIdentity, Indexable};
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

/// Midnight of the given day, `None` for an invalid date.
pub fn date(year: i32, month: u32, day: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Create a simple test document.
pub fn make_doc(id: &str, title: &str, content: &str, instance_id: u32) -> Indexable {
    Indexable::new(id, title, content, instance_id)
}

/// The mixed-language corpus, in indexing order.
///
/// `id_1` under instance 10 is indexed twice; the second version replaces the
/// first. `id_1` under instance 20 is a different document.
pub fn rose_corpus() -> Vec<Indexable> {
    let mut first = make_doc(
        "id_1",
        "Test page title",
        "This is the first page to be indexed. I have to make up a content.",
        10,
    )
    .with_keywords("singlekeyword, multiple keywords")
    .with_description("Description can be used in snippets")
    .with_url("url1");
    first.date = date(2016, 8, 24);

    let mut second = make_doc(
        "id_2",
        "To be continued...",
        "This is the second page to be indexed. Let's compose something new.",
        20,
    )
    .with_keywords("content, ")
    .with_description("")
    .with_url("any string");
    second.date = date(2016, 8, 20);

    let mut russian = make_doc(
        "id_3",
        "Русский текст. Красным заголовком",
        concat!(
            "<p>Для проверки работы нужно написать побольше слов. В 1,7 раз больше. ",
            "Вот еще одно предложение.</p>",
            "<p>Тут есть тонкость - нужно проверить, как происходит экранировка в сущностях ",
            "вроде &plus;. Для этого нужно включить в текст само сочетание букв \"plus\".</p>",
            "<p>Еще одна особенность - наличие слов с дефисом. Например, красно-черный, ",
            "эпл-вотчем, и другие интересные комбинации. Встречаются и другие знаки ",
            "препинания, например, цифры. Я не помню Windows 3.1, но помню Turbo Pascal 7.0. ",
            "Надо отдельно посмотреть, что ищется по одной цифре 7... ",
            "Учитель не должен допускать такого...</p>",
            "<p>А еще текст бывает на других языках. Например, в украинском есть слово ціна.</p>",
        ),
        20,
    )
    .with_keywords("ключевые слова")
    .with_description("")
    .with_url("/якобы.урл");
    russian.date = date(2016, 8, 22);

    let mut changed = make_doc(
        "id_1",
        "Test page title",
        "This is the first page to be indexed. I have changed the content.",
        10,
    )
    .with_keywords("singlekeyword, multiple keywords")
    .with_description("Description can be used in snippets")
    .with_url("url1");
    changed.date = date(2016, 8, 24);

    let other_instance = make_doc(
        "id_1",
        "Another instance",
        "The same id but another instance. Word \"content\" is present here. Twice: content.",
        20,
    );

    vec![first, second, russian, changed, other_instance]
}

/// Index `docs` in order into a fresh in-memory store.
pub fn indexed(docs: &[Indexable]) -> Result<Arc<MemoryStorage>> {
    let storage = Arc::new(MemoryStorage::new());
    Indexer::new(Arc::clone(&storage), Normalizer::default()).index_all(docs)?;
    Ok(storage)
}

/// Content provider serving the latest body indexed for each identity.
pub fn content_provider(
    docs: &[Indexable],
) -> impl Fn(&[DocumentIdentity]) -> Result<ExternalContent> + Sync + '_ {
    move |ids: &[DocumentIdentity]| {
        let mut content = ExternalContent::new();
        for doc in docs.iter().filter(|doc| ids.contains(&doc.identity)) {
            content.insert(doc.identity.clone(), doc.content.clone());
        }
        Ok(content)
    }
}
