//! Index maintenance properties: idempotence, updates and deletion.

use crate::common::{indexed, make_doc};
use crate::{corpus_strategy, document_strategy, word_strategy};
use proptest::prelude::*;
use rose::{
    Finder, Indexable, Indexer, MemoryStorage, Normalizer, Query, StorageRead,
};
use std::collections::BTreeSet;
use std::sync::Arc;

fn corpus(raw: &[(String, String, u32)]) -> Vec<Indexable> {
    raw.iter()
        .enumerate()
        .map(|(i, (title, content, instance))| {
            make_doc(&format!("d{}", i), title, content, *instance)
        })
        .collect()
}

fn stems_of(docs: &[Indexable]) -> BTreeSet<String> {
    let normalizer = Normalizer::default();
    docs.iter()
        .flat_map(|doc| {
            let mut stems = normalizer.stems(&doc.title);
            stems.extend(normalizer.stems(&doc.content));
            stems
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: indexing every document twice leaves storage exactly as
    /// indexing it once, posting order included.
    #[test]
    fn prop_reindexing_is_idempotent(raw in corpus_strategy()) {
        let docs = corpus(&raw);
        let once = indexed(&docs).unwrap();
        let doubled: Vec<Indexable> = docs.iter().chain(docs.iter()).cloned().collect();
        let twice = indexed(&doubled).unwrap();

        for stem in stems_of(&docs) {
            prop_assert_eq!(
                once.postings(&stem).unwrap(),
                twice.postings(&stem).unwrap(),
                "postings differ for {:?}",
                stem
            );
        }
        prop_assert_eq!(once.toc_size().unwrap(), twice.toc_size().unwrap());
    }

    /// Property: after re-indexing with new content, a stem only present in
    /// the old version no longer finds the document.
    #[test]
    fn prop_update_drops_stale_terms(
        old in prop::collection::vec(word_strategy(), 1..10),
        new in prop::collection::vec(word_strategy(), 1..10),
    ) {
        let storage = Arc::new(MemoryStorage::new());
        let indexer = Indexer::new(Arc::clone(&storage), Normalizer::default());
        indexer.index(&make_doc("doc", "", &old.join(" "), 1)).unwrap();
        indexer.index(&make_doc("doc", "", &new.join(" "), 1)).unwrap();

        let normalizer = Normalizer::default();
        let fresh: BTreeSet<String> = normalizer.stems(&new.join(" ")).into_iter().collect();
        let finder = Finder::new(Arc::clone(&storage), Normalizer::default());

        for word in &old {
            let stem = normalizer.stem(word);
            let results = finder.find(&Query::new(word.as_str())).unwrap();
            if fresh.contains(&stem) {
                prop_assert_eq!(results.len(), 1);
            } else {
                prop_assert!(results.is_empty(), "stale word {:?} still matches", word);
            }
        }
    }

    /// Property: a removed identity never shows up again, and nothing else is
    /// affected.
    #[test]
    fn prop_removed_document_disappears(
        raw in corpus_strategy(),
        victim in any::<prop::sample::Index>(),
        query in document_strategy(),
    ) {
        let docs = corpus(&raw);
        let storage = indexed(&docs).unwrap();
        let finder = Finder::new(Arc::clone(&storage), Normalizer::default());
        let before = finder.find(&Query::new(query.as_str())).unwrap();

        let target = docs[victim.index(docs.len())].identity.clone();
        Indexer::new(Arc::clone(&storage), Normalizer::default())
            .remove_by_id(&target.id, target.instance_id)
            .unwrap();

        let after = finder.find(&Query::new(query.as_str())).unwrap();
        prop_assert!(after.all_items().iter().all(|item| item.identity() != &target));
        prop_assert!(storage.toc_entry(&target).unwrap().is_none());

        let expected: Vec<_> = before
            .sorted_relevance_by_identity()
            .into_iter()
            .filter(|(identity, _)| identity != &target)
            .collect();
        prop_assert_eq!(after.sorted_relevance_by_identity(), expected);
    }
}
