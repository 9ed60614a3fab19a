//! Ranking properties: ordering, uniqueness, filtering and overrides.

use crate::common::{indexed, make_doc};
use crate::{corpus_strategy, query_strategy, word_strategy};
use proptest::prelude::*;
use rose::{Finder, Indexable, Normalizer, Query};
use std::collections::HashSet;
use std::sync::Arc;

fn corpus(raw: &[(String, String, u32)]) -> Vec<Indexable> {
    raw.iter()
        .enumerate()
        .map(|(i, (title, content, instance))| {
            make_doc(&format!("d{}", i % 3), title, content, *instance)
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: results are sorted by relevance and each identity appears once.
    #[test]
    fn prop_results_ranked_and_unique(raw in corpus_strategy(), query in query_strategy()) {
        let storage = indexed(&corpus(&raw)).unwrap();
        let finder = Finder::new(storage, Normalizer::default());
        let results = finder.find(&Query::new(query.as_str())).unwrap();

        let ranked = results.sorted_relevance_by_identity();
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].1 >= pair[1].1, "not descending: {:?}", ranked);
        }
        let unique: HashSet<_> = ranked.iter().map(|(identity, _)| identity.clone()).collect();
        prop_assert_eq!(unique.len(), ranked.len());
        prop_assert!(ranked.iter().all(|(_, relevance)| *relevance > 0.0));
    }

    /// Property: the same query over the same index ranks identically.
    #[test]
    fn prop_ranking_is_deterministic(raw in corpus_strategy(), query in query_strategy()) {
        let docs = corpus(&raw);
        let a = Finder::new(indexed(&docs).unwrap(), Normalizer::default());
        let b = Finder::new(indexed(&docs).unwrap(), Normalizer::default());
        let query = Query::new(query.as_str());
        prop_assert_eq!(
            a.find(&query).unwrap().sorted_relevance_by_identity(),
            b.find(&query).unwrap().sorted_relevance_by_identity()
        );
    }

    /// Property: an instance filter returns exactly the unfiltered results of
    /// that instance, in the same order.
    #[test]
    fn prop_instance_filter_is_a_subset(
        raw in corpus_strategy(),
        query in query_strategy(),
        instance in 1u32..3,
    ) {
        let finder = Finder::new(indexed(&corpus(&raw)).unwrap(), Normalizer::default());
        let all = finder.find(&Query::new(query.as_str())).unwrap();
        let filtered = finder
            .find(&Query::new(query.as_str()).with_instance_id(instance))
            .unwrap();

        let expected: Vec<_> = all
            .sorted_relevance_by_identity()
            .into_iter()
            .filter(|(identity, _)| identity.instance_id == Some(instance))
            .collect();
        prop_assert_eq!(filtered.sorted_relevance_by_identity(), expected);
    }

    /// Property: a relevance override replaces the score, keeps the set sorted
    /// and leaves every other score alone.
    #[test]
    fn prop_relevance_override(
        raw in corpus_strategy(),
        query in query_strategy(),
        pick in any::<prop::sample::Index>(),
        values in prop::collection::vec(0.0f64..100.0, 1..4),
    ) {
        let finder = Finder::new(indexed(&corpus(&raw)).unwrap(), Normalizer::default());
        let mut results = finder.find(&Query::new(query.as_str())).unwrap();
        prop_assume!(!results.is_empty());

        let before = results.sorted_relevance_by_identity();
        let target = before[pick.index(before.len())].0.clone();
        for value in &values {
            prop_assert!(results.set_relevance_ratio(&target, *value));
        }

        let after = results.sorted_relevance_by_identity();
        let last = *values.last().unwrap();
        for pair in after.windows(2) {
            prop_assert!(pair[0].1 >= pair[1].1);
        }
        for (identity, relevance) in &after {
            if identity == &target {
                prop_assert_eq!(*relevance, last);
            } else {
                let original = before.iter().find(|(i, _)| i == identity).map(|(_, r)| *r);
                prop_assert_eq!(Some(*relevance), original);
            }
        }
    }

    /// Property: two words side by side outrank the same words apart.
    #[test]
    fn prop_phrase_beats_scattered(
        first in word_strategy(),
        second in word_strategy(),
        filler in word_strategy(),
    ) {
        let normalizer = Normalizer::default();
        let stems: HashSet<String> =
            [&first, &second, &filler].iter().map(|w| normalizer.stem(w)).collect();
        prop_assume!(stems.len() == 3);

        let docs = vec![
            make_doc("scattered", "", &format!("{} {} {}", second, filler, first), 1),
            make_doc("phrase", "", &format!("{} {} {}", filler, first, second), 1),
        ];
        let finder = Finder::new(indexed(&docs).unwrap(), Normalizer::default());
        let ranked = finder
            .find(&Query::new(format!("{} {}", first, second)))
            .unwrap()
            .sorted_relevance_by_identity();

        prop_assert_eq!(ranked.len(), 2);
        prop_assert_eq!(ranked[0].0.id.as_str(), "phrase");
        prop_assert!(ranked[0].1 > ranked[1].1);
    }
}

#[test]
fn test_phrase_bonus_survives_shared_storage() {
    let docs = vec![make_doc("a", "", "quick brown fox", 1)];
    let storage = indexed(&docs).unwrap();
    let finder = Finder::new(Arc::clone(&storage), Normalizer::default());
    let single = finder.find(&Query::new("quick")).unwrap().items()[0].relevance()
        + finder.find(&Query::new("brown")).unwrap().items()[0].relevance();
    let phrase = finder.find(&Query::new("quick brown")).unwrap().items()[0].relevance();
    assert!(phrase > single);
}
