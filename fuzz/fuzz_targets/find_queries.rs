// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for query handling.
//!
//! Throws arbitrary queries at a small multilingual index and checks that
//! results stay ranked, unique and snippet-safe.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rose::testing::{content_provider, indexed, rose_corpus};
use rose::{Finder, Indexable, MemoryStorage, Normalizer, Query, SnippetBuilder};
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

struct Fixture {
    docs: Vec<Indexable>,
    finder: Finder<Arc<MemoryStorage>>,
    snippets: SnippetBuilder,
}

fuzz_target!(|query: &[u8]| {
    // Build the index once per process
    static FIXTURE: OnceLock<Option<Fixture>> = OnceLock::new();
    let Some(fixture) = FIXTURE.get_or_init(|| {
        let docs = rose_corpus();
        let storage = indexed(&docs).ok()?;
        Some(Fixture {
            finder: Finder::new(storage, Normalizer::default()),
            snippets: SnippetBuilder::new(Normalizer::default()),
            docs,
        })
    }) else {
        return;
    };

    let text: String = String::from_utf8_lossy(query).chars().take(200).collect();
    let Ok(mut results) = fixture.finder.find(&Query::new(text.as_str())) else {
        return;
    };

    // INVARIANT 1: relevance never increases down the list
    let ranked = results.sorted_relevance_by_identity();
    for pair in ranked.windows(2) {
        assert!(
            pair[0].1 >= pair[1].1,
            "ranking violated: {} ({}) before {} ({})",
            pair[0].0,
            pair[0].1,
            pair[1].0,
            pair[1].1
        );
    }

    // INVARIANT 2: each identity appears once
    let unique: HashSet<_> = ranked.iter().map(|(identity, _)| identity).collect();
    assert_eq!(unique.len(), ranked.len(), "duplicate identities");

    // INVARIANT 3: snippet rendering never panics
    let provider = content_provider(&fixture.docs);
    if fixture.snippets.attach_snippets(&mut results, &provider).is_ok() {
        for item in results.items() {
            let _ = item.snippet();
        }
    }
});
