//! Shared test utilities and fixtures.

#![allow(dead_code)]

use rose::{
    DocumentIdentity, Finder, Indexable, MemoryStorage, Normalizer, ResultSet, SnippetBuilder,
};
use std::sync::{Arc, Once};

// Re-export canonical test utilities from rose::testing
pub use rose::testing::{content_provider, date, indexed, make_doc, rose_corpus};

static TRACING: Once = Once::new();

/// Route library events to the test writer. Set `RUST_LOG` to see them.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// ENGINE FIXTURE
// ============================================================================

/// A corpus indexed into memory, plus a finder and snippet builder over it.
pub struct Engine {
    pub docs: Vec<Indexable>,
    pub storage: Arc<MemoryStorage>,
    pub finder: Finder<Arc<MemoryStorage>>,
    pub snippets: SnippetBuilder,
}

impl Engine {
    pub fn over(docs: Vec<Indexable>) -> Self {
        init_tracing();
        let storage = indexed(&docs).expect("indexing fixture corpus");
        Engine {
            finder: Finder::new(Arc::clone(&storage), Normalizer::default()),
            snippets: SnippetBuilder::new(Normalizer::default()),
            storage,
            docs,
        }
    }

    /// Search and attach snippets in one go.
    pub fn search(&self, query: &str) -> ResultSet {
        let mut results = self.finder.find(&rose::Query::new(query)).expect("find");
        self.snippets
            .attach_snippets(&mut results, &content_provider(&self.docs))
            .expect("attach snippets");
        results
    }
}

/// The multilingual corpus, indexed.
pub fn rose_engine() -> Engine {
    Engine::over(rose_corpus())
}

// ============================================================================
// ASSERTIONS
// ============================================================================

/// `instance:id` strings of every result, in rank order.
pub fn ranked_ids(results: &ResultSet) -> Vec<String> {
    results
        .sorted_relevance_by_identity()
        .into_iter()
        .map(|(identity, _)| identity.to_string())
        .collect()
}

pub fn identity(id: &str, instance: u32) -> DocumentIdentity {
    DocumentIdentity::new(id, instance)
}

/// Relevances never increase down the ranking.
pub fn assert_ranked(results: &ResultSet) {
    let scores: Vec<f64> = results.all_items().iter().map(|item| item.relevance()).collect();
    for pair in scores.windows(2) {
        assert!(pair[0] >= pair[1], "ranking not descending: {:?}", scores);
    }
}
