//! Embeddable full-text search with stemming, field-weighted ranking and
//! highlighted snippets.
//!
//! Documents go in through the [`Indexer`], queries come out of the [`Finder`]
//! as a ranked [`ResultSet`], and the [`SnippetBuilder`] decorates results with
//! highlighted excerpts fetched from the application. Index state lives in a
//! storage collaborator behind [`StorageRead`]/[`StorageWrite`]; the engine
//! itself keeps nothing between calls.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐     ┌────────────┐     ┌──────────────┐
//! │  Indexer   │────▶│  storage   │◀────│    Finder    │
//! │ (index,    │     │ (postings, │     │ (find, rank, │
//! │  remove)   │     │  TOC)      │     │  highlight)  │
//! └────────────┘     └────────────┘     └──────────────┘
//!        │                                     │
//!        ▼                                     ▼
//! ┌──────────────────────────┐        ┌──────────────────┐
//! │        Normalizer        │◀───────│  SnippetBuilder  │
//! │ (tokenizer, stemmer)     │        │ (ContentProvider)│
//! └──────────────────────────┘        └──────────────────┘
//! ```
//!
//! | Module      | Responsibility                                   |
//! |-------------|--------------------------------------------------|
//! | `types`     | identities, documents, postings, queries         |
//! | `text`      | markup stripping, tokenizing, stemming           |
//! | `scoring`   | field weights, repetition decay, phrase bonuses  |
//! | `storage`   | storage and content contracts, `MemoryStorage`   |
//! | `indexer`   | document → contribution, auto-erase              |
//! | `search`    | finder, result set, highlight template           |
//! | `snippet`   | snippet window selection                         |
//! | `contracts` | debug-only invariant checks                      |
//!
//! # Usage
//!
//! ```
//! use rose::{Finder, Indexable, Indexer, MemoryStorage, Normalizer, Query};
//! use std::sync::Arc;
//!
//! let storage = Arc::new(MemoryStorage::new());
//! let indexer = Indexer::new(Arc::clone(&storage), Normalizer::default());
//! indexer.index(&Indexable::new("id_1", "Test page title", "I have changed the content.", 10))?;
//!
//! let finder = Finder::new(storage, Normalizer::default());
//! let results = finder.find(&Query::new("title"))?;
//! assert_eq!(results.items()[0].highlighted_title(), "Test page <i>title</i>");
//! # Ok::<(), rose::Error>(())
//! ```

pub mod contracts;
pub mod error;
pub mod indexer;
pub mod scoring;
pub mod search;
pub mod snippet;
pub mod storage;
pub mod testing;
pub mod text;
pub mod types;

// Re-exports for public API
pub use error::{BoxError, Error, Result};
pub use indexer::Indexer;
pub use search::{Finder, HighlightTemplate, ResultItem, ResultSet};
pub use snippet::{SnippetBuilder, SnippetOptions};
pub use storage::{ContentProvider, ExternalContent, MemoryStorage, StorageRead, StorageWrite};
pub use text::{Language, Normalizer, Stemmer};
pub use types::{
    DocumentContribution, DocumentIdentity, FieldHits, FieldKind, Indexable, Posting, PostingList,
    Query, TocEntry,
};
