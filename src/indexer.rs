// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index construction and maintenance.
//!
//! Every `index` call turns a document into one `DocumentContribution` and
//! hands it to storage, which supersedes the previous version of the same
//! identity. Re-indexing is therefore delete-then-insert, and indexing the
//! same document twice leaves storage exactly as indexing it once.
//!
//! # Fields
//!
//! | Field    | Source                      | Weight                         |
//! |----------|-----------------------------|--------------------------------|
//! | Title    | `Indexable::title`          | `TITLE_WEIGHT`, once           |
//! | Keyword  | words of declared phrases   | `KEYWORD_WEIGHT`, once         |
//! | Content  | `Indexable::content`, tags stripped | `CONTENT_WEIGHT` with repetition decay |
//!
//! The description is display metadata and never reaches the postings.

use crate::error::{Error, Result};
use crate::scoring::field_score;
use crate::storage::StorageWrite;
use crate::text::{markup, tokenize, Normalizer};
use crate::types::{DocumentContribution, DocumentIdentity, FieldHits, FieldKind, Indexable};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Positions skipped between keyword phrases so the phrase bonus never joins
/// the last word of one phrase with the first word of the next.
const PHRASE_GAP: u32 = 1;

/// Writes documents into a storage collaborator.
#[derive(Debug)]
pub struct Indexer<S> {
    storage: S,
    normalizer: Normalizer,
    auto_erase: bool,
}

impl<S: StorageWrite> Indexer<S> {
    pub fn new(storage: S, normalizer: Normalizer) -> Self {
        Indexer {
            storage,
            normalizer,
            auto_erase: false,
        }
    }

    /// Builder form of `set_auto_erase`.
    pub fn with_auto_erase(mut self, enabled: bool) -> Self {
        self.auto_erase = enabled;
        self
    }

    /// When enabled, an uninitialized storage is erased (bootstrapped) before
    /// the first write instead of failing with `Error::UninitializedStorage`.
    pub fn set_auto_erase(&mut self, enabled: bool) {
        self.auto_erase = enabled;
    }

    pub fn auto_erase(&self) -> bool {
        self.auto_erase
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Add `doc` to the index, replacing any earlier version of its identity.
    pub fn index(&self, doc: &Indexable) -> Result<()> {
        self.ensure_initialized()?;

        let contribution = self.contribution(doc);
        debug!(
            identity = %doc.identity,
            terms = contribution.terms.len(),
            phrases = contribution.keyword_phrases.len(),
            "indexing document"
        );
        self.storage.replace_document(&contribution)
    }

    /// Index several documents in order, stopping at the first failure.
    pub fn index_all<'a, I>(&self, docs: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Indexable>,
    {
        let mut count = 0;
        for doc in docs {
            self.index(doc)?;
            count += 1;
        }
        Ok(count)
    }

    /// Remove everything indexed under `(id, instance_id)`. Unknown
    /// identities are a no-op.
    pub fn remove_by_id(&self, id: &str, instance_id: impl Into<Option<u32>>) -> Result<()> {
        self.ensure_initialized()?;
        let identity = DocumentIdentity::new(id, instance_id);
        debug!(identity = %identity, "removing document");
        self.storage.remove_document(&identity)
    }

    /// Wipe the whole index.
    pub fn erase(&self) -> Result<()> {
        self.storage.erase()
    }

    /// Build the full contribution of `doc` without touching storage.
    pub fn contribution(&self, doc: &Indexable) -> DocumentContribution {
        let mut occurrences: BTreeMap<String, BTreeMap<FieldKind, Vec<u32>>> = BTreeMap::new();
        let mut record = |field: FieldKind, stem: String, position: u32| {
            occurrences
                .entry(stem)
                .or_default()
                .entry(field)
                .or_default()
                .push(position);
        };

        for term in self.normalizer.terms(&doc.title) {
            record(FieldKind::Title, term.stem, term.position);
        }

        let phrases = doc.keyword_phrases();
        let mut offset = 0u32;
        for phrase in &phrases {
            let terms = self.normalizer.terms(phrase);
            let len = terms.len() as u32;
            for term in terms {
                record(FieldKind::Keyword, term.stem, offset + term.position);
            }
            offset += len + PHRASE_GAP;
        }

        let body = markup::strip_tags(&doc.content);
        for term in self.normalizer.terms(&body) {
            record(FieldKind::Content, term.stem, term.position);
        }

        let terms = occurrences
            .into_iter()
            .map(|(stem, fields)| {
                let hits = fields
                    .into_iter()
                    .map(|(field, positions)| FieldHits {
                        field,
                        weight: field_score(field, positions.len()),
                        positions,
                    })
                    .collect();
                (stem, hits)
            })
            .collect();

        let mut keyword_phrases: Vec<String> = phrases
            .iter()
            .map(|phrase| fold_phrase(phrase))
            .filter(|phrase| !phrase.is_empty())
            .collect();
        keyword_phrases.dedup();

        DocumentContribution {
            identity: doc.identity.clone(),
            terms,
            keyword_phrases,
            toc: doc.toc_entry(),
        }
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.storage.is_initialized()? {
            return Ok(());
        }
        if !self.auto_erase {
            return Err(Error::UninitializedStorage);
        }
        warn!("storage is not initialized, erasing it before writing");
        self.storage.erase()
    }
}

/// Fold a literal keyword phrase for the phrase index: its folded tokens
/// joined by single spaces, so entities and punctuation match the way the
/// tokenizer sees them.
pub fn fold_phrase(phrase: &str) -> String {
    tokenize(phrase)
        .into_iter()
        .map(|token| token.term)
        .collect::<Vec<_>>()
        .join(" ")
}
