// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query execution.
//!
//! # Pipeline
//!
//! ```text
//! query text ──normalize──▶ stems ──drop excluded──▶ postings per stem
//!      │                                                  │
//!      │                               sum field weights per identity
//!      │                                                  │
//!      │                          + phrase bonus for adjacent query pairs
//!      │                                                  │
//!      └──fold──▶ keyword phrase index ──▶ + whole-query keyword bonus
//!                                                         │
//!                                   instance filter, TOC, rank ──▶ ResultSet
//! ```
//!
//! # Invariants
//!
//! - Each stem is looked up once, however often it occurs in the query.
//! - Scores never depend on the description, which is not in the postings.
//! - Identities without a TOC entry are dropped instead of surfacing blank items.

use crate::error::Result;
use crate::indexer::fold_phrase;
use crate::scoring::{field_weight, has_adjacent, phrase_bonus, KEYWORD_PHRASE_WEIGHT};
use crate::search::merge::ResultMerger;
use crate::search::{HighlightTemplate, ResultItem, ResultSet};
use crate::storage::StorageRead;
use crate::text::{Normalizer, Term};
use crate::types::{DocumentIdentity, FieldKind, Posting, Query, TocEntry};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Runs queries against a storage collaborator.
#[derive(Debug)]
pub struct Finder<S> {
    storage: S,
    normalizer: Normalizer,
    template: HighlightTemplate,
}

impl<S: StorageRead> Finder<S> {
    pub fn new(storage: S, normalizer: Normalizer) -> Self {
        Finder {
            storage,
            normalizer,
            template: HighlightTemplate::default(),
        }
    }

    /// Set the pattern used for highlighted titles and snippets of later
    /// searches. The pattern must contain exactly one `%s`.
    pub fn set_highlight_template(&mut self, pattern: &str) -> Result<()> {
        self.template = HighlightTemplate::parse(pattern)?;
        Ok(())
    }

    pub fn highlight_template(&self) -> &HighlightTemplate {
        &self.template
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Pick up changes another writer saved to a snapshot-based storage.
    pub fn reload(&self) -> Result<()> {
        self.storage.reload()
    }

    /// Run a full-text query.
    pub fn find(&self, query: &Query) -> Result<ResultSet> {
        let terms = self.searchable_terms(&query.text)?;
        if terms.is_empty() {
            debug!(query = %query.text, "query has no searchable terms");
            return Ok(ResultSet::empty(query.clone(), self.template.clone()));
        }

        let stems = unique_stems(&terms);
        let pairs = adjacent_pairs(&terms);
        debug!(query = %query.text, stems = ?stems, pairs = pairs.len(), "running query");

        let mut postings: HashMap<&str, Vec<Posting>> = HashMap::with_capacity(stems.len());
        let mut merger = ResultMerger::new();
        for stem in &stems {
            let list = self.storage.postings(stem)?;
            trace!(stem = %stem, documents = list.len(), "fetched postings");
            for posting in &list {
                merger.add(&posting.identity, posting.score());
            }
            postings.insert(stem.as_str(), list);
        }

        for (left, right) in &pairs {
            let (Some(lefts), Some(rights)) = (postings.get(left.as_str()), postings.get(right.as_str())) else {
                continue;
            };
            let rights: HashMap<&DocumentIdentity, &Posting> =
                rights.iter().map(|posting| (&posting.identity, posting)).collect();
            for left_posting in lefts {
                let Some(right_posting) = rights.get(&left_posting.identity) else {
                    continue;
                };
                for field in FieldKind::ALL {
                    if has_adjacent(left_posting.positions(field), right_posting.positions(field)) {
                        merger.add(&left_posting.identity, phrase_bonus(field));
                    }
                }
            }
        }

        if terms.len() > 1 {
            let phrase = fold_phrase(&query.text);
            for identity in self.storage.multiple_keyword_index(&phrase)? {
                merger.add(&identity, KEYWORD_PHRASE_WEIGHT);
            }
        }

        if let Some(instance_id) = query.instance_id {
            merger.retain(|identity| identity.instance_id == Some(instance_id));
        }

        let items = self.collect_items(merger, &stems)?;
        debug!(query = %query.text, results = items.len(), "query finished");
        Ok(ResultSet::new(query.clone(), stems, pairs, self.template.clone(), items))
    }

    /// Documents declaring `word` in their title or keywords, title first.
    pub fn find_by_keyword(&self, word: &str) -> Result<ResultSet> {
        let query = Query::new(word);
        let terms = self.searchable_terms(word)?;
        let [term] = terms.as_slice() else {
            return Ok(ResultSet::empty(query, self.template.clone()));
        };

        let mut merger = ResultMerger::new();
        for (identity, field) in self.storage.single_keyword_index(&term.stem)? {
            merger.add(&identity, field_weight(field));
        }

        let stems = vec![term.stem.clone()];
        let items = self.collect_items(merger, &stems)?;
        Ok(ResultSet::new(query, stems, Vec::new(), self.template.clone(), items))
    }

    /// Table-of-contents entries whose title contains `fragment`.
    pub fn find_titles(&self, fragment: &str) -> Result<Vec<TocEntry>> {
        self.storage.find_toc_by_title(fragment)
    }

    fn searchable_terms(&self, text: &str) -> Result<Vec<Term>> {
        let mut kept = Vec::new();
        for term in self.normalizer.terms(text) {
            if term.stem.is_empty() || self.storage.is_excluded(&term.stem)? {
                trace!(term = %term.term, "skipping excluded term");
                continue;
            }
            kept.push(term);
        }
        Ok(kept)
    }

    fn collect_items(&self, merger: ResultMerger, stems: &[String]) -> Result<Vec<ResultItem>> {
        let mut items = Vec::with_capacity(merger.len());
        for (identity, key) in merger.into_ranked() {
            let Some(toc) = self.storage.toc_entry(&identity)? else {
                debug!(identity = %identity, "dropping result without a TOC entry");
                continue;
            };
            let title_terms = self.normalizer.terms(&toc.title);
            let highlighted = self
                .template
                .highlight(&toc.title, &title_terms, |term| stems.contains(&term.stem));
            items.push(ResultItem::new(toc, key, highlighted));
        }
        Ok(items)
    }
}

fn unique_stems(terms: &[Term]) -> Vec<String> {
    let mut stems: Vec<String> = Vec::with_capacity(terms.len());
    for term in terms {
        if !stems.contains(&term.stem) {
            stems.push(term.stem.clone());
        }
    }
    stems
}

/// Stem pairs whose words sat next to each other in the query. Removing an
/// excluded word breaks adjacency across it.
fn adjacent_pairs(terms: &[Term]) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for window in terms.windows(2) {
        if window[1].position != window[0].position + 1 {
            continue;
        }
        let pair = (window[0].stem.clone(), window[1].stem.clone());
        if !pairs.contains(&pair) {
            pairs.push(pair);
        }
    }
    pairs
}
