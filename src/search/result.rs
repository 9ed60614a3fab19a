// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Ranked search results.
//!
//! A `ResultSet` owns every matching item in ranked order plus what the
//! snippet builder needs to highlight them (query stems, adjacent stem pairs,
//! the highlight template). Paging only affects `items()`; the relevance map
//! always covers the whole set.

use crate::contracts::check_ranked_descending;
use crate::scoring::ranking::{compare_ranked, RankKey};
use crate::search::HighlightTemplate;
use crate::text::Term;
use crate::types::{DocumentIdentity, Query, TocEntry};
use chrono::NaiveDateTime;

/// One ranked document.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultItem {
    toc: TocEntry,
    key: RankKey,
    highlighted_title: String,
    snippet: Option<String>,
}

impl ResultItem {
    pub(crate) fn new(toc: TocEntry, key: RankKey, highlighted_title: String) -> Self {
        ResultItem {
            toc,
            key,
            highlighted_title,
            snippet: None,
        }
    }

    pub fn identity(&self) -> &DocumentIdentity {
        &self.toc.identity
    }

    pub fn id(&self) -> &str {
        &self.toc.identity.id
    }

    pub fn instance_id(&self) -> Option<u32> {
        self.toc.identity.instance_id
    }

    pub fn relevance(&self) -> f64 {
        self.key.relevance
    }

    pub fn title(&self) -> &str {
        &self.toc.title
    }

    /// Title with every word matching a query stem wrapped in the template
    /// that was active when the search ran.
    pub fn highlighted_title(&self) -> &str {
        &self.highlighted_title
    }

    pub fn url(&self) -> &str {
        &self.toc.url
    }

    pub fn date(&self) -> Option<NaiveDateTime> {
        self.toc.date
    }

    pub fn description(&self) -> &str {
        &self.toc.description
    }

    /// The highlighted snippet, or the description until one is attached.
    pub fn snippet(&self) -> &str {
        self.snippet.as_deref().unwrap_or(&self.toc.description)
    }

    pub fn has_snippet(&self) -> bool {
        self.snippet.is_some()
    }

    pub fn set_snippet(&mut self, snippet: impl Into<String>) {
        self.snippet = Some(snippet.into());
    }

    pub fn toc(&self) -> &TocEntry {
        &self.toc
    }
}

/// Everything a search produced, ranked.
#[derive(Debug, Clone)]
pub struct ResultSet {
    query: Query,
    stems: Vec<String>,
    phrase_pairs: Vec<(String, String)>,
    template: HighlightTemplate,
    items: Vec<ResultItem>,
}

impl ResultSet {
    pub(crate) fn new(
        query: Query,
        stems: Vec<String>,
        phrase_pairs: Vec<(String, String)>,
        template: HighlightTemplate,
        mut items: Vec<ResultItem>,
    ) -> Self {
        items.sort_by(|a, b| compare_ranked(&a.key, &b.key));
        let set = ResultSet {
            query,
            stems,
            phrase_pairs,
            template,
            items,
        };
        set.check_order();
        set
    }

    pub(crate) fn empty(query: Query, template: HighlightTemplate) -> Self {
        ResultSet::new(query, Vec::new(), Vec::new(), template, Vec::new())
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Searchable query stems, deduplicated, in query order.
    pub fn stems(&self) -> &[String] {
        &self.stems
    }

    /// Stems that were next to each other in the query.
    pub fn phrase_pairs(&self) -> &[(String, String)] {
        &self.phrase_pairs
    }

    pub fn template(&self) -> &HighlightTemplate {
        &self.template
    }

    /// Whether a tokenized word should be highlighted for this query.
    /// Numbers are never stemmed, so they only match exactly.
    pub fn matches(&self, term: &Term) -> bool {
        self.stems.iter().any(|stem| stem == &term.stem)
    }

    /// Total number of results, ignoring paging.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The requested page of the ranking.
    pub fn items(&self) -> &[ResultItem] {
        let range = self.page();
        &self.items[range]
    }

    pub fn items_mut(&mut self) -> &mut [ResultItem] {
        let range = self.page();
        &mut self.items[range]
    }

    /// Every result, ignoring paging.
    pub fn all_items(&self) -> &[ResultItem] {
        &self.items
    }

    /// Identity → relevance for the whole set, highest first.
    pub fn sorted_relevance_by_identity(&self) -> Vec<(DocumentIdentity, f64)> {
        self.items
            .iter()
            .map(|item| (item.identity().clone(), item.relevance()))
            .collect()
    }

    /// Overwrite the relevance of one item and re-rank. Returns `false` when
    /// `identity` is not in the set.
    pub fn set_relevance_ratio(&mut self, identity: &DocumentIdentity, relevance: f64) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.identity() == identity) else {
            return false;
        };
        item.key.relevance = relevance;
        self.items.sort_by(|a, b| compare_ranked(&a.key, &b.key));
        self.check_order();
        true
    }

    fn page(&self) -> std::ops::Range<usize> {
        let start = self.query.offset.min(self.items.len());
        let end = match self.query.limit {
            Some(limit) => start.saturating_add(limit).min(self.items.len()),
            None => self.items.len(),
        };
        start..end
    }

    fn check_order(&self) {
        if cfg!(debug_assertions) {
            let relevances: Vec<f64> = self.items.iter().map(ResultItem::relevance).collect();
            check_ranked_descending(&relevances);
        }
    }
}
