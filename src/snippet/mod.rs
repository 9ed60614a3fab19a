// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Highlighted snippets for search results.
//!
//! The index does not keep document bodies, so snippets are built after the
//! search: the builder asks a `ContentProvider` for the bodies of the current
//! page in one call, strips their markup, re-tokenizes them with the same
//! `Normalizer` the index used and cuts out the densest window of matches.
//!
//! A body the provider does not return, or one without any match, leaves the
//! item without a snippet. That is not an error; `ResultItem::snippet` then
//! falls back to the description.

pub mod window;

use crate::error::Result;
use crate::search::{ResultItem, ResultSet};
use crate::storage::{ContentProvider, ExternalContent};
use crate::text::{markup, Normalizer};
use crate::types::DocumentIdentity;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tunables for snippet extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnippetOptions {
    /// Upper bound on the words in one snippet.
    pub max_words: usize,
    /// Marker for a snippet edge that cuts a sentence.
    pub ellipsis: String,
}

impl Default for SnippetOptions {
    fn default() -> Self {
        SnippetOptions {
            max_words: 40,
            ellipsis: "...".to_string(),
        }
    }
}

/// Builds and attaches snippets.
#[derive(Debug, Default)]
pub struct SnippetBuilder {
    normalizer: Normalizer,
    options: SnippetOptions,
}

impl SnippetBuilder {
    pub fn new(normalizer: Normalizer) -> Self {
        SnippetBuilder {
            normalizer,
            options: SnippetOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SnippetOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &SnippetOptions {
        &self.options
    }

    /// Fetch the bodies of the current page of `results` and attach a snippet
    /// to every item that has a match. Returns how many snippets were attached.
    ///
    /// Only a failing provider is an error; missing bodies are skipped.
    pub fn attach_snippets<P>(&self, results: &mut ResultSet, provider: &P) -> Result<usize>
    where
        P: ContentProvider + ?Sized,
    {
        let identities: Vec<DocumentIdentity> =
            results.items().iter().map(|item| item.identity().clone()).collect();
        if identities.is_empty() {
            return Ok(0);
        }

        let content = provider.fetch(&identities)?;
        let snippets = self.render_all(results, &content);

        let mut attached = 0;
        for (item, snippet) in results.items_mut().iter_mut().zip(snippets) {
            if let Some(snippet) = snippet {
                item.set_snippet(snippet);
                attached += 1;
            }
        }
        debug!(requested = identities.len(), attached, "attached snippets");
        Ok(attached)
    }

    /// Snippet of one raw body for the query behind `results`.
    pub fn snippet(&self, body: &str, results: &ResultSet) -> Option<String> {
        let text = markup::strip_tags(body);
        let terms = self.normalizer.terms(&text);
        let matched: Vec<bool> = terms.iter().map(|term| results.matches(term)).collect();
        let pairs = results.phrase_pairs();
        let pair_at = |i: usize| {
            terms.get(i + 1).is_some_and(|next| {
                next.position == terms[i].position + 1
                    && pairs
                        .iter()
                        .any(|(left, right)| left == &terms[i].stem && right == &next.stem)
            })
        };

        let max_words = self.options.max_words;
        let window = window::best_window(terms.len(), max_words, &matched, pair_at)?;
        Some(window::render(
            &text,
            &terms,
            window,
            max_words,
            &matched,
            results.template(),
            &self.options.ellipsis,
        ))
    }

    fn render_all(&self, results: &ResultSet, content: &ExternalContent) -> Vec<Option<String>> {
        let render = |item: &ResultItem| {
            let Some(body) = content.get(item.identity()) else {
                debug!(identity = %item.identity(), "no content for snippet");
                return None;
            };
            let snippet = self.snippet(body, results);
            if snippet.is_none() {
                debug!(identity = %item.identity(), "no snippet window");
            }
            snippet
        };

        #[cfg(feature = "parallel")]
        {
            results.items().par_iter().map(render).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            results.items().iter().map(render).collect()
        }
    }
}
