// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-document score accumulation.
//!
//! A document should appear at most once in search results, however many
//! query words, fields and bonuses it collects. `ResultMerger` keys on the
//! full `DocumentIdentity`, so two instances sharing an `id` stay apart and a
//! single identity can never be listed twice.
//!
//! **Invariant**: each identity appears at most once, and its arrival index is
//! the order in which it was first seen.

use crate::scoring::ranking::RankKey;
use crate::types::DocumentIdentity;
use std::collections::HashMap;
use tracing::trace;

/// Accumulates scores per identity, remembering first-seen order.
#[derive(Debug, Default)]
pub struct ResultMerger {
    slots: HashMap<DocumentIdentity, usize>,
    entries: Vec<(DocumentIdentity, f64)>,
}

impl ResultMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `score` to `identity`, creating its entry on first sight.
    pub fn add(&mut self, identity: &DocumentIdentity, score: f64) {
        match self.slots.get(identity) {
            Some(&slot) => self.entries[slot].1 += score,
            None => {
                self.slots.insert(identity.clone(), self.entries.len());
                self.entries.push((identity.clone(), score));
            }
        }
        trace!(identity = %identity, score, "merged score");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop identities `keep` rejects. Arrival order of the rest is preserved.
    pub fn retain(&mut self, mut keep: impl FnMut(&DocumentIdentity) -> bool) {
        self.entries.retain(|(identity, _)| keep(identity));
        self.slots = self
            .entries
            .iter()
            .enumerate()
            .map(|(slot, (identity, _))| (identity.clone(), slot))
            .collect();
    }

    /// Entries in arrival order, each with its rank key.
    pub fn into_ranked(self) -> impl Iterator<Item = (DocumentIdentity, RankKey)> {
        self.entries
            .into_iter()
            .enumerate()
            .map(|(arrival, (identity, relevance))| (identity, RankKey { relevance, arrival }))
    }
}
