// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result ranking: how search results get sorted.
//!
//! Relevance descending, then the order in which a document first showed up
//! while merging postings. Postings are kept in insertion order by storage, so
//! the tiebreaker is deterministic for a given index and query.

use std::cmp::Ordering;

/// A relevance score and the order it was first seen in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankKey {
    pub relevance: f64,
    pub arrival: usize,
}

/// Compare two results for ranking.
///
/// Sort order:
/// 1. **Relevance** - descending
/// 2. **Arrival** - ascending, for determinism when scores tie
///
/// NaN relevances sort after every real number.
pub fn compare_ranked(a: &RankKey, b: &RankKey) -> Ordering {
    match b.relevance.partial_cmp(&a.relevance) {
        Some(Ordering::Equal) => a.arrival.cmp(&b.arrival),
        Some(ord) => ord,
        None => match (a.relevance.is_nan(), b.relevance.is_nan()) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            _ => a.arrival.cmp(&b.arrival),
        },
    }
}
