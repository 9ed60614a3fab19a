// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime contracts for the index and ranking invariants.
//!
//! These contracts:
//!
//! 1. Are **zero-cost in release builds** (use `debug_assert!`)
//! 2. Provide **early failure detection** during development
//! 3. Mirror the invariants documented on the types they check
//!
//! | Contract Function               | Invariant                                      |
//! |---------------------------------|------------------------------------------------|
//! | `check_field_hits_well_formed`  | one entry per field, ascending positions       |
//! | `check_ranked_descending`       | result sets sorted by relevance                |
//! | `check_window_within_bounds`    | snippet windows inside the token stream        |

// ============================================================================
// COMPILE-TIME ASSERTIONS (evaluated at build time)
// ============================================================================

/// Field dominance: a title beats a keyword beats any amount of body text.
const _: () = {
    use crate::scoring::{CONTENT_WEIGHT, KEYWORD_WEIGHT, MAX_REPETITION_FACTOR, TITLE_WEIGHT};

    assert!(TITLE_WEIGHT > KEYWORD_WEIGHT);
    assert!(KEYWORD_WEIGHT > CONTENT_WEIGHT * MAX_REPETITION_FACTOR); // 10 > 2
};

use crate::types::FieldHits;

// ============================================================================
// POSTING CONTRACTS
// ============================================================================

/// Check that a document's hits for one token are well-formed.
///
/// # Panics (debug builds only)
/// Panics if a field appears twice, positions are not strictly ascending,
/// or a weight is not positive.
#[inline]
pub fn check_field_hits_well_formed(fields: &[FieldHits]) {
    for (i, hits) in fields.iter().enumerate() {
        debug_assert!(
            fields[..i].iter().all(|other| other.field != hits.field),
            "Contract violation: field {:?} recorded twice",
            hits.field
        );
        debug_assert!(
            hits.weight > 0.0,
            "Contract violation: field {:?} has non-positive weight {}",
            hits.field,
            hits.weight
        );
        debug_assert!(
            hits.positions.windows(2).all(|w| w[0] < w[1]),
            "Contract violation: positions for {:?} not strictly ascending: {:?}",
            hits.field,
            hits.positions
        );
    }
}

// ============================================================================
// RANKING CONTRACTS
// ============================================================================

/// Check that relevances never increase along a ranked list.
#[inline]
pub fn check_ranked_descending(relevances: &[f64]) {
    for (i, pair) in relevances.windows(2).enumerate() {
        debug_assert!(
            !(pair[0] < pair[1]),
            "Contract violation: ranking not descending at {}: {} < {}",
            i,
            pair[0],
            pair[1]
        );
    }
}

// ============================================================================
// SNIPPET CONTRACTS
// ============================================================================

/// Check that a token window `[start, end]` lies inside `len` tokens and is at
/// most `max_words` long.
#[inline]
pub fn check_window_within_bounds(start: usize, end: usize, len: usize, max_words: usize) {
    debug_assert!(
        start <= end && end < len,
        "Contract violation: window [{}, {}] outside {} tokens",
        start,
        end,
        len
    );
    debug_assert!(
        end - start < max_words.max(1),
        "Contract violation: window [{}, {}] longer than {} words",
        start,
        end,
        max_words
    );
}
