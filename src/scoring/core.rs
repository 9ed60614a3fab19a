// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The math behind search ranking.
//!
//! Every token a document contributes is recorded once per field with a
//! weight. Title beats keyword beats content. Repeating a word in the content
//! helps, but with diminishing returns: the repetition factor approaches 2 and
//! never reaches it, so no amount of keyword stuffing in the body outranks a
//! single keyword declaration.
//!
//! # Key Invariant: Field Dominance
//!
//! ```text
//! TITLE_WEIGHT > KEYWORD_WEIGHT > CONTENT_WEIGHT * MAX_REPETITION_FACTOR
//!     20       >       10       >        1 * 2
//! ```
//!
//! Checked at compile time in `contracts.rs`.
//!
//! # Phrase bonus
//!
//! When two query tokens are neighbours in the query and their positions are
//! neighbours in the same field of a document, the document earns
//! `PHRASE_BONUS_RATIO * field_weight` on top of the two token scores. An exact
//! phrase therefore always beats the same words scattered around.
//!
//! # Constants
//!
//! | Constant                 | Value | Meaning                                   |
//! |--------------------------|-------|-------------------------------------------|
//! | `TITLE_WEIGHT`           | 20.0  | Token present in the title                |
//! | `KEYWORD_WEIGHT`         | 10.0  | Token present in a declared keyword phrase|
//! | `CONTENT_WEIGHT`         | 1.0   | Token present once in the body            |
//! | `REPETITION_DECAY`       | 0.5   | Each extra body occurrence adds half the previous one |
//! | `PHRASE_BONUS_RATIO`     | 1.0   | Bonus per adjacent pair, times field weight |
//! | `KEYWORD_PHRASE_WEIGHT`  | 10.0  | Whole query equals a declared keyword phrase |

use crate::types::FieldKind;

// =============================================================================
// SCORING CONSTANTS
// =============================================================================

/// Weight of a token found in the title.
pub const TITLE_WEIGHT: f64 = 20.0;

/// Weight of a token found in a declared keyword phrase.
pub const KEYWORD_WEIGHT: f64 = 10.0;

/// Weight of a single occurrence of a token in the body.
pub const CONTENT_WEIGHT: f64 = 1.0;

/// Each additional body occurrence is worth this fraction of the previous one.
pub const REPETITION_DECAY: f64 = 0.5;

/// Upper bound of `repetition_factor` for any number of occurrences.
pub const MAX_REPETITION_FACTOR: f64 = 1.0 / (1.0 - REPETITION_DECAY);

/// Phrase bonus per adjacent query pair found adjacent in a field.
pub const PHRASE_BONUS_RATIO: f64 = 1.0;

/// Bonus when the whole query equals a declared multi-word keyword phrase.
pub const KEYWORD_PHRASE_WEIGHT: f64 = 10.0;

/// Base weight of a field.
pub fn field_weight(field: FieldKind) -> f64 {
    match field {
        FieldKind::Title => TITLE_WEIGHT,
        FieldKind::Keyword => KEYWORD_WEIGHT,
        FieldKind::Content => CONTENT_WEIGHT,
    }
}

/// `1 + d + d² + ...` for `occurrences` terms: 1, 1.5, 1.75, ...
pub fn repetition_factor(occurrences: usize) -> f64 {
    if occurrences == 0 {
        return 0.0;
    }
    (1.0 - REPETITION_DECAY.powi(occurrences as i32)) / (1.0 - REPETITION_DECAY)
}

/// Score a field contributes for a token occurring `occurrences` times in it.
///
/// Title and keyword fields count once no matter how often the token repeats;
/// only the body rewards repetition.
pub fn field_score(field: FieldKind, occurrences: usize) -> f64 {
    if occurrences == 0 {
        return 0.0;
    }
    match field {
        FieldKind::Content => CONTENT_WEIGHT * repetition_factor(occurrences),
        FieldKind::Title | FieldKind::Keyword => field_weight(field),
    }
}

/// Bonus for an adjacent query pair found adjacent in `field`.
pub fn phrase_bonus(field: FieldKind) -> f64 {
    PHRASE_BONUS_RATIO * field_weight(field)
}

/// Is there a `p` in `left` with `p + 1` in `right`? Both slices ascending.
pub fn has_adjacent(left: &[u32], right: &[u32]) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        let want = left[i] + 1;
        match right[j].cmp(&want) {
            std::cmp::Ordering::Less => j += 1,
            std::cmp::Ordering::Greater => i += 1,
            std::cmp::Ordering::Equal => return true,
        }
    }
    false
}
