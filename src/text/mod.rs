// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text normalization: markup, tokens and stems.
//!
//! The `Normalizer` is the one object the indexer, finder and snippet builder
//! must agree on. Build it once and share it; it is immutable and `Sync`.

pub mod markup;
mod stemmer;
mod tokenizer;

pub use stemmer::{Language, LanguageStemmer, Stemmer};
pub use tokenizer::{fold_word, tokenize, Token};

use std::ops::Range;

/// A token together with its stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub stem: String,
    pub term: String,
    pub span: Range<usize>,
    pub position: u32,
    pub numeric: bool,
}

/// Tokenizer plus stemmer.
#[derive(Debug, Default)]
pub struct Normalizer {
    stemmer: Stemmer,
}

impl Normalizer {
    pub fn new(stemmer: Stemmer) -> Self {
        Normalizer { stemmer }
    }

    pub fn stemmer(&self) -> &Stemmer {
        &self.stemmer
    }

    /// Case-folded tokens with their positions and source spans.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        tokenize(text)
    }

    /// Stem one folded token. Numbers come back untouched, which is what makes
    /// numeric matching an exact string comparison.
    pub fn stem(&self, token: &str) -> String {
        if token.chars().any(char::is_numeric) {
            return token.to_string();
        }
        self.stemmer.stem(token)
    }

    /// Tokenize and stem `text`.
    pub fn terms(&self, text: &str) -> Vec<Term> {
        tokenize(text)
            .into_iter()
            .map(|token| Term {
                stem: if token.numeric {
                    token.term.clone()
                } else {
                    self.stem(&token.term)
                },
                term: token.term,
                span: token.span,
                position: token.position,
                numeric: token.numeric,
            })
            .collect()
    }

    /// Just the stems of `text`, in order.
    pub fn stems(&self, text: &str) -> Vec<String> {
        self.terms(text).into_iter().map(|term| term.stem).collect()
    }
}
