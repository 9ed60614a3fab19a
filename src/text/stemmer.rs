// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Stemmers: per-language Snowball rules and a fallback chain.
//!
//! A language stemmer only touches words written entirely in its alphabet.
//! The chain asks each language in turn and the first one that owns the word
//! stems it; a word nobody owns (a Ukrainian `ціна` in an English + Russian
//! chain, a number, a mixed-script token) is returned unchanged, so it still
//! matches on its exact form.

use rust_stemmers::Algorithm;
use std::fmt;

/// Languages with a Snowball stemmer wired in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Russian,
}

impl Language {
    /// True when every character of `word` belongs to this language's
    /// alphabet (apostrophes and hyphens allowed inside).
    pub fn owns(self, word: &str) -> bool {
        let mut letters = 0usize;
        for c in word.chars() {
            let letter = match self {
                Language::English => c.is_ascii_lowercase(),
                Language::Russian => matches!(c, 'а'..='я' | 'ё'),
            };
            if letter {
                letters += 1;
            } else if !matches!(c, '\'' | '-') {
                return false;
            }
        }
        letters > 0
    }

    fn algorithm(self) -> Algorithm {
        match self {
            Language::English => Algorithm::English,
            Language::Russian => Algorithm::Russian,
        }
    }
}

/// Snowball stemmer bound to the alphabet of its language.
pub struct LanguageStemmer {
    language: Language,
    inner: rust_stemmers::Stemmer,
}

impl LanguageStemmer {
    pub fn new(language: Language) -> Self {
        LanguageStemmer {
            language,
            inner: rust_stemmers::Stemmer::create(language.algorithm()),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Stem `word` if it is written in this language, `None` otherwise.
    pub fn try_stem(&self, word: &str) -> Option<String> {
        if !self.language.owns(word) {
            return None;
        }
        Some(self.inner.stem(word).into_owned())
    }
}

impl fmt::Debug for LanguageStemmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageStemmer")
            .field("language", &self.language)
            .finish()
    }
}

/// The stemming strategy, fixed when the normalizer is built.
#[derive(Debug)]
pub enum Stemmer {
    /// No morphology: tokens match on their folded form.
    Identity,
    /// One language; words outside its alphabet pass through.
    Language(LanguageStemmer),
    /// Languages tried in order; the first owner of a word stems it.
    Chain(Vec<LanguageStemmer>),
}

impl Stemmer {
    pub fn english() -> Self {
        Stemmer::Language(LanguageStemmer::new(Language::English))
    }

    pub fn russian() -> Self {
        Stemmer::Language(LanguageStemmer::new(Language::Russian))
    }

    /// Chain of languages, tried in the given order.
    pub fn chain(languages: &[Language]) -> Self {
        Stemmer::Chain(languages.iter().copied().map(LanguageStemmer::new).collect())
    }

    /// Stem an already case-folded word.
    pub fn stem(&self, word: &str) -> String {
        let stemmed = match self {
            Stemmer::Identity => None,
            Stemmer::Language(stemmer) => stemmer.try_stem(word),
            Stemmer::Chain(stemmers) => stemmers.iter().find_map(|s| s.try_stem(word)),
        };
        match stemmed {
            Some(stem) if !stem.is_empty() => stem,
            _ => word.to_string(),
        }
    }
}

impl Default for Stemmer {
    /// Russian with English fallback, which is what mixed Cyrillic/Latin
    /// content needs.
    fn default() -> Self {
        Stemmer::chain(&[Language::Russian, Language::English])
    }
}
