// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Tokenization with byte spans.
//!
//! Text is split on whitespace and punctuation, with two exceptions: a `.`
//! between digits stays inside the token (`3.1`, `7.0`) and an apostrophe
//! between letters stays inside the word (`let's`). Entities are decoded while
//! scanning, so `&plus;` and `+` produce identical tokens, and every token
//! remembers the byte range it covers in the *source* text.
//!
//! # Invariants
//!
//! - Tokens are ordered by span and never overlap.
//! - `position` counts tokens from zero, without gaps.
//! - `term` is never empty and never consists only of punctuation.

use super::markup::decode_entity;
use std::ops::Range;

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::UnicodeNormalization;

/// A case-folded token and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Case-folded text used for matching.
    pub term: String,
    /// Byte range in the source text, covering any encoded entities.
    pub span: Range<usize>,
    /// Ordinal of the token within the tokenized text.
    pub position: u32,
    /// Digits only (with embedded dots). Numeric tokens are never stemmed.
    pub numeric: bool,
}

impl Token {
    /// The original, unfolded text of the token.
    pub fn raw<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }
}

/// A decoded character and the source bytes it came from.
#[derive(Debug, Clone, Copy)]
struct SourceChar {
    ch: char,
    start: usize,
    end: usize,
}

/// Split `text` into case-folded tokens.
///
/// ```
/// use rose::text::tokenize;
///
/// let terms: Vec<String> = tokenize("Turbo Pascal 7.0, red-black &amp; ' ok")
///     .into_iter()
///     .map(|t| t.term)
///     .collect();
/// assert_eq!(terms, vec!["turbo", "pascal", "7.0", "red", "black", "ok"]);
/// ```
pub fn tokenize(text: &str) -> Vec<Token> {
    let chars = decode_chars(text);
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if !is_word_char(chars[i].ch) {
            i += 1;
            continue;
        }

        let start = i;
        while i < chars.len() {
            let ch = chars[i].ch;
            if is_word_char(ch) {
                i += 1;
                continue;
            }
            // Joiners only count when a word character follows and the pair
            // around them is of the right kind.
            let prev = chars[i - 1].ch;
            let next = chars.get(i + 1).map(|c| c.ch);
            let joins = match next {
                Some(next) if ch == '.' => is_digit(prev) && is_digit(next),
                Some(next) if is_apostrophe(ch) => prev.is_alphabetic() && next.is_alphabetic(),
                _ => false,
            };
            if !joins {
                break;
            }
            i += 1;
        }

        let word = &chars[start..i];
        let position = tokens.len() as u32;
        tokens.push(Token {
            term: fold(word),
            span: word[0].start..word[word.len() - 1].end,
            position,
            numeric: word.iter().all(|c| is_digit(c.ch) || c.ch == '.'),
        });
    }

    tokens
}

/// Fold a single word the same way tokens are folded.
pub fn fold_word(word: &str) -> String {
    let chars: Vec<SourceChar> = word
        .char_indices()
        .map(|(start, ch)| SourceChar {
            ch,
            start,
            end: start + ch.len_utf8(),
        })
        .collect();
    fold(&chars)
}

fn decode_chars(text: &str) -> Vec<SourceChar> {
    let mut chars = Vec::with_capacity(text.len());
    let mut offset = 0;

    while offset < text.len() {
        let rest = &text[offset..];
        if rest.starts_with('&') {
            if let Some((decoded, consumed)) = decode_entity(rest) {
                for ch in decoded.chars() {
                    chars.push(SourceChar {
                        ch,
                        start: offset,
                        end: offset + consumed,
                    });
                }
                offset += consumed;
                continue;
            }
        }
        let Some(ch) = rest.chars().next() else {
            break;
        };
        chars.push(SourceChar {
            ch,
            start: offset,
            end: offset + ch.len_utf8(),
        });
        offset += ch.len_utf8();
    }

    chars
}

fn fold(word: &[SourceChar]) -> String {
    let raw: String = word
        .iter()
        .map(|c| if is_apostrophe(c.ch) { '\'' } else { c.ch })
        .collect();
    compose(&raw).to_lowercase()
}

#[cfg(feature = "unicode-normalization")]
fn compose(word: &str) -> String {
    word.nfc().collect()
}

#[cfg(not(feature = "unicode-normalization"))]
fn compose(word: &str) -> String {
    word.to_string()
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || is_combining_mark(c)
}

#[inline]
fn is_digit(c: char) -> bool {
    c.is_numeric()
}

#[inline]
fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}' | '\u{02BC}')
}

#[cfg(feature = "unicode-normalization")]
#[inline]
fn is_combining_mark(c: char) -> bool {
    unicode_normalization::char::is_combining_mark(c)
}

/// Without the Unicode tables we fall back to the common combining blocks.
#[cfg(not(feature = "unicode-normalization"))]
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}
