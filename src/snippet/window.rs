// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Snippet window selection and rendering.
//!
//! # Algorithm
//!
//! 1. Split the display text into sentences. A run of `.`, `!`, `?` or `…`
//!    (plus closing quotes) ends a sentence when whitespace or the end of text
//!    follows it; a line break always does. `3.1` and `1,7` never split.
//! 2. Every matched token starts a candidate window of `max_words` tokens.
//!    A window scores one point per match and one per query phrase pair it
//!    holds side by side. The best score wins, earliest window on ties.
//! 3. The winning window is widened back to the start of its first match's
//!    sentence and forward to the end of its last match's sentence, as far as
//!    `max_words` allows. An ellipsis marks each side that stops mid-sentence.
//! 4. Matched tokens are wrapped in the highlight template and whitespace
//!    between tokens collapses to single spaces.

use crate::contracts::check_window_within_bounds;
use crate::search::HighlightTemplate;
use crate::text::Term;
use std::ops::Range;

const TERMINATORS: [char; 4] = ['.', '!', '?', '…'];
const CLOSERS: [char; 8] = ['"', '\'', '»', '”', '’', ')', ']', '}'];

/// Byte ranges of the sentences in `text`, trimmed, empties dropped.
pub fn sentences(text: &str) -> Vec<Range<usize>> {
    let mut raw = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c == '\n' {
            raw.push(start..i);
            start = i + c.len_utf8();
            continue;
        }
        if !TERMINATORS.contains(&c) {
            continue;
        }
        let mut end = i + c.len_utf8();
        while let Some(&(j, next)) = chars.peek() {
            if TERMINATORS.contains(&next) || CLOSERS.contains(&next) {
                end = j + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        let at_boundary = chars.peek().map_or(true, |&(_, next)| next.is_whitespace());
        if at_boundary {
            raw.push(start..end);
            start = end;
        }
    }
    raw.push(start..text.len());

    raw.into_iter()
        .filter_map(|range| trim_range(text, range))
        .collect()
}

fn trim_range(text: &str, range: Range<usize>) -> Option<Range<usize>> {
    let slice = &text[range.clone()];
    let leading = slice.len() - slice.trim_start().len();
    let trailing = slice.len() - slice.trim_end().len();
    let start = range.start + leading;
    let end = range.end - trailing;
    (start < end).then_some(start..end)
}

/// Token window chosen for a snippet, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub first: usize,
    pub last: usize,
    pub score: usize,
}

/// Best window of at most `max_words` tokens, or `None` without matches.
///
/// `matched[i]` says whether token `i` matches the query; `pair_at(i)` whether
/// tokens `i` and `i + 1` form a query phrase pair.
pub fn best_window(
    len: usize,
    max_words: usize,
    matched: &[bool],
    pair_at: impl Fn(usize) -> bool,
) -> Option<Window> {
    let max_words = max_words.max(1);
    let mut best: Option<Window> = None;

    for start in (0..len).filter(|&i| matched[i]) {
        let end = (start + max_words).min(len);
        let hits: Vec<usize> = (start..end).filter(|&i| matched[i]).collect();
        let pairs = hits
            .windows(2)
            .filter(|w| w[1] == w[0] + 1 && pair_at(w[0]))
            .count();
        let score = hits.len() + pairs;
        let last = hits.last().copied().unwrap_or(start);

        if best.map_or(true, |b| score > b.score) {
            best = Some(Window {
                first: start,
                last,
                score,
            });
        }
    }
    best
}

/// Render the snippet for `window` over `terms` tokenized from `text`.
pub fn render(
    text: &str,
    terms: &[Term],
    window: Window,
    max_words: usize,
    matched: &[bool],
    template: &HighlightTemplate,
    ellipsis: &str,
) -> String {
    let max_words = max_words.max(1);
    let sentences = sentences(text);
    // Tokens never sit between sentences, so ids are non-decreasing.
    let sentence_ids: Vec<usize> = terms
        .iter()
        .map(|term| sentences.partition_point(|s| s.end <= term.span.start))
        .collect();
    let first_token_of = |sentence: usize| sentence_ids.partition_point(|&id| id < sentence);
    let last_token_of =
        |sentence: usize| sentence_ids.partition_point(|&id| id <= sentence).saturating_sub(1);

    let start = first_token_of(sentence_ids[window.first])
        .max((window.last + 1).saturating_sub(max_words))
        .min(window.first);
    let end = last_token_of(sentence_ids[window.last])
        .min(start + max_words - 1)
        .max(window.last);
    check_window_within_bounds(start, end, terms.len(), max_words);

    let opens_sentence = start == first_token_of(sentence_ids[start]);
    let closes_sentence = end == last_token_of(sentence_ids[end]);

    let byte_start = match sentences.get(sentence_ids[start]) {
        Some(sentence) if opens_sentence => sentence.start.min(terms[start].span.start),
        _ => terms[start].span.start,
    };
    let byte_end = match sentences.get(sentence_ids[end]) {
        Some(sentence) if closes_sentence => sentence.end.max(terms[end].span.end),
        _ => terms[end].span.end,
    };

    let mut out = String::new();
    if !opens_sentence {
        out.push_str(ellipsis);
    }
    let mut cursor = byte_start;
    for (i, term) in terms.iter().enumerate().take(end + 1).skip(start) {
        push_collapsed(&mut out, &text[cursor..term.span.start]);
        let raw = &text[term.span.clone()];
        if matched[i] {
            template.wrap_into(&mut out, raw);
        } else {
            out.push_str(raw);
        }
        cursor = term.span.end;
    }
    push_collapsed(&mut out, &text[cursor..byte_end]);
    if !closes_sentence {
        out.push_str(ellipsis);
    }
    out
}

fn push_collapsed(out: &mut String, gap: &str) {
    let mut in_space = false;
    for c in gap.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
}
