// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for tokenizing, markup stripping and highlighting.
//!
//! Arbitrary text, half-open tags, broken entities and combining marks must
//! never panic, and every token span must slice the source cleanly.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rose::text::markup;
use rose::{HighlightTemplate, Normalizer};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    // INVARIANT 1: spans are ordered, disjoint and on char boundaries
    let normalizer = Normalizer::default();
    let terms = normalizer.terms(&text);
    let mut last_end = 0;
    for (i, term) in terms.iter().enumerate() {
        assert_eq!(term.position as usize, i, "positions must be contiguous");
        assert!(term.span.start >= last_end, "spans overlap at {}", i);
        assert!(term.span.start < term.span.end, "empty span at {}", i);
        assert!(text.is_char_boundary(term.span.start));
        assert!(text.is_char_boundary(term.span.end));
        assert!(!term.term.is_empty());
        last_end = term.span.end;
    }

    // INVARIANT 2: an identity template reproduces the source
    let Ok(identity) = HighlightTemplate::parse("%s") else {
        return;
    };
    assert_eq!(identity.highlight(&text, &terms, |_| true), text);

    // INVARIANT 3: stripped markup still tokenizes
    let stripped = markup::strip_tags(&text);
    let _ = normalizer.terms(&stripped);
});
