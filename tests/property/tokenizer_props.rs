//! Tokenizer and highlighting properties.

use proptest::prelude::*;
use rose::text::{markup, tokenize};
use rose::{HighlightTemplate, Normalizer};

/// Text mixing scripts, punctuation, numbers and entities.
fn messy_text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "word", "Слово", "ціна", "café", "7.0", "1,7", "3.", "let's", "'", "-", "...", "&amp;",
            "&plus;", "&#x41;", "&bogus", "<b>", "</p>", " ", "\n", "\"", "é", "e\u{301}",
        ]),
        0..30,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: token spans are ordered, disjoint and on char boundaries,
    /// and positions count up from zero.
    #[test]
    fn prop_token_spans_well_formed(text in messy_text_strategy()) {
        let tokens = tokenize(&text);
        let mut last_end = 0;
        for (i, token) in tokens.iter().enumerate() {
            prop_assert_eq!(token.position as usize, i);
            prop_assert!(token.span.start >= last_end);
            prop_assert!(token.span.start < token.span.end);
            prop_assert!(text.is_char_boundary(token.span.start));
            prop_assert!(text.is_char_boundary(token.span.end));
            prop_assert!(!token.term.is_empty());
            last_end = token.span.end;
        }
    }

    /// Property: tokenizing is insensitive to how entities are written.
    #[test]
    fn prop_entities_decode_to_same_terms(text in messy_text_strategy()) {
        let decoded = markup::decode_entities(&text).into_owned();
        let a: Vec<String> = tokenize(&text).into_iter().map(|t| t.term).collect();
        let b: Vec<String> = tokenize(&decoded).into_iter().map(|t| t.term).collect();
        prop_assert_eq!(a, b);
    }

    /// Property: stripping tags never panics and never leaves a tag behind.
    #[test]
    fn prop_strip_tags_removes_known_tags(text in messy_text_strategy()) {
        let stripped = markup::strip_tags(&text);
        prop_assert!(!stripped.contains("<b>"));
        prop_assert!(!stripped.contains("</p>"));
    }

    /// Property: highlighting with an identity template returns the source.
    #[test]
    fn prop_identity_highlight_is_lossless(text in messy_text_strategy()) {
        let normalizer = Normalizer::default();
        let terms = normalizer.terms(&text);
        let template = HighlightTemplate::parse("%s").unwrap();
        prop_assert_eq!(template.highlight(&text, &terms, |_| true), text);
    }
}
