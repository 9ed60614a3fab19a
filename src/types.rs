// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a search index.
//!
//! These types define how documents, postings and table-of-contents entries fit
//! together. Everything the storage collaborator persists is defined here, so
//! every struct is `Serialize + Deserialize`.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **DocumentIdentity**: equality is pairwise on `(id, instance_id)`. Two
//!   documents sharing `id` under different instances are different documents.
//!
//! - **Posting**: at most one `FieldHits` per field, positions strictly
//!   increasing within a field. The indexer records a field once with its
//!   weight, never once per occurrence.
//!
//! - **DocumentContribution**: everything one identity adds to the index. Storage
//!   swaps a whole contribution in or out, never half of one.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// IDENTITY
// =============================================================================

/// Composite key naming one indexed document version.
///
/// `id` is whatever the application uses; `instance_id` partitions logically
/// distinct copies of the same `id` (site sections, locales).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentIdentity {
    pub id: String,
    #[serde(default)]
    pub instance_id: Option<u32>,
}

impl DocumentIdentity {
    pub fn new(id: impl Into<String>, instance_id: impl Into<Option<u32>>) -> Self {
        DocumentIdentity {
            id: id.into(),
            instance_id: instance_id.into(),
        }
    }
}

/// Renders as `instance:id`, with an empty instance when none is set.
impl fmt::Display for DocumentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.instance_id {
            Some(instance) => write!(f, "{}:{}", instance, self.id),
            None => write!(f, ":{}", self.id),
        }
    }
}

// =============================================================================
// INPUT DOCUMENTS
// =============================================================================

/// A document handed to the indexer.
///
/// `content` may carry markup; `title` is plain text. `description` is kept
/// for display only and never reaches the full-text index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indexable {
    pub identity: DocumentIdentity,
    pub title: String,
    pub content: String,
    /// Comma or semicolon separated literal phrases.
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Indexable {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        instance_id: impl Into<Option<u32>>,
    ) -> Self {
        Indexable {
            identity: DocumentIdentity::new(id, instance_id),
            title: title.into(),
            content: content.into(),
            keywords: None,
            description: None,
            date: None,
            url: None,
        }
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Declared keyword phrases: split on `,`/`;`, trimmed, empties dropped.
    ///
    /// ```
    /// use rose::Indexable;
    ///
    /// let doc = Indexable::new("a", "t", "c", None).with_keywords("one, two words; ,");
    /// assert_eq!(doc.keyword_phrases(), vec!["one", "two words"]);
    /// ```
    pub fn keyword_phrases(&self) -> Vec<&str> {
        self.keywords
            .as_deref()
            .unwrap_or("")
            .split([',', ';'])
            .map(str::trim)
            .filter(|phrase| !phrase.is_empty())
            .collect()
    }

    /// Snapshot of the display metadata persisted alongside the postings.
    pub fn toc_entry(&self) -> TocEntry {
        TocEntry {
            identity: self.identity.clone(),
            title: self.title.clone(),
            url: self.url.clone().unwrap_or_default(),
            date: self.date,
            description: self.description.clone().unwrap_or_default(),
        }
    }
}

/// Persisted per-identity metadata. The body text is not kept; snippets fetch
/// it from a content provider when needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry {
    pub identity: DocumentIdentity,
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
    #[serde(default)]
    pub description: String,
}

// =============================================================================
// POSTINGS
// =============================================================================

/// Which part of a document a token came from.
///
/// Title beats keyword beats content; see `scoring::field_weight` for the
/// numbers. The derived `Ord` is declaration order and only used for
/// deterministic serialization, not for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Title,
    Keyword,
    Content,
}

impl FieldKind {
    pub const ALL: [FieldKind; 3] = [FieldKind::Title, FieldKind::Keyword, FieldKind::Content];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Title => "title",
            FieldKind::Keyword => "keyword",
            FieldKind::Content => "content",
        }
    }
}

/// One field's contribution of a token to a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldHits {
    pub field: FieldKind,
    /// Weighted score this field adds to the document for the token.
    pub weight: f64,
    /// Token positions within the field, ascending.
    pub positions: Vec<u32>,
}

/// Everything a stemmed token contributes to a single document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub identity: DocumentIdentity,
    pub fields: Vec<FieldHits>,
}

impl Posting {
    /// Accumulated weighted score across fields.
    pub fn score(&self) -> f64 {
        self.fields.iter().map(|hits| hits.weight).sum()
    }

    /// Positions of the token in `field`, empty when the field has none.
    pub fn positions(&self, field: FieldKind) -> &[u32] {
        self.fields
            .iter()
            .find(|hits| hits.field == field)
            .map(|hits| hits.positions.as_slice())
            .unwrap_or(&[])
    }
}

/// Postings for one stemmed token, in insertion order.
pub type PostingList = Vec<Posting>;

/// Everything one identity adds to the index, ready to be written atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentContribution {
    pub identity: DocumentIdentity,
    /// Stemmed token → hits per field.
    pub terms: BTreeMap<String, Vec<FieldHits>>,
    /// Folded literal keyword phrases.
    pub keyword_phrases: Vec<String>,
    pub toc: TocEntry,
}

// =============================================================================
// QUERIES
// =============================================================================

/// A search phrase plus optional instance filter and paging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub text: String,
    #[serde(default)]
    pub instance_id: Option<u32>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Query {
            text: text.into(),
            ..Query::default()
        }
    }

    pub fn with_instance_id(mut self, instance_id: u32) -> Self {
        self.instance_id = Some(instance_id);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_equality_is_pairwise() {
        let a = DocumentIdentity::new("id_1", 10);
        let b = DocumentIdentity::new("id_1", 20);
        assert_ne!(a, b);
        assert_eq!(a, DocumentIdentity::new("id_1", Some(10)));
    }

    #[test]
    fn identity_display() {
        assert_eq!(DocumentIdentity::new("id_2", 20).to_string(), "20:id_2");
        assert_eq!(DocumentIdentity::new("x", None).to_string(), ":x");
    }

    #[test]
    fn keyword_phrases_split_on_both_separators() {
        let doc = Indexable::new("id", "t", "c", None).with_keywords("content, ");
        assert_eq!(doc.keyword_phrases(), vec!["content"]);

        let doc = Indexable::new("id", "t", "c", None)
            .with_keywords(" singlekeyword ;multiple keywords,,");
        assert_eq!(doc.keyword_phrases(), vec!["singlekeyword", "multiple keywords"]);
    }

    #[test]
    fn toc_entry_defaults_missing_display_fields() {
        let toc = Indexable::new("id", "Title", "body", 3).toc_entry();
        assert_eq!(toc.title, "Title");
        assert_eq!(toc.url, "");
        assert_eq!(toc.description, "");
        assert_eq!(toc.identity.instance_id, Some(3));
    }

    #[test]
    fn posting_score_sums_fields() {
        let posting = Posting {
            identity: DocumentIdentity::new("a", None),
            fields: vec![
                FieldHits { field: FieldKind::Title, weight: 20.0, positions: vec![0] },
                FieldHits { field: FieldKind::Content, weight: 1.5, positions: vec![3, 9] },
            ],
        };
        assert_eq!(posting.score(), 21.5);
        assert_eq!(posting.positions(FieldKind::Content), &[3, 9]);
        assert!(posting.positions(FieldKind::Keyword).is_empty());
    }

    #[test]
    fn query_deserializes_with_defaults() {
        let query: Query = serde_json::from_str(r#"{"text": "rust"}"#).unwrap();
        assert_eq!(query, Query::new("rust"));
    }
}
