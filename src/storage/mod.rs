// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Storage and content contracts.
//!
//! The engine owns no index state. Postings, keyword phrases and the table of
//! contents live behind `StorageRead`/`StorageWrite`, and raw document bodies
//! come from a `ContentProvider`. Implementations decide how writes are
//! serialized; the engine only promises to hand each document over as one
//! `DocumentContribution` so an implementation can swap it in atomically.
//!
//! ```text
//! Indexer ──StorageWrite──▶ ┌─────────┐ ◀──StorageRead── Finder
//!                           │ storage │
//!                           └─────────┘
//! SnippetBuilder ──ContentProvider──▶ application
//! ```

pub mod memory;

pub use memory::MemoryStorage;

use crate::error::Result;
use crate::types::{
    DocumentContribution, DocumentIdentity, FieldHits, FieldKind, PostingList, TocEntry,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Read side of the index, used by the finder.
pub trait StorageRead {
    /// Full postings for a stemmed word, in insertion order.
    fn postings(&self, stem: &str) -> Result<PostingList>;

    /// Words the storage refuses to search for (stop words, overly frequent stems).
    fn is_excluded(&self, stem: &str) -> Result<bool>;

    /// Documents whose title or keyword fields contain the stem.
    fn single_keyword_index(&self, stem: &str) -> Result<Vec<(DocumentIdentity, FieldKind)>>;

    /// Documents that declared the folded literal keyword `phrase`.
    fn multiple_keyword_index(&self, phrase: &str) -> Result<Vec<DocumentIdentity>>;

    fn toc_entry(&self, identity: &DocumentIdentity) -> Result<Option<TocEntry>>;

    /// Number of indexed documents.
    fn toc_size(&self) -> Result<usize>;

    /// Entries whose title contains `fragment`, ignoring case.
    fn find_toc_by_title(&self, fragment: &str) -> Result<Vec<TocEntry>>;

    /// Refresh a process-local snapshot so it reflects another writer's
    /// changes. Storages that are always current do nothing.
    fn reload(&self) -> Result<()> {
        Ok(())
    }
}

/// Write side of the index, used by the indexer.
pub trait StorageWrite: StorageRead {
    /// Whether the backing store has been bootstrapped.
    fn is_initialized(&self) -> Result<bool>;

    /// Drop all state and leave the store initialized and empty.
    fn erase(&self) -> Result<()>;

    /// Remove every posting, keyword phrase and TOC entry of `identity`.
    /// Removing an unknown identity is not an error.
    fn remove_document(&self, identity: &DocumentIdentity) -> Result<()>;

    fn add_postings(
        &self,
        identity: &DocumentIdentity,
        terms: &BTreeMap<String, Vec<FieldHits>>,
    ) -> Result<()>;

    fn add_keyword_phrases(&self, identity: &DocumentIdentity, phrases: &[String]) -> Result<()>;

    fn put_toc(&self, entry: &TocEntry) -> Result<()>;

    /// Supersede whatever `contribution.identity` had with `contribution`.
    ///
    /// The default runs the steps one by one. Storages that can should
    /// override it so readers never observe the document half-written.
    fn replace_document(&self, contribution: &DocumentContribution) -> Result<()> {
        self.remove_document(&contribution.identity)?;
        self.add_postings(&contribution.identity, &contribution.terms)?;
        self.add_keyword_phrases(&contribution.identity, &contribution.keyword_phrases)?;
        self.put_toc(&contribution.toc)
    }
}

/// Raw bodies fetched at snippet time, keyed by identity.
pub type ExternalContent = HashMap<DocumentIdentity, String>;

/// Supplies original document bodies in bulk. Identities it cannot serve are
/// simply absent from the returned map.
pub trait ContentProvider {
    fn fetch(&self, identities: &[DocumentIdentity]) -> Result<ExternalContent>;
}

impl<F> ContentProvider for F
where
    F: Fn(&[DocumentIdentity]) -> Result<ExternalContent>,
{
    fn fetch(&self, identities: &[DocumentIdentity]) -> Result<ExternalContent> {
        self(identities)
    }
}

// =============================================================================
// FORWARDING IMPLS
// =============================================================================

macro_rules! forward_read {
    ($($ptr:ty),*) => {$(
        impl<T: StorageRead + ?Sized> StorageRead for $ptr {
            fn postings(&self, stem: &str) -> Result<PostingList> {
                (**self).postings(stem)
            }
            fn is_excluded(&self, stem: &str) -> Result<bool> {
                (**self).is_excluded(stem)
            }
            fn single_keyword_index(
                &self,
                stem: &str,
            ) -> Result<Vec<(DocumentIdentity, FieldKind)>> {
                (**self).single_keyword_index(stem)
            }
            fn multiple_keyword_index(&self, phrase: &str) -> Result<Vec<DocumentIdentity>> {
                (**self).multiple_keyword_index(phrase)
            }
            fn toc_entry(&self, identity: &DocumentIdentity) -> Result<Option<TocEntry>> {
                (**self).toc_entry(identity)
            }
            fn toc_size(&self) -> Result<usize> {
                (**self).toc_size()
            }
            fn find_toc_by_title(&self, fragment: &str) -> Result<Vec<TocEntry>> {
                (**self).find_toc_by_title(fragment)
            }
            fn reload(&self) -> Result<()> {
                (**self).reload()
            }
        }
    )*};
}

macro_rules! forward_write {
    ($($ptr:ty),*) => {$(
        impl<T: StorageWrite + ?Sized> StorageWrite for $ptr {
            fn is_initialized(&self) -> Result<bool> {
                (**self).is_initialized()
            }
            fn erase(&self) -> Result<()> {
                (**self).erase()
            }
            fn remove_document(&self, identity: &DocumentIdentity) -> Result<()> {
                (**self).remove_document(identity)
            }
            fn add_postings(
                &self,
                identity: &DocumentIdentity,
                terms: &BTreeMap<String, Vec<FieldHits>>,
            ) -> Result<()> {
                (**self).add_postings(identity, terms)
            }
            fn add_keyword_phrases(
                &self,
                identity: &DocumentIdentity,
                phrases: &[String],
            ) -> Result<()> {
                (**self).add_keyword_phrases(identity, phrases)
            }
            fn put_toc(&self, entry: &TocEntry) -> Result<()> {
                (**self).put_toc(entry)
            }
            fn replace_document(&self, contribution: &DocumentContribution) -> Result<()> {
                (**self).replace_document(contribution)
            }
        }
    )*};
}

forward_read!(&T, Arc<T>, Box<T>);
forward_write!(&T, Arc<T>, Box<T>);
