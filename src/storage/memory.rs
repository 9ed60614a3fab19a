// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! In-process storage with optional JSON snapshots.
//!
//! All state sits behind one `RwLock`, so `replace_document` swaps a whole
//! document in while holding the write lock and readers never see it half
//! done. A store created with `open` is tied to a snapshot file: writers call
//! `save`, other instances call `reload` to pick the changes up. Nothing is
//! shared across processes automatically.
//!
//! # Snapshot format
//!
//! ```text
//! ROSE1 <crc32 of body, 8 hex digits>\n
//! <JSON body>
//! ```
//!
//! A mismatching checksum is reported as `Error::Snapshot` rather than loaded.

use crate::contracts::check_field_hits_well_formed;
use crate::error::{Error, Result};
use crate::storage::{StorageRead, StorageWrite};
use crate::text::fold_word;
use crate::types::{DocumentContribution, DocumentIdentity, FieldHits, FieldKind, Posting, PostingList, TocEntry};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Magic prefix of the snapshot header line.
const SNAPSHOT_MAGIC: &str = "ROSE1";

/// Stems present in more than this share of documents get excluded by `cleanup`.
pub const FREQUENT_WORD_RATIO: f64 = 0.3;

/// `cleanup` only excludes frequent stems once the store is at least this big.
pub const MIN_DOCS_FOR_EXCLUSION: usize = 20;

/// What one document wrote, so it can be removed without a full scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Footprint {
    terms: Vec<String>,
    phrases: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct IndexState {
    postings: BTreeMap<String, Vec<Posting>>,
    keyword_phrases: BTreeMap<String, Vec<DocumentIdentity>>,
    /// Keyed by `DocumentIdentity::to_string()`; JSON maps need string keys.
    toc: BTreeMap<String, TocEntry>,
    footprints: BTreeMap<String, Footprint>,
    excluded: BTreeSet<String>,
}

impl IndexState {
    fn remove(&mut self, identity: &DocumentIdentity) {
        let key = identity.to_string();
        if let Some(footprint) = self.footprints.remove(&key) {
            for term in &footprint.terms {
                self.drop_posting(term, identity);
            }
            for phrase in &footprint.phrases {
                self.drop_phrase(phrase, identity);
            }
        }
        self.toc.remove(&key);
    }

    /// Supersede the previous version of a document. Postings and phrases the
    /// new version still has are overwritten where they sit, so re-indexing
    /// never changes list order.
    fn replace(&mut self, contribution: &DocumentContribution) {
        let identity = &contribution.identity;
        if let Some(previous) = self.footprints.remove(&identity.to_string()) {
            for term in previous.terms.iter().filter(|t| !contribution.terms.contains_key(*t)) {
                self.drop_posting(term, identity);
            }
            for phrase in previous
                .phrases
                .iter()
                .filter(|p| !contribution.keyword_phrases.contains(*p))
            {
                self.drop_phrase(phrase, identity);
            }
        }
        self.add_postings(identity, &contribution.terms);
        self.add_keyword_phrases(identity, &contribution.keyword_phrases);
        self.put_toc(&contribution.toc);
    }

    fn drop_posting(&mut self, term: &str, identity: &DocumentIdentity) {
        if let Some(list) = self.postings.get_mut(term) {
            list.retain(|posting| &posting.identity != identity);
            if list.is_empty() {
                self.postings.remove(term);
            }
        }
    }

    fn drop_phrase(&mut self, phrase: &str, identity: &DocumentIdentity) {
        if let Some(list) = self.keyword_phrases.get_mut(phrase) {
            list.retain(|declared| declared != identity);
            if list.is_empty() {
                self.keyword_phrases.remove(phrase);
            }
        }
    }

    fn add_postings(&mut self, identity: &DocumentIdentity, terms: &BTreeMap<String, Vec<FieldHits>>) {
        let footprint = self.footprints.entry(identity.to_string()).or_default();
        for (term, fields) in terms {
            check_field_hits_well_formed(fields);
            let list = self.postings.entry(term.clone()).or_default();
            match list.iter_mut().find(|posting| &posting.identity == identity) {
                Some(existing) => existing.fields = fields.clone(),
                None => list.push(Posting {
                    identity: identity.clone(),
                    fields: fields.clone(),
                }),
            }
            if !footprint.terms.contains(term) {
                footprint.terms.push(term.clone());
            }
        }
    }

    fn add_keyword_phrases(&mut self, identity: &DocumentIdentity, phrases: &[String]) {
        let footprint = self.footprints.entry(identity.to_string()).or_default();
        for phrase in phrases {
            let list = self.keyword_phrases.entry(phrase.clone()).or_default();
            if !list.contains(identity) {
                list.push(identity.clone());
            }
            if !footprint.phrases.contains(phrase) {
                footprint.phrases.push(phrase.clone());
            }
        }
    }

    fn put_toc(&mut self, entry: &TocEntry) {
        self.toc.insert(entry.identity.to_string(), entry.clone());
    }
}

/// Reference storage collaborator kept in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    /// `None` until bootstrapped.
    state: RwLock<Option<IndexState>>,
    path: Option<PathBuf>,
    stop_words: BTreeSet<String>,
}

impl MemoryStorage {
    /// An initialized, empty store.
    pub fn new() -> Self {
        MemoryStorage {
            state: RwLock::new(Some(IndexState::default())),
            ..MemoryStorage::default()
        }
    }

    /// A freshly provisioned store that has never been bootstrapped.
    pub fn uninitialized() -> Self {
        MemoryStorage::default()
    }

    /// A store backed by the snapshot at `path`. A missing file means the
    /// store is not initialized yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let storage = MemoryStorage {
            path: Some(path.into()),
            ..MemoryStorage::default()
        };
        storage.reload()?;
        Ok(storage)
    }

    /// Stems the finder must never search for. They are compared against
    /// stems, so pass them through the same `Normalizer` the finder uses.
    pub fn with_stop_words<I, S>(mut self, stems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words.extend(stems.into_iter().map(Into::into));
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the snapshot file. Stores without a path have nothing to do.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let guard = self.state.read();
        let Some(state) = guard.as_ref() else {
            return Err(Error::UninitializedStorage);
        };

        let body = serde_json::to_string(state)?;
        let checksum = crc32fast::hash(body.as_bytes());
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, format!("{} {:08x}\n{}", SNAPSHOT_MAGIC, checksum, body))?;
        fs::rename(&tmp, path)?;

        info!(path = %path.display(), documents = state.toc.len(), "saved index snapshot");
        Ok(())
    }

    /// Drop empty posting lists and exclude stems that occur in too many
    /// documents to be useful.
    pub fn cleanup(&self) -> Result<()> {
        let mut guard = self.state.write();
        let Some(state) = guard.as_mut() else {
            return Err(Error::UninitializedStorage);
        };

        state.postings.retain(|_, list| !list.is_empty());
        state.excluded.clear();

        let documents = state.toc.len();
        if documents >= MIN_DOCS_FOR_EXCLUSION {
            let limit = documents as f64 * FREQUENT_WORD_RATIO;
            for (term, list) in &state.postings {
                if list.len() as f64 > limit {
                    state.excluded.insert(term.clone());
                }
            }
        }

        debug!(excluded = state.excluded.len(), "cleaned up index");
        Ok(())
    }

    fn read<T>(&self, default: T, f: impl FnOnce(&IndexState) -> T) -> T {
        match self.state.read().as_ref() {
            Some(state) => f(state),
            None => default,
        }
    }

    fn write<T>(&self, f: impl FnOnce(&mut IndexState) -> T) -> Result<T> {
        match self.state.write().as_mut() {
            Some(state) => Ok(f(state)),
            None => Err(Error::UninitializedStorage),
        }
    }
}

fn parse_snapshot(raw: &str) -> Result<IndexState> {
    let (header, body) = raw
        .split_once('\n')
        .ok_or_else(|| Error::Snapshot("missing header".to_string()))?;
    let (magic, checksum) = header
        .split_once(' ')
        .ok_or_else(|| Error::Snapshot("malformed header".to_string()))?;
    if magic != SNAPSHOT_MAGIC {
        return Err(Error::Snapshot(format!("unknown format {:?}", magic)));
    }
    let expected = u32::from_str_radix(checksum.trim(), 16)
        .map_err(|_| Error::Snapshot(format!("bad checksum field {:?}", checksum)))?;
    let actual = crc32fast::hash(body.as_bytes());
    if expected != actual {
        return Err(Error::Snapshot(format!(
            "checksum mismatch: expected {:08x}, got {:08x}",
            expected, actual
        )));
    }
    serde_json::from_str(body).map_err(|e| Error::Snapshot(e.to_string()))
}

impl StorageRead for MemoryStorage {
    fn postings(&self, stem: &str) -> Result<PostingList> {
        Ok(self.read(Vec::new(), |state| {
            state.postings.get(stem).cloned().unwrap_or_default()
        }))
    }

    fn is_excluded(&self, stem: &str) -> Result<bool> {
        if self.stop_words.contains(stem) {
            return Ok(true);
        }
        Ok(self.read(false, |state| state.excluded.contains(stem)))
    }

    fn single_keyword_index(&self, stem: &str) -> Result<Vec<(DocumentIdentity, FieldKind)>> {
        Ok(self.read(Vec::new(), |state| {
            let Some(list) = state.postings.get(stem) else {
                return Vec::new();
            };
            list.iter()
                .filter_map(|posting| {
                    // Title outranks keyword, so report the title when both exist.
                    [FieldKind::Title, FieldKind::Keyword]
                        .into_iter()
                        .find(|field| !posting.positions(*field).is_empty())
                        .map(|field| (posting.identity.clone(), field))
                })
                .collect()
        }))
    }

    fn multiple_keyword_index(&self, phrase: &str) -> Result<Vec<DocumentIdentity>> {
        Ok(self.read(Vec::new(), |state| {
            state.keyword_phrases.get(phrase).cloned().unwrap_or_default()
        }))
    }

    fn toc_entry(&self, identity: &DocumentIdentity) -> Result<Option<TocEntry>> {
        Ok(self.read(None, |state| state.toc.get(&identity.to_string()).cloned()))
    }

    fn toc_size(&self) -> Result<usize> {
        Ok(self.read(0, |state| state.toc.len()))
    }

    fn find_toc_by_title(&self, fragment: &str) -> Result<Vec<TocEntry>> {
        let needle = fold_word(fragment.trim());
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.read(Vec::new(), |state| {
            state
                .toc
                .values()
                .filter(|entry| fold_word(&entry.title).contains(&needle))
                .cloned()
                .collect()
        }))
    }

    fn reload(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let loaded = if path.exists() {
            let raw = fs::read_to_string(path)?;
            match parse_snapshot(&raw) {
                Ok(state) => Some(state),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "refusing corrupted snapshot");
                    return Err(err);
                }
            }
        } else {
            None
        };

        info!(
            path = %path.display(),
            documents = loaded.as_ref().map_or(0, |state| state.toc.len()),
            "reloaded index snapshot"
        );
        *self.state.write() = loaded;
        Ok(())
    }
}

impl StorageWrite for MemoryStorage {
    fn is_initialized(&self) -> Result<bool> {
        Ok(self.state.read().is_some())
    }

    fn erase(&self) -> Result<()> {
        *self.state.write() = Some(IndexState::default());
        info!("erased index");
        Ok(())
    }

    fn remove_document(&self, identity: &DocumentIdentity) -> Result<()> {
        self.write(|state| state.remove(identity))
    }

    fn add_postings(
        &self,
        identity: &DocumentIdentity,
        terms: &BTreeMap<String, Vec<FieldHits>>,
    ) -> Result<()> {
        self.write(|state| state.add_postings(identity, terms))
    }

    fn add_keyword_phrases(&self, identity: &DocumentIdentity, phrases: &[String]) -> Result<()> {
        self.write(|state| state.add_keyword_phrases(identity, phrases))
    }

    fn put_toc(&self, entry: &TocEntry) -> Result<()> {
        self.write(|state| state.put_toc(entry))
    }

    fn replace_document(&self, contribution: &DocumentContribution) -> Result<()> {
        self.write(|state| state.replace(contribution))
    }
}
