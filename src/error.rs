// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error type shared by the indexer, finder and storage collaborators.
//!
//! Two families live here. Structural failures (`UninitializedStorage`,
//! `Storage`, `Snapshot`) abort the operation that raised them and always reach
//! the caller. Missing snippet content is not an error at all: the snippet
//! builder simply leaves the affected item alone.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error surfaced by a storage or content collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum Error {
    /// A write was attempted on storage that was never bootstrapped and the
    /// indexer is not allowed to erase it.
    #[error("empty index: storage is not initialized (enable auto-erase or provision it first)")]
    UninitializedStorage,

    /// Any failure reported by the storage collaborator, passed through as is.
    #[error("storage failure: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// A snapshot file failed its integrity check or could not be decoded.
    #[error("corrupted snapshot: {0}")]
    Snapshot(String),

    /// The content provider itself failed (as opposed to lacking a document).
    #[error("content provider failure")]
    ContentProvider {
        #[source]
        source: BoxError,
    },

    #[error("invalid highlight template {0:?}: expected exactly one %s placeholder")]
    InvalidHighlightTemplate(String),
}

impl Error {
    /// Wrap a collaborator error as a storage failure.
    pub fn storage<E>(message: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Storage {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// A storage failure with no underlying cause.
    pub fn storage_msg(message: impl Into<String>) -> Self {
        Error::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// True for failures that originate in the storage collaborator.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Error::Storage { .. } | Error::Snapshot(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::storage("i/o error", err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::storage("serialization error", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn io_errors_become_storage_failures() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.is_storage_failure());
        assert!(err.source().is_some());
    }

    #[test]
    fn uninitialized_is_not_a_storage_failure() {
        assert!(!Error::UninitializedStorage.is_storage_failure());
        assert!(Error::UninitializedStorage.to_string().contains("empty index"));
    }
}
